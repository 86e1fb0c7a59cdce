mod common;

use std::{collections::HashMap, time::Duration};

use common::host_builder;
use dynamics_bridge_core::{
    platform::{mock::MockAdapter, RuntimeAdapter},
    Method, RequestOptions, RuntimeConfiguration, RuntimeError, TransportError,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn mock_adapter() -> MockAdapter {
    MockAdapter::from_config(&RuntimeConfiguration::default()).expect("mock is infallible")
}

#[tokio::test]
async fn mock_adapter_resolves_success_with_the_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-container", "mock")
                .set_body_string("pong"),
        )
        .mount(&server)
        .await;

    let adapter = mock_adapter();
    let response = adapter
        .send_request(RequestOptions::get(format!("{}/ping", server.uri())))
        .await
        .expect("send failed");

    assert_eq!(response.status, 200);
    assert_eq!(response.body, "pong");
    assert_eq!(response.headers.get("x-container"), Some(&"mock".to_owned()));
}

#[tokio::test]
async fn mock_adapter_sends_method_headers_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("x-request-id", "42"))
        .and(body_json(json!({"name": "ada"})))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let adapter = mock_adapter();
    let options = RequestOptions {
        url: format!("{}/users", server.uri()),
        method: Some(Method::Post),
        headers: Some(HashMap::from([("x-request-id".to_owned(), "42".to_owned())])),
        body: Some(json!({"name": "ada"}).to_string()),
        timeout_ms: 5_000,
    };

    let response = adapter.send_request(options).await.expect("send failed");
    assert_eq!(response.status, 201);
}

#[tokio::test]
async fn timeouts_resolve_through_the_error_arm_as_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let adapter = mock_adapter();
    let mut options = RequestOptions::get(format!("{}/slow", server.uri()));
    options.timeout_ms = 100;

    let err = adapter
        .send_request(options)
        .await
        .expect_err("a timed out request must resolve with an error");

    assert!(matches!(
        err,
        RuntimeError::Transport {
            error: TransportError::Timeout
        }
    ));
}

#[tokio::test]
async fn unreachable_hosts_resolve_as_network_errors() {
    // Reserved TEST-NET-1 address; nothing answers there.
    let adapter = mock_adapter();
    let mut options = RequestOptions::get("http://192.0.2.1/ping");
    options.timeout_ms = 500;

    let err = adapter
        .send_request(options)
        .await
        .expect_err("an unreachable host must resolve with an error");

    assert!(matches!(
        err,
        RuntimeError::Transport {
            error: TransportError::Timeout | TransportError::Network { .. }
        }
    ));
}

#[tokio::test]
async fn http_post_defaults_the_content_type_header() {
    let runtime = host_builder().build().expect("build failed");
    runtime.start().await.expect("start failed");

    // EchoTransport reflects request headers back as response headers.
    let response = runtime
        .http_post(
            "https://gateway.example.com/users".to_owned(),
            r#"{"name":"ada"}"#.to_owned(),
            None,
        )
        .await
        .expect("post failed");

    assert_eq!(
        response.headers.get("content-type"),
        Some(&"application/json".to_owned())
    );
    assert_eq!(response.body, r#"{"name":"ada"}"#);
}

#[tokio::test]
async fn http_post_keeps_a_caller_supplied_content_type() {
    let runtime = host_builder().build().expect("build failed");
    runtime.start().await.expect("start failed");

    let headers = HashMap::from([("content-type".to_owned(), "text/plain".to_owned())]);
    let response = runtime
        .http_post(
            "https://gateway.example.com/notes".to_owned(),
            "plain note".to_owned(),
            Some(headers),
        )
        .await
        .expect("post failed");

    assert_eq!(
        response.headers.get("content-type"),
        Some(&"text/plain".to_owned())
    );
}
