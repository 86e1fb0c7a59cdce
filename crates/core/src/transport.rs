use std::collections::HashMap;

use log::debug;
use reqwest::Method as ReqMethod;

use crate::error::TransportError;

// If you change this also change the
// default below in the proc macro
const DEFAULT_TIMEOUT: u64 = 30_000;

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum Method {
    Get = 0,
    Options,
    Post,
    Put,
    Delete,
    Head,
    Trace,
    Connect,
    Patch,
}

impl From<Method> for ReqMethod {
    fn from(val: Method) -> ReqMethod {
        match val {
            Method::Options => ReqMethod::OPTIONS,
            Method::Get => ReqMethod::GET,
            Method::Post => ReqMethod::POST,
            Method::Put => ReqMethod::PUT,
            Method::Delete => ReqMethod::DELETE,
            Method::Head => ReqMethod::HEAD,
            Method::Trace => ReqMethod::TRACE,
            Method::Connect => ReqMethod::CONNECT,
            Method::Patch => ReqMethod::PATCH,
        }
    }
}

/// One outbound request. Treated as immutable once handed to a send
/// operation; the method defaults to GET and the timeout to 30 seconds.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions {
    pub url: String,
    #[uniffi(default = None)]
    #[serde(default)]
    pub method: Option<Method>,
    #[uniffi(default = None)]
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    #[uniffi(default = None)]
    #[serde(default)]
    pub body: Option<String>,
    #[uniffi(default = 30_000)]
    #[serde(rename = "timeout", default = "default_timeout")]
    pub timeout_ms: u64,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT
}

impl RequestOptions {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: None,
            headers: None,
            body: None,
            timeout_ms: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record, serde::Serialize, serde::Deserialize)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Request executor over the standard web client. On wasm targets reqwest
/// lowers this to the browser's `fetch`; elsewhere it is a plain HTTP client.
/// Exactly one of `Ok`/`Err` resolves every call.
pub struct WebTransport {
    client: reqwest::Client,
}

impl Default for WebTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl WebTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub async fn send(&self, options: RequestOptions) -> Result<HttpResponse, TransportError> {
        let url: reqwest::Url =
            options
                .url
                .parse()
                .map_err(|e| TransportError::InvalidRequest {
                    error: format!("{e}"),
                })?;

        let method: ReqMethod = options.method.unwrap_or(Method::Get).into();
        let headers = (&options.headers.unwrap_or_default())
            .try_into()
            .map_err(|e| TransportError::InvalidRequest {
                error: format!("{e:?}"),
            })?;

        debug!("{method} {url}");

        let mut builder = self.client.request(method, url).headers(headers);

        if let Some(body) = options.body {
            builder = builder.body(body);
        }

        // The browser fetch path has no per-request deadline to configure.
        #[cfg(not(target_family = "wasm"))]
        {
            builder = builder.timeout(std::time::Duration::from_millis(options.timeout_ms));
        }

        let resp = builder.send().await?;

        let status = resp.status().as_u16();
        let mut headers = HashMap::new();
        for (name, value) in resp.headers() {
            headers.insert(
                name.to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            );
        }
        let body = resp.text().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
