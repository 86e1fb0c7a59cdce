//! Minimal host wiring: what a device shell does before handing the shared
//! runtime to application code. The bridges here are in-memory stand-ins
//! for the platform SDK.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use dynamics_bridge_core::{
    EventHandler, EventPayload, HttpResponse, LifecycleBridge, RequestOptions, RuntimeBuilder,
    RuntimeEvent, SecureStoreBackend, SetupError, StartConfig, StoreError, TransportBridge,
    TransportError,
};

#[derive(Default)]
struct DemoLifecycle {
    ready: AtomicBool,
}

impl LifecycleBridge for DemoLifecycle {
    fn start(&self, config: StartConfig) -> Result<(), SetupError> {
        println!("container starting for {}", config.app_id);
        self.ready.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
}

struct DemoTransport;

impl TransportBridge for DemoTransport {
    fn send(&self, request: RequestOptions) -> Result<HttpResponse, TransportError> {
        Ok(HttpResponse {
            status: 200,
            headers: HashMap::new(),
            body: format!("demo response for {}", request.url),
        })
    }
}

#[derive(Default)]
struct DemoStore(Mutex<HashMap<String, String>>);

impl SecureStoreBackend for DemoStore {
    fn get(&self, key: String) -> Result<Option<String>, StoreError> {
        Ok(self.0.lock().unwrap().get(&key).cloned())
    }

    fn set(&self, key: String, value: String) -> Result<(), StoreError> {
        self.0.lock().unwrap().insert(key, value);
        Ok(())
    }

    fn remove(&self, key: String) -> Result<(), StoreError> {
        self.0.lock().unwrap().remove(&key);
        Ok(())
    }

    fn get_all(&self) -> Result<HashMap<String, String>, StoreError> {
        Ok(self.0.lock().unwrap().clone())
    }
}

struct PrintingHandler;

impl EventHandler for PrintingHandler {
    fn on_event(&self, event: RuntimeEvent) {
        println!("event fired: {} ({:?})", event.name, event.payload);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let builder = RuntimeBuilder::new();
    builder.set_app_id("com.example.vault".to_owned());
    builder.set_lifecycle_bridge(Box::new(DemoLifecycle::default()));
    builder.set_transport_bridge(Box::new(DemoTransport));
    builder.set_store_backend(Box::new(DemoStore::default()));

    let runtime = builder.build_shared()?;
    runtime.on("authorized".to_owned(), Box::new(PrintingHandler));

    runtime.start().await?;
    runtime.dispatch_event(RuntimeEvent::new("authorized", EventPayload::Empty));

    runtime
        .secure_set("session".to_owned(), "tok-1".to_owned())
        .await?;
    println!(
        "stored session token: {:?}",
        runtime.secure_get("session".to_owned()).await?
    );

    let response = runtime
        .http_get("https://gateway.example.com/ping".to_owned(), None)
        .await?;
    println!("gateway said: {} {}", response.status, response.body);

    runtime.shutdown();
    Ok(())
}
