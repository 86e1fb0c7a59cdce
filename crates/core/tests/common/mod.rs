//! Host-side doubles: what a device app would wire into the builder.
#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use dynamics_bridge_core::{
    HttpResponse, LifecycleBridge, RequestOptions, RuntimeBuilder, SecureStoreBackend,
    SetupError, StartConfig, StoreError, TransportBridge, TransportError,
};

#[derive(Default)]
pub struct TestLifecycle {
    ready: AtomicBool,
}

impl LifecycleBridge for TestLifecycle {
    fn start(&self, _config: StartConfig) -> Result<(), SetupError> {
        self.ready.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
}

/// Echoes the request back: response body is the request body (or the url
/// for body-less requests) and response headers are the request headers.
pub struct EchoTransport;

impl TransportBridge for EchoTransport {
    fn send(&self, request: RequestOptions) -> Result<HttpResponse, TransportError> {
        Ok(HttpResponse {
            status: 200,
            headers: request.headers.unwrap_or_default(),
            body: request.body.unwrap_or(request.url),
        })
    }
}

#[derive(Default)]
pub struct MapStore(Mutex<HashMap<String, String>>);

impl SecureStoreBackend for MapStore {
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

/// A builder wired the way a host app wires it on device.
pub fn host_builder() -> RuntimeBuilder {
    let builder = RuntimeBuilder::new();
    builder.set_app_id("com.example.vault".to_owned());
    builder.set_lifecycle_bridge(Box::new(TestLifecycle::default()));
    builder.set_transport_bridge(Box::new(EchoTransport));
    builder.set_store_backend(Box::new(MapStore::default()));
    builder
}
