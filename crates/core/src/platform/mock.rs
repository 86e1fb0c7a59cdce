use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use super::RuntimeAdapter;
use crate::{
    error::RuntimeError,
    runtime::RuntimeConfiguration,
    store::{MemoryStore, SecureStore},
    transport::{HttpResponse, RequestOptions, WebTransport},
};

/// The adapter browser builds link against in place of the native runtime.
///
/// Its contract is deterministic so the same application call sequence is
/// reproducible under test:
/// - `start` always succeeds; there is no container to authorize.
/// - Events never originate here. The registry only fires when something
///   drives [Runtime::dispatch_event], e.g. a test harness.
/// - `send_request` delegates to the standard web request primitive
///   ([WebTransport], `fetch` on wasm targets). It is a documented web-HTTP
///   fallback, not a hidden substitute for the secure transport.
/// - Storage is an in-memory [MemoryStore]; nothing persists past the
///   process.
///
/// [Runtime::dispatch_event]: crate::runtime::Runtime::dispatch_event
pub struct MockAdapter {
    transport: WebTransport,
    store: Arc<MemoryStore>,
}

impl MockAdapter {
    pub fn from_config(_config: &RuntimeConfiguration) -> Result<Self, RuntimeError> {
        Ok(Self {
            transport: WebTransport::new(),
            store: Arc::new(MemoryStore::new()),
        })
    }
}

#[cfg_attr(target_family = "wasm", async_trait(?Send))]
#[cfg_attr(not(target_family = "wasm"), async_trait)]
impl RuntimeAdapter for MockAdapter {
    async fn start(&self, config: &RuntimeConfiguration) -> Result<(), RuntimeError> {
        info!("mock runtime started for {:?}", config.app_id);
        Ok(())
    }

    fn is_ready(&self) -> bool {
        true
    }

    async fn send_request(&self, request: RequestOptions) -> Result<HttpResponse, RuntimeError> {
        debug!("mock transport request to {}", request.url);
        Ok(self.transport.send(request).await?)
    }

    fn store(&self) -> Arc<dyn SecureStore> {
        self.store.clone()
    }
}
