use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::RuntimeAdapter;
use crate::{
    callbacks::{LifecycleBridge, StartConfig, TransportBridge},
    error::{RuntimeError, SetupError, TransportError},
    runtime::RuntimeConfiguration,
    store::{BridgedStore, SecureStore},
    transport::{HttpResponse, RequestOptions},
};

/// The adapter device builds bind. Every capability call forwards to the
/// host-implemented bridges wrapping the real container runtime; errors
/// pass through verbatim and nothing is retried or reinterpreted here.
pub struct NativeAdapter {
    lifecycle: Arc<dyn LifecycleBridge>,
    transport: Arc<dyn TransportBridge>,
    store: Arc<BridgedStore>,
}

impl NativeAdapter {
    /// Fails fast when a bridge is missing; a native build with no host
    /// runtime wired up cannot start at all.
    pub fn from_config(config: &RuntimeConfiguration) -> Result<Self, RuntimeError> {
        let lifecycle =
            config
                .lifecycle_bridge
                .clone()
                .ok_or_else(|| SetupError::MissingBridge {
                    bridge: "lifecycle".to_owned(),
                })?;

        let transport =
            config
                .transport_bridge
                .clone()
                .ok_or_else(|| SetupError::MissingBridge {
                    bridge: "transport".to_owned(),
                })?;

        let backend = config
            .store_backend
            .clone()
            .ok_or_else(|| SetupError::MissingBridge {
                bridge: "secure store".to_owned(),
            })?;

        Ok(Self {
            lifecycle,
            transport,
            store: Arc::new(BridgedStore::new(backend)),
        })
    }
}

#[async_trait]
impl RuntimeAdapter for NativeAdapter {
    async fn start(&self, config: &RuntimeConfiguration) -> Result<(), RuntimeError> {
        let mut params = config.params.clone();
        params.insert("platform".to_owned(), config.platform.to_string());

        let start_config = StartConfig {
            app_id: config.app_id.clone(),
            params,
        };

        debug!("starting native container: {start_config:?}");

        // Container start can block on the authorization UI, so it runs on
        // a blocking-capable thread.
        let bridge = self.lifecycle.clone();
        tokio::task::spawn_blocking(move || bridge.start(start_config))
            .await
            .map_err(|e| SetupError::Callback {
                error: e.to_string(),
            })??;

        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.lifecycle.is_ready()
    }

    async fn send_request(&self, request: RequestOptions) -> Result<HttpResponse, RuntimeError> {
        let bridge = self.transport.clone();
        let response = tokio::task::spawn_blocking(move || bridge.send(request))
            .await
            .map_err(|e| TransportError::Callback {
                error: e.to_string(),
            })??;

        Ok(response)
    }

    fn store(&self) -> Arc<dyn SecureStore> {
        self.store.clone()
    }
}
