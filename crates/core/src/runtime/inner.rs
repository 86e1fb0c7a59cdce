use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use log::{debug, error, info};
use reqwest::header::CONTENT_TYPE;

use super::{config::RuntimeConfiguration, logging::init_log, RuntimeStatus};
use crate::{
    callbacks::EventHandler,
    error::{RuntimeError, SetupError},
    events::{EventRegistry, HandlerId, RuntimeEvent},
    platform::{PlatformAdapter, RuntimeAdapter},
    transport::{HttpResponse, Method, RequestOptions},
};

pub(crate) struct RuntimeInner {
    config: RuntimeConfiguration,
    /// Whichever adapter the build bound; see [crate::platform].
    adapter: Arc<dyn RuntimeAdapter>,
    /// Event-name to handler mapping; singleton state for this handle.
    registry: EventRegistry,
    status: Mutex<RuntimeStatus>,
    /// Serializes backing-store access: a `get` issued after a `set` for the
    /// same key observes the written value even when the adapter's store
    /// offloads to something concurrent.
    store_gate: tokio::sync::Mutex<()>,
}

impl RuntimeInner {
    pub fn new(config: RuntimeConfiguration) -> Result<Self, RuntimeError> {
        init_log(config.log_level);
        debug!("Building container runtime handle.");
        debug!("Configuration: {config:?}");

        let adapter = Arc::new(PlatformAdapter::from_config(&config)?);
        Ok(Self::with_adapter(config, adapter))
    }

    pub fn with_adapter(config: RuntimeConfiguration, adapter: Arc<dyn RuntimeAdapter>) -> Self {
        Self {
            config,
            adapter,
            registry: EventRegistry::new(),
            status: Mutex::new(RuntimeStatus::Idle),
            store_gate: tokio::sync::Mutex::new(()),
        }
    }

    pub async fn start(&self) -> Result<(), RuntimeError> {
        {
            let mut status = self.status.lock().unwrap();
            if *status != RuntimeStatus::Idle {
                return Err(SetupError::AlreadyStarted.into());
            }
            *status = RuntimeStatus::Starting;
        }

        info!("Starting container runtime for {:?}", self.config.app_id);

        match self.adapter.start(&self.config).await {
            Ok(()) => {
                *self.status.lock().unwrap() = RuntimeStatus::Ready;
                info!("Container runtime ready.");
                Ok(())
            }
            Err(e) => {
                *self.status.lock().unwrap() = RuntimeStatus::Failed;
                error!("Container start failed: {e}");
                Err(e)
            }
        }
    }

    pub fn status(&self) -> RuntimeStatus {
        *self.status.lock().unwrap()
    }

    pub fn is_ready(&self) -> bool {
        self.status() == RuntimeStatus::Ready && self.adapter.is_ready()
    }

    pub fn shutdown(&self) {
        let mut status = self.status.lock().unwrap();
        if *status == RuntimeStatus::Stopped {
            return;
        }
        *status = RuntimeStatus::Stopped;
        info!("Container runtime stopped.");
    }

    fn ensure_ready(&self) -> Result<(), RuntimeError> {
        match self.status() {
            RuntimeStatus::Ready => Ok(()),
            _ => Err(SetupError::NotStarted.into()),
        }
    }

    pub fn on(&self, event: &str, handler: Arc<dyn EventHandler>) -> HandlerId {
        self.registry.register(event, handler)
    }

    pub fn off(&self, event: &str, id: Option<HandlerId>) {
        self.registry.unregister(event, id)
    }

    pub fn dispatch_event(&self, event: RuntimeEvent) {
        let ran = self.registry.dispatch(&event);
        debug!("dispatched {:?} to {ran} handler(s)", event.name);
    }

    pub async fn send_request(
        &self,
        options: RequestOptions,
    ) -> Result<HttpResponse, RuntimeError> {
        self.ensure_ready()?;
        self.adapter.send_request(options).await
    }

    pub async fn http_get(
        &self,
        url: String,
        headers: Option<HashMap<String, String>>,
    ) -> Result<HttpResponse, RuntimeError> {
        let options = RequestOptions {
            url,
            method: Some(Method::Get),
            headers,
            body: None,
            timeout_ms: self.config.request_timeout_ms,
        };
        self.send_request(options).await
    }

    pub async fn http_post(
        &self,
        url: String,
        body: String,
        mut headers: Option<HashMap<String, String>>,
    ) -> Result<HttpResponse, RuntimeError> {
        let header_map = headers.get_or_insert_with(Default::default);
        header_map
            .entry(CONTENT_TYPE.to_string())
            .or_insert_with(|| "application/json".to_string());

        let options = RequestOptions {
            url,
            method: Some(Method::Post),
            headers,
            body: Some(body),
            timeout_ms: self.config.request_timeout_ms,
        };
        self.send_request(options).await
    }

    pub async fn secure_get(&self, key: &str) -> Result<Option<String>, RuntimeError> {
        self.ensure_ready()?;
        let _gate = self.store_gate.lock().await;
        Ok(self.adapter.store().get(key)?)
    }

    pub async fn secure_set(&self, key: &str, value: &str) -> Result<(), RuntimeError> {
        self.ensure_ready()?;
        let _gate = self.store_gate.lock().await;
        Ok(self.adapter.store().set(key, value)?)
    }

    pub async fn secure_remove(&self, key: &str) -> Result<(), RuntimeError> {
        self.ensure_ready()?;
        let _gate = self.store_gate.lock().await;
        Ok(self.adapter.store().remove(key)?)
    }

    pub async fn secure_get_all(&self) -> Result<HashMap<String, String>, RuntimeError> {
        self.ensure_ready()?;
        let _gate = self.store_gate.lock().await;
        Ok(self.adapter.store().get_all()?)
    }
}
