mod config;
mod inner;
mod logging;


use std::{
    collections::HashMap,
    sync::{Arc, Mutex, OnceLock},
};

pub use config::{LogLevel, Platform, RuntimeConfiguration};
use inner::RuntimeInner;
use logging::set_log_level;

use crate::{
    callbacks::{EventHandler, LifecycleBridge, SecureStoreBackend, TransportBridge},
    error::{RuntimeError, SetupError},
    events::{HandlerId, RuntimeEvent},
    transport::{HttpResponse, RequestOptions},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, uniffi::Enum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeStatus {
    Idle,
    Starting,
    Ready,
    Failed,
    Stopped,
}

static SHARED: OnceLock<Arc<Runtime>> = OnceLock::new();

/// The process-wide runtime installed by [RuntimeBuilder::build_shared],
/// if one has been installed yet.
#[cfg_attr(feature = "native-runtime", uniffi::export)]
pub fn shared_runtime() -> Option<Arc<Runtime>> {
    SHARED.get().cloned()
}

/// A configuration interface for building a [Runtime].
///
/// Native builds must wire up all three bridges before [RuntimeBuilder::build];
/// the mock binding ignores them. Options set here apply for the lifetime of
/// the built handle.
#[derive(uniffi::Object, Default)]
pub struct RuntimeBuilder {
    config: Mutex<RuntimeConfiguration>,
}

#[cfg_attr(feature = "native-runtime", uniffi::export)]
impl RuntimeBuilder {
    #[cfg_attr(feature = "native-runtime", uniffi::constructor)]
    pub fn new() -> Self {
        Self {
            config: Default::default(),
        }
    }

    /// The application identifier the container activates under.
    pub fn set_app_id(&self, app_id: String) {
        let mut config = self.config.lock().unwrap();
        config.app_id = app_id;
    }

    /// Adds one free-form activation parameter passed to the runtime on
    /// start. Later values for the same key win.
    pub fn set_param(&self, key: String, value: String) {
        let mut config = self.config.lock().unwrap();
        config.params.insert(key, value);
    }

    /// Overrides the activation platform. Defaults per build target.
    pub fn set_platform(&self, platform: Platform) {
        let mut config = self.config.lock().unwrap();
        config.platform = platform;
    }

    /// Set the log filter level.
    ///
    /// By Default the log filter is set to [LogLevel::Info]
    pub fn set_log_level(&self, level: LogLevel) {
        let mut config = self.config.lock().unwrap();
        config.log_level = level;
    }

    /// Set the timeout used by the request convenience helpers in
    /// milliseconds.
    ///
    /// By default the timeout is 30 seconds.
    pub fn set_request_timeout_ms(&self, timeout: u64) {
        let mut config = self.config.lock().unwrap();
        config.request_timeout_ms = timeout;
    }

    /// Provides the native adapter with the host's container lifecycle.
    pub fn set_lifecycle_bridge(&self, bridge: Box<dyn LifecycleBridge>) {
        let mut config = self.config.lock().unwrap();
        config.lifecycle_bridge = Some(bridge.into());
    }

    /// Provides the native adapter with the host's secure transport.
    pub fn set_transport_bridge(&self, bridge: Box<dyn TransportBridge>) {
        let mut config = self.config.lock().unwrap();
        config.transport_bridge = Some(bridge.into());
    }

    /// Provides the native adapter with secure key-value backing, e.g.
    /// Keychain on Apple targets.
    pub fn set_store_backend(&self, backend: Box<dyn SecureStoreBackend>) {
        let mut config = self.config.lock().unwrap();
        config.store_backend = Some(backend.into());
    }

    /// Returns the current log level setting.
    pub fn log_level(&self) -> LogLevel {
        let config = self.config.lock().unwrap();
        config.log_level
    }

    /// Returns the current request timeout in milliseconds.
    pub fn request_timeout_ms(&self) -> u64 {
        let config = self.config.lock().unwrap();
        config.request_timeout_ms
    }

    /// Returns the configured application identifier.
    pub fn app_id(&self) -> String {
        let config = self.config.lock().unwrap();
        config.app_id.clone()
    }

    /// Builds an idle [Runtime] bound to the platform adapter this build
    /// selected. Fails when the native binding is missing a bridge.
    pub fn build(&self) -> Result<Arc<Runtime>, RuntimeError> {
        let config = self.config.lock().unwrap().clone();
        let inner = RuntimeInner::new(config)?;
        Ok(Arc::new(Runtime { inner }))
    }

    /// Builds the runtime and installs it as the process-wide handle
    /// returned by [shared_runtime]. At most one handle can be installed
    /// per process; a second install fails.
    pub fn build_shared(&self) -> Result<Arc<Runtime>, RuntimeError> {
        let runtime = self.build()?;
        SHARED
            .set(runtime.clone())
            .map_err(|_| SetupError::AlreadyInstalled)?;
        Ok(runtime)
    }
}

/// The application handle over the bound platform adapter.
///
/// All capability calls are asynchronous and fallible; none blocks the
/// caller and each resolves exactly once.
#[derive(uniffi::Object)]
pub struct Runtime {
    inner: RuntimeInner,
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime").finish_non_exhaustive()
    }
}

impl Runtime {
    #[cfg(test)]
    pub(crate) fn with_adapter(
        config: RuntimeConfiguration,
        adapter: Arc<dyn crate::platform::RuntimeAdapter>,
    ) -> Arc<Self> {
        Arc::new(Self {
            inner: RuntimeInner::with_adapter(config, adapter),
        })
    }
}

#[cfg_attr(feature = "native-runtime", uniffi::export(async_runtime = "tokio"))]
impl Runtime {
    /// Starts the container runtime. Resolves exactly once with success or
    /// failure; a handle can only be started once.
    pub async fn start(&self) -> Result<(), RuntimeError> {
        self.inner.start().await
    }

    /// Performs one request through the bound adapter. A configured timeout
    /// resolves through the error arm as [TransportError::Timeout].
    ///
    /// [TransportError::Timeout]: crate::error::TransportError::Timeout
    pub async fn send_request(
        &self,
        options: RequestOptions,
    ) -> Result<HttpResponse, RuntimeError> {
        self.inner.send_request(options).await
    }

    pub async fn http_get(
        &self,
        url: String,
        headers: Option<HashMap<String, String>>,
    ) -> Result<HttpResponse, RuntimeError> {
        self.inner.http_get(url, headers).await
    }

    /// POST helper; defaults `Content-Type: application/json` unless the
    /// caller set one.
    pub async fn http_post(
        &self,
        url: String,
        body: String,
        headers: Option<HashMap<String, String>>,
    ) -> Result<HttpResponse, RuntimeError> {
        self.inner.http_post(url, body, headers).await
    }

    /// Gets the stored value for `key`, or `None` when absent. Absence is
    /// not an error.
    pub async fn secure_get(&self, key: String) -> Result<Option<String>, RuntimeError> {
        self.inner.secure_get(&key).await
    }

    /// Stores `value` under `key`, overwriting any previous value.
    pub async fn secure_set(&self, key: String, value: String) -> Result<(), RuntimeError> {
        self.inner.secure_set(&key, &value).await
    }

    /// Removes `key`. Removing an absent key succeeds.
    pub async fn secure_remove(&self, key: String) -> Result<(), RuntimeError> {
        self.inner.secure_remove(&key).await
    }

    /// Every entry currently in the secure store.
    pub async fn secure_get_all(&self) -> Result<HashMap<String, String>, RuntimeError> {
        self.inner.secure_get_all().await
    }
}

#[cfg_attr(feature = "native-runtime", uniffi::export)]
impl Runtime {
    /// Registers `handler` for `event`. Handlers for one event fire in
    /// registration order; unknown event names register silently.
    pub fn on(&self, event: String, handler: Box<dyn EventHandler>) -> HandlerId {
        self.inner.on(&event, handler.into())
    }

    /// Removes the registration with `handler`, or all registrations for
    /// `event` when `handler` is `None`. No-op when nothing matches.
    pub fn off(&self, event: String, handler: Option<HandlerId>) {
        self.inner.off(&event, handler)
    }

    /// Fires `event` at every registered handler. Native hosts forward real
    /// container events through this; the mock adapter never calls it on
    /// its own, so tests drive it directly.
    pub fn dispatch_event(&self, event: RuntimeEvent) {
        self.inner.dispatch_event(event)
    }

    pub fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }

    pub fn status(&self) -> RuntimeStatus {
        self.inner.status()
    }

    /// Stops the handle. Idempotent; the secure store keeps its contents
    /// until process teardown.
    pub fn shutdown(&self) {
        self.inner.shutdown()
    }

    pub fn set_log_level(&self, level: LogLevel) {
        set_log_level(level)
    }
}
