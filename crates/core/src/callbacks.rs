use std::collections::HashMap;

use crate::{
    error::{SetupError, StoreError, TransportError},
    events::RuntimeEvent,
    transport::{HttpResponse, RequestOptions},
};

/// Receives runtime events the host subscribed to with [Runtime::on].
///
/// Handlers registered for one event name are all invoked, in registration
/// order, each time that name fires. They persist until removed with
/// [Runtime::off] or process teardown.
///
/// [Runtime::on]: crate::runtime::Runtime::on
/// [Runtime::off]: crate::runtime::Runtime::off
#[cfg_attr(feature = "native-runtime", uniffi::export(callback_interface))]
pub trait EventHandler: Send + Sync {
    fn on_event(&self, event: RuntimeEvent);
}

/// The distilled start configuration handed to the native container runtime.
#[derive(Clone, Debug, PartialEq, uniffi::Record)]
pub struct StartConfig {
    pub app_id: String,
    /// Free-form activation parameters; keys vary by platform SDK version.
    pub params: HashMap<String, String>,
}

/// Brings the native container runtime up and answers readiness queries.
/// Implementations wrap the platform SDK's application object; `start` may
/// block until the container is authorized, so the core calls it from a
/// blocking-capable thread rather than an async worker.
#[cfg_attr(feature = "native-runtime", uniffi::export(callback_interface))]
pub trait LifecycleBridge: Send + Sync {
    fn start(&self, config: StartConfig) -> Result<(), SetupError>;

    fn is_ready(&self) -> bool;
}

/// Executes one request through the native runtime's secure transport.
/// Errors come back verbatim; the core does not retry or reinterpret them.
#[cfg_attr(feature = "native-runtime", uniffi::export(callback_interface))]
pub trait TransportBridge: Send + Sync {
    fn send(&self, request: RequestOptions) -> Result<HttpResponse, TransportError>;
}

/// Provides secure persistent key-value storage for the runtime.
/// Implementations should use platform-secure backing (Keychain on Apple
/// targets, Keystore-sealed storage on Android) as values may include
/// session tokens.
#[cfg_attr(feature = "native-runtime", uniffi::export(callback_interface))]
pub trait SecureStoreBackend: Send + Sync {
    /// Gets the value for the given key, or None if not found.
    fn get(&self, key: String) -> Result<Option<String>, StoreError>;

    /// Sets the value for the given key, overwriting any previous value.
    fn set(&self, key: String, value: String) -> Result<(), StoreError>;

    /// Removes the entry for the given key. Removing an absent key succeeds.
    fn remove(&self, key: String) -> Result<(), StoreError>;

    /// Returns every entry currently stored.
    fn get_all(&self) -> Result<HashMap<String, String>, StoreError>;
}
