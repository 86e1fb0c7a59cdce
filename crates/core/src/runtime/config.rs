use std::{collections::HashMap, sync::Arc};

use crate::callbacks::{LifecycleBridge, SecureStoreBackend, TransportBridge};

#[derive(uniffi::Enum, Debug, Clone, Default, Copy)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

const IOS: &str = "ios";
const ANDROID: &str = "android";
const WEB: &str = "web";

/// The `platform` activation parameter passed to the container runtime on
/// start. Activation flows differ per platform family.
#[derive(uniffi::Enum, Debug, Clone, PartialEq)]
pub enum Platform {
    Apple,
    Android,
    Web,
    Other(String),
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Apple => f.write_str(IOS),
            Platform::Android => f.write_str(ANDROID),
            Platform::Web => f.write_str(WEB),
            Platform::Other(o) => f.write_str(o),
        }
    }
}

impl From<String> for Platform {
    fn from(value: String) -> Self {
        match value.as_str() {
            IOS => Platform::Apple,
            ANDROID => Platform::Android,
            WEB => Platform::Web,
            _ => Platform::Other(value),
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        // this could be cfg blocks but clippy complains
        if cfg!(target_vendor = "apple") {
            Platform::Apple
        } else if cfg!(target_os = "android") {
            Platform::Android
        } else if cfg!(target_family = "wasm") {
            Platform::Web
        } else {
            Platform::Other("undefined_platform".to_string())
        }
    }
}

pub(crate) const DEFAULT_REQUEST_TIMEOUT: u64 = 30_000;

#[derive(Clone)]
pub struct RuntimeConfiguration {
    /// Application identifier the container runtime activates under.
    pub app_id: String,
    /// Free-form activation parameters forwarded to the runtime on start.
    pub params: HashMap<String, String>,
    /// Brings the native container up. Required by the native adapter,
    /// ignored by the mock.
    pub lifecycle_bridge: Option<Arc<dyn LifecycleBridge>>,
    /// Executes requests through the native secure transport. Required by
    /// the native adapter, ignored by the mock.
    pub transport_bridge: Option<Arc<dyn TransportBridge>>,
    /// Secure key-value backing for the native adapter; the mock keeps its
    /// own in-memory store.
    pub store_backend: Option<Arc<dyn SecureStoreBackend>>,
    /// Initial log level - defaults to [LogLevel::Info]
    pub log_level: LogLevel,
    /// Timeout applied to the convenience request helpers, in milliseconds.
    pub request_timeout_ms: u64,
    /// The activation platform passed on start.
    pub platform: Platform,
}

impl Default for RuntimeConfiguration {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            params: HashMap::new(),
            lifecycle_bridge: None,
            transport_bridge: None,
            store_backend: None,
            log_level: LogLevel::default(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT,
            platform: Platform::default(),
        }
    }
}

impl std::fmt::Debug for RuntimeConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeConfiguration")
            .field("app_id", &self.app_id)
            .field("params", &self.params)
            .field(
                "lifecycle_bridge",
                &self.lifecycle_bridge.is_some().then_some("..."),
            )
            .field(
                "transport_bridge",
                &self.transport_bridge.is_some().then_some("..."),
            )
            .field(
                "store_backend",
                &self.store_backend.is_some().then_some("..."),
            )
            .field("log_level", &self.log_level)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("platform", &self.platform)
            .finish()
    }
}
