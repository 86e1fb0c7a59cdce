pub mod callbacks;
pub mod error;
pub mod events;
pub mod platform;
pub mod runtime;
pub mod store;
pub mod transport;

pub use self::{
    callbacks::{EventHandler, LifecycleBridge, SecureStoreBackend, StartConfig, TransportBridge},
    error::{RuntimeError, SetupError, StoreError, TransportError},
    events::{EventPayload, HandlerId, RuntimeEvent},
    platform::PlatformAdapter,
    runtime::{
        shared_runtime, LogLevel, Platform, Runtime, RuntimeBuilder, RuntimeConfiguration,
        RuntimeStatus,
    },
    store::{MemoryStore, SecureStore},
    transport::{HttpResponse, Method, RequestOptions},
};

uniffi::setup_scaffolding!();
