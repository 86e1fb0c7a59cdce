//! Build-time binding of the platform adapter.
//!
//! Application code names [PlatformAdapter] and nothing else; the cargo
//! feature set decides which implementation that is. A build with no
//! adapter feature fails here, at compile time, instead of at the first
//! capability call in production.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::RuntimeError,
    runtime::RuntimeConfiguration,
    store::SecureStore,
    transport::{HttpResponse, RequestOptions},
};

pub mod mock;
#[cfg(feature = "native-runtime")]
pub mod native;

/// The capability seam both adapters satisfy. The runtime facade drives
/// whichever implementation the build bound; swapping the binding requires
/// no change to calling code.
// Browser request futures hold JS values and cannot be Send.
#[cfg_attr(target_family = "wasm", async_trait(?Send))]
#[cfg_attr(not(target_family = "wasm"), async_trait)]
pub trait RuntimeAdapter: Send + Sync {
    /// Performs process-wide setup. Resolves exactly once per call, with
    /// exactly one of success or failure.
    async fn start(&self, config: &RuntimeConfiguration) -> Result<(), RuntimeError>;

    fn is_ready(&self) -> bool;

    /// Performs one request. Resolves exactly once, success or failure;
    /// there is no cancellation for an in-flight request.
    async fn send_request(&self, request: RequestOptions) -> Result<HttpResponse, RuntimeError>;

    /// The adapter's secure key-value store.
    fn store(&self) -> Arc<dyn SecureStore>;
}

#[cfg(feature = "native-runtime")]
pub use native::NativeAdapter as PlatformAdapter;

#[cfg(all(feature = "browser", not(feature = "native-runtime")))]
pub use mock::MockAdapter as PlatformAdapter;

#[cfg(not(any(feature = "native-runtime", feature = "browser")))]
compile_error!(
    "No platform adapter is bound: enable the `native-runtime` feature for device builds or `browser` for web builds"
);
