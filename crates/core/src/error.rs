//! Error taxonomy for the capability surface.
//!
//! Failures reach hosts exclusively through these enums; nothing on the
//! capability surface panics or leaks a foreign exception across the FFI
//! boundary. A missing store key is not an error, it is a successful `None`.

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Setup {
        #[from]
        error: SetupError,
    },

    #[error(transparent)]
    Transport {
        #[from]
        error: TransportError,
    },

    #[error(transparent)]
    Storage {
        #[from]
        error: StoreError,
    },
}

/// Failures while bringing the container runtime up (or using it too early).
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum SetupError {
    #[error("Runtime was already started.")]
    AlreadyStarted,

    #[error("A shared runtime was already installed for this process.")]
    AlreadyInstalled,

    #[error("Runtime has not been started.")]
    NotStarted,

    #[error("No {bridge} bridge was configured before building the runtime.")]
    MissingBridge { bridge: String },

    #[error("Container start was rejected - {error}")]
    Rejected { error: String },

    #[error("Host callback failed - {error}")]
    Callback { error: String },
}

/// Failures from a single request. Exactly one of `Ok`/`Err` resolves every
/// send; a timeout is its own kind so hosts can branch on it.
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum TransportError {
    #[error("Request timed out.")]
    Timeout,

    #[error("Network failure - {error}")]
    Network { error: String },

    #[error("Invalid request - {error}")]
    InvalidRequest { error: String },

    #[error("Host callback failed - {error}")]
    Callback { error: String },
}

/// Failures from the secure store's backing mechanism.
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum StoreError {
    #[error("Backing store failure - {error}")]
    Backend { error: String },

    #[error("Host callback failed - {error}")]
    Callback { error: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            TransportError::Timeout
        } else if value.is_builder() {
            TransportError::InvalidRequest {
                error: value.to_string(),
            }
        } else {
            TransportError::Network {
                error: value.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for RuntimeError {
    fn from(value: reqwest::Error) -> Self {
        Self::from(TransportError::from(value))
    }
}

// Fallible callback interface methods need somewhere to put a host-side
// failure uniffi itself could not translate.
impl From<uniffi::UnexpectedUniFFICallbackError> for SetupError {
    fn from(value: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::Callback {
            error: value.reason,
        }
    }
}

impl From<uniffi::UnexpectedUniFFICallbackError> for TransportError {
    fn from(value: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::Callback {
            error: value.reason,
        }
    }
}

impl From<uniffi::UnexpectedUniFFICallbackError> for StoreError {
    fn from(value: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::Callback {
            error: value.reason,
        }
    }
}
