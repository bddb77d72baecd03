use thiserror::Error;

use std::fmt;

/// Errors reported by the remote interview service (or its transport).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("remote service returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("entity not found")]
    NotFound,

    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Which sticky error flag an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Collection or focal entity fetch failed.
    Initialization,
    /// Interview creation failed.
    Create,
    /// A dependent sub-resource fetch failed.
    Dependents,
    /// A mutating call failed; nothing was applied locally.
    Update,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Initialization => write!(f, "initialization"),
            ErrorKind::Create => write!(f, "create"),
            ErrorKind::Dependents => write!(f, "dependents"),
            ErrorKind::Update => write!(f, "update"),
        }
    }
}

/// Errors returned by store actions.
///
/// Variants that wrap a [`ServiceError`] normally also raise the matching
/// sticky flag, so views that only read state see the failure too. The
/// exception is a replay transcript that fails to open: it is reported as
/// [`StoreError::Dependents`] without flagging the listing, which stays valid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("initialization failed: {0}")]
    Initialization(ServiceError),

    #[error("create failed: {0}")]
    Create(ServiceError),

    #[error("dependent fetch failed: {0}")]
    Dependents(ServiceError),

    #[error("update failed: {0}")]
    Update(ServiceError),

    #[error("{0} error flag must be cleared before retrying")]
    UnclearedError(ErrorKind),

    #[error("no focal entity loaded")]
    NotLoaded,

    #[error("update contains no fields")]
    EmptyPatch,

    #[error("a sentiment filter requires a tag filter")]
    SentimentWithoutTag,

    #[error("response is not part of this interview")]
    UnknownResponse,
}

impl StoreError {
    /// The flag this error raised, if any.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            StoreError::Initialization(_) => Some(ErrorKind::Initialization),
            StoreError::Create(_) => Some(ErrorKind::Create),
            StoreError::Dependents(_) => Some(ErrorKind::Dependents),
            StoreError::Update(_) => Some(ErrorKind::Update),
            _ => None,
        }
    }
}
