//! Error types for the voice-sample library.
//!
//! Messages are stable and safe to log: payload bytes never appear in them,
//! only lengths and identifiers.

use crate::codec::DecodeError;

/// Top-level error type for the sample library.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    /// Malformed codec input.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The remote catalog could not be reached or answered with an error.
    #[error("remote catalog unreachable: {0}")]
    Unreachable(String),

    /// No retrievable payload exists for the given sample.
    #[error("sample not found: {0}")]
    NotFound(String),

    /// Writing the local store failed (quota exceeded, I/O error).
    #[error("persistence write failed: {0}")]
    PersistenceWrite(String),

    /// A caller passed a structurally invalid sample id.
    #[error("invalid sample id")]
    InvalidId,

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LibraryError {
    /// Returns `true` for failures that have a defined fallback
    /// (empty list, local-only operation, missing payload).
    ///
    /// Programmer and configuration errors are not recoverable.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Decode(_) | Self::Unreachable(_) | Self::NotFound(_) | Self::PersistenceWrite(_)
        )
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, LibraryError>;
