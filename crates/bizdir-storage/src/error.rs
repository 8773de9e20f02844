//! Storage error types for bizdir-storage.
//!
//! [`StorageError`] covers every way a read or write against the document
//! store can fail: the remote being unreachable or refusing us, the stored
//! bytes not decoding, and losing a compare-and-swap race.

use thiserror::Error;

use crate::token::VersionToken;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Transport failure, auth failure, or an unexpected status code.
    #[error("remote unavailable: {message}")]
    RemoteUnavailable {
        /// HTTP status returned by the remote, when one was received.
        status: Option<u16>,
        message: String,
    },

    /// The stored document does not decode into a business collection.
    #[error("stored document could not be decoded: {reason}")]
    Decode { reason: String },

    /// The supplied version token no longer matches the stored document.
    #[error("version conflict: document changed since token {token} was read")]
    VersionConflict { token: VersionToken },

    /// JSON serialization of an outgoing document failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        StorageError::RemoteUnavailable {
            status: err.status().map(|s| s.as_u16()),
            message: format!("request failed: {}", err),
        }
    }

    pub(crate) fn decode(reason: impl Into<String>) -> Self {
        StorageError::Decode {
            reason: reason.into(),
        }
    }
}
