//! Opaque version tokens.
//!
//! For the GitHub backend the token is the blob SHA the contents API reports.
//! The in-memory backend derives its tokens from the stored bytes with
//! blake3.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies the exact byte state of the stored document at read time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionToken(pub String);

impl VersionToken {
    pub fn new(raw: impl Into<String>) -> Self {
        VersionToken(raw.into())
    }

    /// Content hash of `bytes` as a lowercase hex token.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        VersionToken(blake3::hash(bytes).to_hex().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
