//! The [`DocumentStore`] trait defining the storage contract.
//!
//! A store holds exactly one document. `read` and `write` together form a
//! compare-and-swap: `write` only succeeds when the token it is handed is the
//! token of the document currently stored. Backends never retry and never
//! cache; every `read` goes to the source of truth.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use bizdir_core::BusinessCollection;

use crate::error::StorageError;
use crate::token::VersionToken;

/// The document as read, with the token needed to write it back.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub collection: BusinessCollection,
    pub token: VersionToken,
    /// Time of the commit that produced this state, when the backend knows it.
    pub last_updated: Option<DateTime<Utc>>,
}

/// Result of a successful write.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteReceipt {
    /// Token of the newly stored document.
    pub token: VersionToken,
    pub committed_at: Option<DateTime<Utc>>,
}

/// Repository metadata reported by [`DocumentStore::probe`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryInfo {
    pub name: String,
    pub full_name: String,
    pub private: bool,
    pub last_push: Option<DateTime<Utc>>,
}

/// Reachability report for the backing store.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteStatus {
    pub repository: RepositoryInfo,
    /// Path of the document inside the repository.
    pub path: String,
    pub file_exists: bool,
}

/// The storage contract for the directory document.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Human-readable location of the document, for logs.
    fn location(&self) -> String;

    /// Fetches and decodes the current document and its version token.
    async fn read(&self) -> Result<Snapshot, StorageError>;

    /// Replaces the document with `collection` if `token` still names the
    /// stored state.
    async fn write(
        &self,
        collection: &BusinessCollection,
        token: &VersionToken,
        message: &str,
    ) -> Result<WriteReceipt, StorageError>;

    /// Checks that the repository and document are reachable.
    async fn probe(&self) -> Result<RemoteStatus, StorageError>;
}
