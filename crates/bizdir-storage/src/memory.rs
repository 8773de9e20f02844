//! In-memory implementation of [`DocumentStore`].
//!
//! [`InMemoryStore`] is a first-class backend for tests and local runs. It
//! keeps the document in the same base64 form the remote uses and performs the
//! token check and the swap under one mutex, so its compare-and-swap behaves
//! exactly like the GitHub backend's.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};

use bizdir_core::BusinessCollection;

use crate::codec;
use crate::error::StorageError;
use crate::token::VersionToken;
use crate::traits::{DocumentStore, RemoteStatus, RepositoryInfo, Snapshot, WriteReceipt};

const MEMORY_PATH: &str = "businesses.json";

#[derive(Debug)]
struct StoredDocument {
    /// Base64 of the document bytes.
    content: String,
    token: VersionToken,
    committed_at: DateTime<Utc>,
    /// Commit messages in order, oldest first.
    commits: Vec<String>,
}

impl StoredDocument {
    fn from_bytes(bytes: &[u8]) -> Self {
        StoredDocument {
            content: STANDARD.encode(bytes),
            token: VersionToken::of_bytes(bytes),
            committed_at: Utc::now(),
            commits: Vec::new(),
        }
    }
}

/// Single-document store held in process memory.
#[derive(Debug)]
pub struct InMemoryStore {
    document: Mutex<StoredDocument>,
    available: AtomicBool,
}

impl InMemoryStore {
    /// Creates a store holding an empty collection.
    pub fn new() -> Self {
        Self::from_raw(b"[]\n")
    }

    /// Creates a store seeded with `collection`.
    pub fn with_collection(collection: &BusinessCollection) -> Result<Self, StorageError> {
        Ok(Self::from_raw(codec::to_document_bytes(collection)?))
    }

    /// Creates a store holding arbitrary bytes, decoded only on read.
    pub fn from_raw(bytes: impl AsRef<[u8]>) -> Self {
        InMemoryStore {
            document: Mutex::new(StoredDocument::from_bytes(bytes.as_ref())),
            available: AtomicBool::new(true),
        }
    }

    /// Simulates the remote going away (`false`) or coming back (`true`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Token of the currently stored document.
    pub fn current_token(&self) -> VersionToken {
        self.lock().token.clone()
    }

    /// Decodes the currently stored document.
    pub fn collection(&self) -> Result<BusinessCollection, StorageError> {
        codec::decode_document(&self.lock().content)
    }

    /// Raw bytes of the currently stored document.
    pub fn document_bytes(&self) -> Result<Vec<u8>, StorageError> {
        codec::decode_content(&self.lock().content)
    }

    /// Commit messages of every successful write, oldest first.
    pub fn commit_messages(&self) -> Vec<String> {
        self.lock().commits.clone()
    }

    pub fn commit_count(&self) -> usize {
        self.lock().commits.len()
    }

    fn lock(&self) -> MutexGuard<'_, StoredDocument> {
        self.document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn ensure_available(&self) -> Result<(), StorageError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StorageError::RemoteUnavailable {
                status: Some(503),
                message: "in-memory store marked unavailable".to_string(),
            })
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    fn location(&self) -> String {
        format!("memory:{}", MEMORY_PATH)
    }

    async fn read(&self) -> Result<Snapshot, StorageError> {
        self.ensure_available()?;
        let (content, token, committed_at) = {
            let doc = self.lock();
            (doc.content.clone(), doc.token.clone(), doc.committed_at)
        };
        Ok(Snapshot {
            collection: codec::decode_document(&content)?,
            token,
            last_updated: Some(committed_at),
        })
    }

    async fn write(
        &self,
        collection: &BusinessCollection,
        token: &VersionToken,
        message: &str,
    ) -> Result<WriteReceipt, StorageError> {
        self.ensure_available()?;
        let bytes = codec::to_document_bytes(collection)?;

        let mut doc = self.lock();
        if doc.token != *token {
            return Err(StorageError::VersionConflict {
                token: token.clone(),
            });
        }

        // Commit sequence is part of the token so that rewriting identical
        // bytes still supersedes every earlier token.
        let mut hasher = blake3::Hasher::new();
        hasher.update(&bytes);
        hasher.update(&(doc.commits.len() as u64 + 1).to_le_bytes());
        let new_token = VersionToken::new(hasher.finalize().to_hex().to_string());

        doc.content = STANDARD.encode(&bytes);
        doc.token = new_token.clone();
        doc.committed_at = Utc::now();
        doc.commits.push(message.to_string());

        Ok(WriteReceipt {
            token: new_token,
            committed_at: Some(doc.committed_at),
        })
    }

    async fn probe(&self) -> Result<RemoteStatus, StorageError> {
        self.ensure_available()?;
        Ok(RemoteStatus {
            repository: RepositoryInfo {
                name: "memory".to_string(),
                full_name: "local/memory".to_string(),
                private: true,
                last_push: Some(self.lock().committed_at),
            },
            path: MEMORY_PATH.to_string(),
            file_exists: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizdir_core::{BusinessFields, BusinessId, BusinessRecord};

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(future)
    }

    fn sample() -> BusinessCollection {
        BusinessCollection::new(vec![BusinessRecord::new(
            BusinessId(1),
            BusinessFields::named("Soul Food Kitchen", "Restaurant"),
        )])
    }

    #[test]
    fn read_returns_seeded_collection() {
        let store = InMemoryStore::with_collection(&sample()).unwrap();
        let snapshot = block_on(store.read()).unwrap();
        assert_eq!(snapshot.collection, sample());
        assert_eq!(snapshot.token, store.current_token());
    }

    #[test]
    fn write_with_current_token_advances_token() {
        let store = InMemoryStore::new();
        let snapshot = block_on(store.read()).unwrap();

        let receipt = block_on(store.write(&sample(), &snapshot.token, "Add business: Soul Food Kitchen"))
            .unwrap();
        assert_ne!(receipt.token, snapshot.token);
        assert_eq!(store.current_token(), receipt.token);
        assert_eq!(store.collection().unwrap(), sample());
        assert_eq!(store.commit_messages(), vec!["Add business: Soul Food Kitchen"]);
    }

    #[test]
    fn superseded_token_is_rejected() {
        let store = InMemoryStore::new();
        let stale = block_on(store.read()).unwrap().token;
        block_on(store.write(&sample(), &stale, "first")).unwrap();

        let err = block_on(store.write(&BusinessCollection::default(), &stale, "second")).unwrap_err();
        assert!(matches!(err, StorageError::VersionConflict { .. }));
        assert_eq!(store.collection().unwrap(), sample());
        assert_eq!(store.commit_count(), 1);
    }

    #[test]
    fn rewriting_identical_content_still_supersedes_token() {
        let store = InMemoryStore::with_collection(&sample()).unwrap();
        let first = block_on(store.read()).unwrap().token;
        let second = block_on(store.write(&sample(), &first, "noop")).unwrap().token;
        assert_ne!(first, second);

        let err = block_on(store.write(&sample(), &first, "stale")).unwrap_err();
        assert!(matches!(err, StorageError::VersionConflict { .. }));
    }

    #[test]
    fn malformed_document_fails_decode() {
        let store = InMemoryStore::from_raw(b"{ not json");
        let err = block_on(store.read()).unwrap_err();
        assert!(matches!(err, StorageError::Decode { .. }));
    }

    #[test]
    fn unavailable_store_fails_reads_and_writes() {
        let store = InMemoryStore::new();
        let token = store.current_token();
        store.set_available(false);

        assert!(matches!(
            block_on(store.read()).unwrap_err(),
            StorageError::RemoteUnavailable { .. }
        ));
        assert!(matches!(
            block_on(store.write(&sample(), &token, "x")).unwrap_err(),
            StorageError::RemoteUnavailable { .. }
        ));
        assert_eq!(store.commit_count(), 0);
    }
}
