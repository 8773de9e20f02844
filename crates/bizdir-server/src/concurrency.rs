//! Optimistic concurrency for directory mutations.
//!
//! [`OptimisticController::commit`] is a one-shot compare-and-swap: read the
//! document and its token, compute the next document with a pure function,
//! write it back guarded by the token. A lost race surfaces as
//! [`ApiError::VersionConflict`]; nothing here retries.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use bizdir_core::{BusinessCollection, CoreError};
use bizdir_storage::{DocumentStore, StorageError, VersionToken};

use crate::error::ApiError;

/// The next document state computed from the current one.
#[derive(Debug, Clone)]
pub struct PlannedWrite<T> {
    pub collection: BusinessCollection,
    /// Value handed back to the caller once the write lands.
    pub value: T,
    pub message: String,
}

/// A write that landed.
#[derive(Debug, Clone)]
pub struct Committed<T> {
    pub value: T,
    /// Token of the document as written.
    pub token: VersionToken,
    pub committed_at: Option<DateTime<Utc>>,
}

/// Runs read-mutate-write cycles against a [`DocumentStore`].
#[derive(Clone)]
pub struct OptimisticController {
    store: Arc<dyn DocumentStore>,
}

impl OptimisticController {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        OptimisticController { store }
    }

    /// Reads the document, applies `plan`, and writes the result back with
    /// the token from the read.
    ///
    /// If `plan` fails, nothing is written.
    pub async fn commit<T, F>(&self, plan: F) -> Result<Committed<T>, ApiError>
    where
        F: FnOnce(&BusinessCollection) -> Result<PlannedWrite<T>, CoreError> + Send,
        T: Send,
    {
        let snapshot = self.store.read().await?;
        tracing::debug!(
            token = %snapshot.token,
            records = snapshot.collection.len(),
            "planning directory write"
        );

        let planned = plan(&snapshot.collection)?;

        match self
            .store
            .write(&planned.collection, &snapshot.token, &planned.message)
            .await
        {
            Ok(receipt) => {
                tracing::info!(
                    location = %self.store.location(),
                    message = %planned.message,
                    token = %receipt.token,
                    records = planned.collection.len(),
                    "committed directory document"
                );
                Ok(Committed {
                    value: planned.value,
                    token: receipt.token,
                    committed_at: receipt.committed_at,
                })
            }
            Err(err @ StorageError::VersionConflict { .. }) => {
                tracing::warn!(
                    location = %self.store.location(),
                    message = %planned.message,
                    "directory changed since read; write abandoned"
                );
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bizdir_core::{BusinessFields, BusinessId, BusinessRecord};
    use bizdir_storage::{InMemoryStore, RemoteStatus, Snapshot, WriteReceipt};

    fn sample() -> BusinessCollection {
        BusinessCollection::new(vec![BusinessRecord::new(
            BusinessId(1),
            BusinessFields::named("Soul Food Kitchen", "Restaurant"),
        )])
    }

    fn append(id: u64) -> impl FnOnce(&BusinessCollection) -> Result<PlannedWrite<BusinessId>, CoreError> + Send {
        move |current| {
            let mut records = current.records().to_vec();
            records.push(BusinessRecord::new(
                BusinessId(id),
                BusinessFields::named("Appended", "Retail"),
            ));
            Ok(PlannedWrite {
                collection: BusinessCollection::new(records),
                value: BusinessId(id),
                message: format!("append {id}"),
            })
        }
    }

    /// Lets another writer commit between this store's read and the
    /// caller's write.
    struct InterleavedStore {
        inner: InMemoryStore,
    }

    #[async_trait]
    impl DocumentStore for InterleavedStore {
        fn location(&self) -> String {
            self.inner.location()
        }

        async fn read(&self) -> Result<Snapshot, StorageError> {
            let snapshot = self.inner.read().await?;
            self.inner
                .write(&BusinessCollection::default(), &snapshot.token, "intruder")
                .await?;
            Ok(snapshot)
        }

        async fn write(
            &self,
            collection: &BusinessCollection,
            token: &VersionToken,
            message: &str,
        ) -> Result<WriteReceipt, StorageError> {
            self.inner.write(collection, token, message).await
        }

        async fn probe(&self) -> Result<RemoteStatus, StorageError> {
            self.inner.probe().await
        }
    }

    #[tokio::test]
    async fn commit_writes_planned_collection() {
        let store = Arc::new(InMemoryStore::with_collection(&sample()).unwrap());
        let controller = OptimisticController::new(store.clone());

        let committed = controller.commit(append(2)).await.unwrap();
        assert_eq!(committed.value, BusinessId(2));
        assert_eq!(committed.token, store.current_token());
        assert_eq!(
            store.collection().unwrap().ids(),
            vec![BusinessId(1), BusinessId(2)]
        );
        assert_eq!(store.commit_messages(), vec!["append 2"]);
    }

    #[tokio::test]
    async fn failed_plan_writes_nothing() {
        let store = Arc::new(InMemoryStore::with_collection(&sample()).unwrap());
        let controller = OptimisticController::new(store.clone());

        let err = controller
            .commit(|_: &BusinessCollection| -> Result<PlannedWrite<()>, CoreError> {
                Err(CoreError::NotFound { id: BusinessId(9) })
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(store.commit_count(), 0);
    }

    #[tokio::test]
    async fn lost_race_is_not_retried() {
        let store = Arc::new(InterleavedStore {
            inner: InMemoryStore::with_collection(&sample()).unwrap(),
        });
        let controller = OptimisticController::new(store.clone());

        let err = controller.commit(append(2)).await.unwrap_err();
        assert!(matches!(err, ApiError::VersionConflict(_)), "{err:?}");

        // Only the intruder's commit landed.
        assert_eq!(store.inner.commit_messages(), vec!["intruder"]);
        assert!(store.inner.collection().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unavailable_store_fails_before_planning() {
        let store = Arc::new(InMemoryStore::new());
        store.set_available(false);
        let controller = OptimisticController::new(store.clone());

        let err = controller.commit(append(1)).await.unwrap_err();
        assert!(matches!(err, ApiError::RemoteUnavailable(_)));
    }
}
