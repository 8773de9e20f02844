//! Directory service: the operations behind every handler.
//!
//! [`DirectoryService`] ties the document store, the admin gate and the
//! optimistic controller together. Handlers stay thin and only translate
//! between HTTP and these methods; the CLI calls the same methods directly.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use bizdir_core::{mutate, BusinessCollection, BusinessRecord, Mutation};
use bizdir_storage::{DocumentStore, RemoteStatus, VersionToken};

use crate::auth::AdminGate;
use crate::concurrency::{Committed, OptimisticController, PlannedWrite};
use crate::error::ApiError;

/// The directory as currently stored.
#[derive(Debug, Clone)]
pub struct Listing {
    pub collection: BusinessCollection,
    pub token: VersionToken,
    pub last_updated: DateTime<Utc>,
}

/// Directory operations over one document store.
#[derive(Clone)]
pub struct DirectoryService {
    store: Arc<dyn DocumentStore>,
    controller: OptimisticController,
    gate: Arc<dyn AdminGate>,
}

impl DirectoryService {
    pub fn new(store: Arc<dyn DocumentStore>, gate: Arc<dyn AdminGate>) -> Self {
        DirectoryService {
            controller: OptimisticController::new(store.clone()),
            store,
            gate,
        }
    }

    /// Where the document lives, for logs and status output.
    pub fn location(&self) -> String {
        self.store.location()
    }

    /// Reads the full directory. Open to everyone.
    pub async fn list(&self) -> Result<Listing, ApiError> {
        let snapshot = self.store.read().await?;
        Ok(Listing {
            collection: snapshot.collection,
            token: snapshot.token,
            last_updated: snapshot.last_updated.unwrap_or_else(Utc::now),
        })
    }

    /// Runs one mutation end to end.
    ///
    /// The credential is checked first; `decode_payload` only runs once the
    /// caller is admitted, so a bad credential is reported even when the
    /// payload is also bad. The store is never touched on either failure.
    pub async fn execute<F>(
        &self,
        credential: Option<&str>,
        decode_payload: F,
    ) -> Result<Committed<BusinessRecord>, ApiError>
    where
        F: FnOnce() -> Result<Mutation, ApiError> + Send,
    {
        self.gate.verify(credential)?;
        let mutation = decode_payload()?;
        let today = Utc::now().date_naive();

        tracing::debug!(verb = mutation.verb(), "executing directory mutation");

        self.controller
            .commit(move |current| {
                let message_for = mutation.clone();
                let outcome = mutate::apply(current, mutation, today)?;
                Ok(PlannedWrite {
                    message: message_for.commit_message(&outcome.record),
                    collection: outcome.collection,
                    value: outcome.record,
                })
            })
            .await
    }

    /// Checks the backing repository and document.
    pub async fn status(&self) -> Result<RemoteStatus, ApiError> {
        Ok(self.store.probe().await?)
    }
}
