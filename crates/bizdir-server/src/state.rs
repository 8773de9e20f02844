//! Application state shared by all handlers.
//!
//! [`AppState`] holds the [`DirectoryService`] behind an `Arc`. Nothing in it
//! is mutable: the remote document is the only state, and concurrent writers
//! are serialised by its version token, not by an in-process lock.

use std::sync::Arc;

use bizdir_storage::{DocumentStore, GitHubContentStore, InMemoryStore};

use crate::auth::{AdminGate, SharedSecretGate};
use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::service::DirectoryService;

const NOT_CONFIGURED: &str =
    "GitHub integration not configured: GitHub token not found in environment variables";

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no remote access token is configured.
    service: Option<Arc<DirectoryService>>,
}

impl AppState {
    /// Builds state from server configuration. Without a remote config the
    /// directory routes answer with a configuration error.
    pub fn from_config(config: &ServerConfig) -> Result<Self, ApiError> {
        let Some(remote) = config.remote.clone() else {
            tracing::warn!("GITHUB_TOKEN not set; directory routes are disabled");
            return Ok(Self::unconfigured());
        };
        if config.admin_password.is_none() {
            tracing::warn!("ADMIN_PASSWORD not set; all mutations will be refused");
        }

        let store = GitHubContentStore::new(remote)?;
        let gate = SharedSecretGate::from_config(config.admin_password.clone());
        Ok(Self::with_store(Arc::new(store), Arc::new(gate)))
    }

    /// State over an arbitrary store and gate.
    pub fn with_store(store: Arc<dyn DocumentStore>, gate: Arc<dyn AdminGate>) -> Self {
        AppState {
            service: Some(Arc::new(DirectoryService::new(store, gate))),
        }
    }

    /// State over an in-memory store guarded by `admin_password`.
    pub fn in_memory(store: Arc<InMemoryStore>, admin_password: &str) -> Self {
        Self::with_store(store, Arc::new(SharedSecretGate::new(admin_password)))
    }

    /// State with no backing store.
    pub fn unconfigured() -> Self {
        AppState { service: None }
    }

    pub fn is_configured(&self) -> bool {
        self.service.is_some()
    }

    /// The directory service, or a configuration error when no store is set.
    pub fn service(&self) -> Result<Arc<DirectoryService>, ApiError> {
        self.service
            .clone()
            .ok_or_else(|| ApiError::Configuration(NOT_CONFIGURED.to_string()))
    }
}
