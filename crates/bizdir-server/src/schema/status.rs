//! Response type for `GET /status`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use bizdir_storage::RepositoryInfo;

/// Overall state of the remote integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationState {
    /// Remote reachable and authorised.
    Active,
    /// Configured but the remote check failed.
    Error,
    /// No access token configured.
    Disabled,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileStatus {
    pub exists: bool,
    pub path: String,
}

/// Integration health report. Always served with status 200.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: IntegrationState,
    pub message: String,
    pub has_token: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<RepositoryInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<FileStatus>,
    pub timestamp: DateTime<Utc>,
}
