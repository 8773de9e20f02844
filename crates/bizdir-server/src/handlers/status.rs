//! Integration status handler.

use axum::extract::State;
use axum::Json;
use chrono::Utc;

use crate::schema::status::{FileStatus, IntegrationState, StatusResponse};
use crate::state::AppState;

/// Reports whether the remote store is configured and reachable.
///
/// `GET /status`. Always 200; failures are described in the body.
pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let service = match state.service() {
        Ok(service) => service,
        Err(_) => {
            return Json(StatusResponse {
                status: IntegrationState::Disabled,
                message: "GitHub integration disabled: no access token configured".to_string(),
                has_token: false,
                repository: None,
                file: None,
                timestamp: Utc::now(),
            })
        }
    };

    let response = match service.status().await {
        Ok(remote) => StatusResponse {
            status: IntegrationState::Active,
            message: format!("GitHub integration active for {}", service.location()),
            has_token: true,
            repository: Some(remote.repository),
            file: Some(FileStatus {
                exists: remote.file_exists,
                path: remote.path,
            }),
            timestamp: Utc::now(),
        },
        Err(err) => {
            tracing::warn!(error = %err, "status probe failed");
            StatusResponse {
                status: IntegrationState::Error,
                message: format!("GitHub integration error: {}", err.detail().message),
                has_token: true,
                repository: None,
                file: None,
                timestamp: Utc::now(),
            }
        }
    };
    Json(response)
}
