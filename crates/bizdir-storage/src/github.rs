//! GitHub contents API backend.
//!
//! The document is a file in a repository. Reading returns the base64 file
//! content and its blob SHA; writing is a `PUT` carrying the previous SHA,
//! which GitHub rejects with `409 Conflict` when the file has moved on.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

use bizdir_core::BusinessCollection;

use crate::codec;
use crate::error::StorageError;
use crate::token::VersionToken;
use crate::traits::{DocumentStore, RemoteStatus, RepositoryInfo, Snapshot, WriteReceipt};

const USER_AGENT: &str = "bizdir-document-store";
const ACCEPT: &str = "application/vnd.github.v3+json";

/// Where the document lives and how to authenticate.
#[derive(Clone)]
pub struct RemoteConfig {
    /// API root, `https://api.github.com` outside tests.
    pub api_base: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// Path of the JSON document inside the repository.
    pub path: String,
    /// Access token sent as `Authorization: token …`.
    pub token: String,
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("api_base", &self.api_base)
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl RemoteConfig {
    fn repo_url(&self) -> String {
        format!(
            "{}/repos/{}/{}",
            self.api_base.trim_end_matches('/'),
            self.owner,
            self.repo
        )
    }

    fn contents_url(&self) -> String {
        format!(
            "{}/contents/{}",
            self.repo_url(),
            self.path.trim_start_matches('/')
        )
    }
}

/// [`DocumentStore`] backed by a file in a GitHub repository.
#[derive(Debug, Clone)]
pub struct GitHubContentStore {
    config: RemoteConfig,
    client: Client,
}

impl GitHubContentStore {
    pub fn new(config: RemoteConfig) -> Result<Self, StorageError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(StorageError::transport)?;
        Ok(GitHubContentStore { config, client })
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("Authorization", format!("token {}", self.config.token))
            .header("Accept", ACCEPT)
    }

    async fn fetch_envelope(&self) -> Result<ContentEnvelope, StorageError> {
        let response = self
            .authorized(self.client.get(self.config.contents_url()))
            .query(&[("ref", self.config.branch.as_str())])
            .send()
            .await
            .map_err(StorageError::transport)?;

        let response = ensure_success(response, "read").await?;
        response
            .json::<ContentEnvelope>()
            .await
            .map_err(|e| StorageError::decode(format!("unexpected contents response: {}", e)))
    }
}

#[async_trait]
impl DocumentStore for GitHubContentStore {
    fn location(&self) -> String {
        format!(
            "{}/{}:{}@{}",
            self.config.owner, self.config.repo, self.config.path, self.config.branch
        )
    }

    async fn read(&self) -> Result<Snapshot, StorageError> {
        let envelope = self.fetch_envelope().await?;

        if let Some(encoding) = envelope.encoding.as_deref() {
            if encoding != "base64" {
                return Err(StorageError::decode(format!(
                    "unsupported content encoding '{}'",
                    encoding
                )));
            }
        }

        let collection = codec::decode_document(&envelope.content)?;
        tracing::debug!(
            location = %self.location(),
            sha = %envelope.sha,
            records = collection.len(),
            "read directory document"
        );

        Ok(Snapshot {
            collection,
            token: VersionToken::new(envelope.sha),
            last_updated: envelope.commit.and_then(CommitInfo::committed_at),
        })
    }

    async fn write(
        &self,
        collection: &BusinessCollection,
        token: &VersionToken,
        message: &str,
    ) -> Result<WriteReceipt, StorageError> {
        let body = PutContentRequest {
            message,
            content: codec::encode_document(collection)?,
            sha: token.as_str(),
            branch: &self.config.branch,
        };

        let response = self
            .authorized(self.client.put(self.config.contents_url()))
            .json(&body)
            .send()
            .await
            .map_err(StorageError::transport)?;

        let status = response.status();
        if !status.is_success() {
            let detail = error_message(response).await;
            return Err(classify_write_failure(status, detail, token));
        }

        let receipt: PutContentResponse = response
            .json()
            .await
            .map_err(|e| StorageError::decode(format!("unexpected commit response: {}", e)))?;

        let new_token = receipt
            .content
            .map(|c| VersionToken::new(c.sha))
            .ok_or_else(|| StorageError::decode("commit response missing content sha"))?;

        Ok(WriteReceipt {
            token: new_token,
            committed_at: receipt.commit.and_then(CommitInfo::committed_at),
        })
    }

    async fn probe(&self) -> Result<RemoteStatus, StorageError> {
        let response = self
            .authorized(self.client.get(self.config.repo_url()))
            .send()
            .await
            .map_err(StorageError::transport)?;
        let response = ensure_success(response, "repository lookup").await?;
        let repo: RepositoryEnvelope = response
            .json()
            .await
            .map_err(|e| StorageError::decode(format!("unexpected repository response: {}", e)))?;

        let file = self
            .authorized(self.client.get(self.config.contents_url()))
            .query(&[("ref", self.config.branch.as_str())])
            .send()
            .await
            .map_err(StorageError::transport)?;

        Ok(RemoteStatus {
            repository: RepositoryInfo {
                name: repo.name,
                full_name: repo.full_name,
                private: repo.private,
                last_push: repo.pushed_at,
            },
            path: self.config.path.clone(),
            file_exists: file.status().is_success(),
        })
    }
}

/// Maps a failed `PUT` to a storage error.
///
/// GitHub answers a stale SHA with 409; older API versions use 422 with a
/// "does not match" message.
fn classify_write_failure(
    status: StatusCode,
    detail: String,
    token: &VersionToken,
) -> StorageError {
    let stale_sha = status == StatusCode::CONFLICT
        || (status == StatusCode::UNPROCESSABLE_ENTITY && detail.contains("does not match"));

    if stale_sha {
        tracing::warn!(token = %token, "remote rejected stale version token");
        return StorageError::VersionConflict {
            token: token.clone(),
        };
    }

    tracing::warn!(status = status.as_u16(), detail = %detail, "remote write failed");
    StorageError::RemoteUnavailable {
        status: Some(status.as_u16()),
        message: format!("write failed ({}): {}", status, detail),
    }
}

async fn ensure_success(response: Response, action: &str) -> Result<Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let detail = error_message(response).await;
    tracing::warn!(status = status.as_u16(), detail = %detail, "remote {} failed", action);
    Err(StorageError::RemoteUnavailable {
        status: Some(status.as_u16()),
        message: format!("{} failed ({}): {}", action, status, detail),
    })
}

/// Pulls GitHub's `message` field out of an error body, falling back to the
/// raw text.
async fn error_message(response: Response) -> String {
    let text = response.text().await.unwrap_or_default();
    serde_json::from_str::<GitHubErrorBody>(&text)
        .ok()
        .and_then(|body| body.message)
        .unwrap_or(text)
}

#[derive(Debug, Deserialize)]
struct ContentEnvelope {
    content: String,
    sha: String,
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    commit: Option<CommitInfo>,
}

#[derive(Debug, Deserialize)]
struct CommitInfo {
    #[serde(default)]
    committer: Option<CommitPerson>,
}

impl CommitInfo {
    fn committed_at(self) -> Option<DateTime<Utc>> {
        self.committer.and_then(|c| c.date)
    }
}

#[derive(Debug, Deserialize)]
struct CommitPerson {
    #[serde(default)]
    date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
struct PutContentRequest<'a> {
    message: &'a str,
    content: String,
    sha: &'a str,
    branch: &'a str,
}

#[derive(Debug, Deserialize)]
struct PutContentResponse {
    #[serde(default)]
    content: Option<ContentRef>,
    #[serde(default)]
    commit: Option<CommitInfo>,
}

#[derive(Debug, Deserialize)]
struct ContentRef {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct RepositoryEnvelope {
    name: String,
    full_name: String,
    #[serde(default)]
    private: bool,
    #[serde(default)]
    pushed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct GitHubErrorBody {
    #[serde(default)]
    message: Option<String>,
}
