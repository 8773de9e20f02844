//! Server configuration from environment variables.
//!
//! Variables (a `.env` file in the working directory is honoured):
//! - `GITHUB_TOKEN`: remote access token. Without it the directory surface
//!   answers every request with a configuration error.
//! - `GITHUB_OWNER`, `GITHUB_REPO`: repository holding the document
//!   (required when a token is set)
//! - `GITHUB_BRANCH`: branch to read and commit to (default: "main")
//! - `GITHUB_FILE_PATH`: document path (default: "frontend_app/public/businesses.json")
//! - `GITHUB_API_URL`: API root (default: "https://api.github.com")
//! - `ADMIN_PASSWORD`: shared admin secret; unset refuses all mutations
//! - `BIZDIR_PORT`: listen port (default: "3000")

use bizdir_storage::RemoteConfig;

use crate::error::ApiError;

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_FILE_PATH: &str = "frontend_app/public/businesses.json";
pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_PORT: u16 = 3000;

/// Everything the server reads at start-up.
#[derive(Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub admin_password: Option<String>,
    /// `None` when no access token is configured.
    pub remote: Option<RemoteConfig>,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("port", &self.port)
            .field("admin_password", &self.admin_password.as_ref().map(|_| "<set>"))
            .field(
                "remote",
                &self
                    .remote
                    .as_ref()
                    .map(|r| format!("{}/{}:{}@{}", r.owner, r.repo, r.path, r.branch)),
            )
            .finish()
    }
}

impl ServerConfig {
    /// Reads configuration from the process environment, loading `.env`
    /// first if present.
    pub fn from_env() -> Result<Self, ApiError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("BIZDIR_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                ApiError::Configuration(format!("BIZDIR_PORT must be a port number, got '{}'", raw))
            })?,
            None => DEFAULT_PORT,
        };

        let remote = match get("GITHUB_TOKEN") {
            Some(token) => {
                let require = |key: &str| {
                    get(key).ok_or_else(|| {
                        ApiError::Configuration(format!("{} is required when GITHUB_TOKEN is set", key))
                    })
                };
                Some(RemoteConfig {
                    api_base: get("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                    owner: require("GITHUB_OWNER")?,
                    repo: require("GITHUB_REPO")?,
                    branch: get("GITHUB_BRANCH").unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
                    path: get("GITHUB_FILE_PATH").unwrap_or_else(|| DEFAULT_FILE_PATH.to_string()),
                    token,
                })
            }
            None => None,
        };

        Ok(ServerConfig {
            port,
            admin_password: get("ADMIN_PASSWORD"),
            remote,
        })
    }
}
