//! Business directory administration CLI.
//!
//! Provides the `bizdir` binary for reading and editing the directory
//! document without going through HTTP. It loads the same environment
//! configuration as the server and runs every mutation through the same
//! admin gate and compare-and-swap path, so the two entry points behave
//! identically.

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use bizdir_core::{BusinessFields, BusinessId, Mutation};
use bizdir_server::config::ServerConfig;
use bizdir_server::error::ApiError;
use bizdir_server::service::DirectoryService;
use bizdir_server::state::AppState;

/// Business directory tools.
#[derive(Parser, Debug)]
#[command(name = "bizdir", about = "Business directory administration tools")]
struct Cli {
    /// Admin credential for mutating commands.
    #[arg(long, global = true, env = "BIZDIR_ADMIN_AUTH", hide_env_values = true)]
    admin_auth: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print every business as JSON.
    List,

    /// Check that the repository and document are reachable.
    Status,

    /// Add a business from a JSON file of its fields.
    Add {
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Replace a business with the fields in a JSON file.
    Update {
        #[arg(short, long)]
        id: u64,

        #[arg(short, long)]
        file: PathBuf,
    },

    /// Remove a business.
    Remove {
        #[arg(short, long)]
        id: u64,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let service = match load_service() {
        Ok(service) => service,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    let credential = cli.admin_auth.as_deref();
    let exit_code = match cli.command {
        Commands::List => run_list(&service).await,
        Commands::Status => run_status(&service).await,
        Commands::Add { file } => {
            run_mutation(&service, credential, || {
                Ok(Mutation::Create {
                    fields: read_fields(&file)?,
                })
            })
            .await
        }
        Commands::Update { id, file } => {
            run_mutation(&service, credential, || {
                Ok(Mutation::Update {
                    id: BusinessId(id),
                    fields: read_fields(&file)?,
                })
            })
            .await
        }
        Commands::Remove { id } => {
            run_mutation(&service, credential, || {
                Ok(Mutation::Delete { id: BusinessId(id) })
            })
            .await
        }
    };
    process::exit(exit_code);
}

fn load_service() -> Result<Arc<DirectoryService>, ApiError> {
    let config = ServerConfig::from_env()?;
    AppState::from_config(&config)?.service()
}

/// Execute the list subcommand.
///
/// Returns exit code: 0 = success, 1 = request error.
async fn run_list(service: &DirectoryService) -> i32 {
    match service.list().await {
        Ok(listing) => print_json(&serde_json::json!({
            "businesses": listing.collection,
            "token": listing.token,
            "lastUpdated": listing.last_updated,
        })),
        Err(e) => report(e),
    }
}

/// Execute the status subcommand.
async fn run_status(service: &DirectoryService) -> i32 {
    match service.status().await {
        Ok(status) => print_json(&serde_json::json!({
            "location": service.location(),
            "repository": status.repository,
            "file": { "exists": status.file_exists, "path": status.path },
        })),
        Err(e) => report(e),
    }
}

/// Execute add, update or remove.
///
/// Returns exit code: 0 = committed, 1 = rejected or failed.
async fn run_mutation<F>(service: &DirectoryService, credential: Option<&str>, payload: F) -> i32
where
    F: FnOnce() -> Result<Mutation, ApiError> + Send,
{
    match service.execute(credential, payload).await {
        Ok(committed) => print_json(&serde_json::json!({
            "business": committed.value,
            "token": committed.token,
            "committedAt": committed.committed_at,
        })),
        Err(e) => report(e),
    }
}

fn read_fields(path: &Path) -> Result<BusinessFields, ApiError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        ApiError::BadRequest(format!("failed to read '{}': {}", path.display(), e))
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        ApiError::BadRequest(format!("'{}' is not valid business JSON: {}", path.display(), e))
    })
}

fn print_json(value: &serde_json::Value) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{}", text);
            0
        }
        Err(e) => {
            eprintln!("Error: failed to render output: {}", e);
            1
        }
    }
}

fn report(err: ApiError) -> i32 {
    eprintln!("Error [{}]: {}", err.code(), err.detail().message);
    1
}
