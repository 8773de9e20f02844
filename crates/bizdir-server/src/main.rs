//! Binary entrypoint for the directory HTTP server.
//!
//! Configuration comes from environment variables; see
//! [`bizdir_server::config`] for the full list.

use bizdir_server::config::ServerConfig;
use bizdir_server::router::build_router;
use bizdir_server::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(err) = run().await {
        tracing::error!("bizdir server failed: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;
    tracing::debug!(?config, "loaded configuration");

    let state = AppState::from_config(&config)?;
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("bizdir server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
