//! Strictly Gomoku server binary.

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use strictly_server::{Cli, Lobby, ServerConfig, router};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    }
    .with_env()?
    .with_overrides(cli.host, cli.port, cli.rooms);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .init();

    info!("Starting Strictly Gomoku server");

    let lobby = Lobby::new();
    for room in config.rooms() {
        lobby.create_room(room)?;
        info!(room = %room, "Room created at startup");
    }

    let app = router(lobby);

    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!("Server ready at http://{}:{}/", config.host(), config.port());
    info!("WebSocket sessions at ws://{}:{}/ws", config.host(), config.port());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
