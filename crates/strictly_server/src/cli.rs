//! Command-line interface for strictly_server.

use clap::Parser;

/// Strictly Gomoku - five-in-a-row room server
#[derive(Parser, Debug)]
#[command(name = "strictly_server")]
#[command(about = "Real-time gomoku room server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<std::path::PathBuf>,

    /// Host to bind to (overrides config and HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides config and PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Room to create at startup (repeatable)
    #[arg(short, long = "room")]
    pub rooms: Vec<String>,
}
