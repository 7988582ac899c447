//! Strictly Gomoku server library.
//!
//! Serves five-in-a-row rooms over WebSocket sessions with a small REST
//! API for room management.
//!
//! # Architecture
//!
//! - **Lobby**: shared room registry and per-connection outbound queues
//! - **Gateway**: per-connection protocol (join, start, move, disconnect)
//! - **WebSocket**: transport that feeds frames into a gateway
//! - **Routes**: `GET /rooms`, `POST /rooms/{name}`, `GET /ws`
//! - **Config**: TOML file, environment and CLI overrides
//!
//! # Example
//!
//! ```no_run
//! use strictly_server::{Lobby, router};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let lobby = Lobby::new();
//! lobby.create_room("r1")?;
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, router(lobby)).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cli;
mod config;
mod error;
mod gateway;
mod lobby;
mod routes;
mod ws;

pub use cli::Cli;
pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use gateway::{Flow, SessionGateway, SessionState};
pub use lobby::{Lobby, Outbox};
pub use routes::router;
pub use ws::{handle_socket, ws_handler};
