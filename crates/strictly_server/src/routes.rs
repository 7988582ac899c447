//! HTTP routes: room listing and creation, the WebSocket endpoint and a
//! health check.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{Request, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use strictly_gomoku::RoomSummary;
use tower::ServiceBuilder;
use tracing::{debug, info, instrument};

use crate::error::ApiError;
use crate::lobby::Lobby;
use crate::ws::ws_handler;

/// Builds the application router over a shared lobby.
///
/// `/room_list` and `/create_room/{name}` are kept for older clients and
/// behave like `GET /rooms` and `POST /rooms/{name}`.
pub fn router(lobby: Lobby) -> Router {
    Router::new()
        .route("/rooms", get(list_rooms))
        .route("/rooms/{name}", post(create_room))
        .route("/room_list", get(list_rooms))
        .route("/create_room/{name}", get(create_room))
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            debug!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(lobby)
}

/// `GET /rooms`
#[instrument(skip(lobby))]
async fn list_rooms(State(lobby): State<Lobby>) -> Json<Vec<RoomSummary>> {
    Json(lobby.list_rooms())
}

/// `POST /rooms/{name}`: 200 when created, 409 when the name is taken.
#[instrument(skip(lobby))]
async fn create_room(
    State(lobby): State<Lobby>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    lobby.create_room(&name)?;
    info!(room = %name, "Room created over HTTP");
    Ok(StatusCode::OK)
}

async fn health() -> &'static str {
    "ok"
}
