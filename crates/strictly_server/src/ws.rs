//! WebSocket transport for game sessions.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::{Sink, SinkExt, StreamExt};
use strictly_gomoku::ServerMessage;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::gateway::{Flow, SessionGateway};
use crate::lobby::Lobby;

/// Upgrades `GET /ws` to a game session.
pub async fn ws_handler(ws: WebSocketUpgrade, State(lobby): State<Lobby>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(lobby, socket))
}

/// Encodes and sends one message. Returns `false` once the socket is gone.
async fn forward<S>(sink: &mut S, message: &ServerMessage) -> bool
where
    S: Sink<Message> + Unpin,
{
    let text = match message.to_json() {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "Failed to encode server message");
            return true;
        }
    };
    sink.send(Message::Text(text.into())).await.is_ok()
}

/// Sends everything still queued for the connection, then a close frame.
async fn flush_and_close<S>(sink: &mut S, rx: &mut mpsc::UnboundedReceiver<ServerMessage>)
where
    S: Sink<Message> + Unpin,
    S::Error: std::fmt::Display,
{
    while let Ok(message) = rx.try_recv() {
        if !forward(sink, &message).await {
            debug!("Socket closed while flushing");
            return;
        }
    }
    if let Err(e) = sink.send(Message::Close(None)).await {
        debug!(error = %e, "Failed to send close frame");
    }
}

/// Runs one session until either side closes.
///
/// Outbound messages queued by the lobby and inbound frames from the client
/// are multiplexed on one task; the gateway sees inbound messages strictly
/// in arrival order.
#[instrument(skip_all)]
pub async fn handle_socket(lobby: Lobby, socket: WebSocket) {
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    let connection_id = lobby.connect(tx);
    let mut gateway = SessionGateway::new(lobby, connection_id);
    info!(connection_id = %gateway.connection_id(), "Session opened");

    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            Some(message) = rx.recv() => {
                if !forward(&mut sink, &message).await {
                    debug!("Socket closed while sending");
                    break;
                }
            }
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if gateway.handle_text(text.as_str()) == Flow::Close {
                        flush_and_close(&mut sink, &mut rx).await;
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!(error = %e, "Socket error");
                    break;
                }
            }
        }
    }

    gateway.disconnect();
    info!(connection_id = %gateway.connection_id(), "Session closed");
}
