//! Per-connection protocol handler.
//!
//! A session starts unbound, binds to one room through the join handshake,
//! and forwards `start` and `move` messages to that room until the
//! connection drops. The bound room is remembered by [`RoomHandle`], so
//! disconnect cleanup always reaches the room this connection joined.

use strictly_gomoku::{
    ClientMessage, ConnectionId, JoinReply, Participant, RoomHandle, Role, Slot,
};
use tracing::{debug, info, instrument, warn};

use crate::lobby::Lobby;

/// Binding state of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No successful join yet.
    Unbound,
    /// Seated player.
    Player {
        /// Bound room.
        handle: RoomHandle,
        /// Own slot.
        slot: Slot,
        /// Whether this connection already started the match.
        started: bool,
    },
    /// Spectator.
    Spectator {
        /// Bound room.
        handle: RoomHandle,
    },
    /// Join refused or connection dropped.
    Closed,
}

/// What the transport should do after a message was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading.
    Continue,
    /// Flush queued messages, then close the connection.
    Close,
}

/// Protocol state machine for one connection.
#[derive(Debug)]
pub struct SessionGateway {
    lobby: Lobby,
    connection_id: ConnectionId,
    state: SessionState,
}

impl SessionGateway {
    /// Creates an unbound session for a connection already registered with
    /// [`Lobby::connect`].
    pub fn new(lobby: Lobby, connection_id: ConnectionId) -> Self {
        Self {
            lobby,
            connection_id,
            state: SessionState::Unbound,
        }
    }

    /// The connection this session speaks for.
    pub fn connection_id(&self) -> &str {
        &self.connection_id
    }

    /// Current binding state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Handles one JSON text frame. Malformed frames are logged and dropped.
    #[instrument(skip(self, text), fields(connection_id = %self.connection_id))]
    pub fn handle_text(&mut self, text: &str) -> Flow {
        match ClientMessage::parse(text) {
            Ok(message) => self.handle(message),
            Err(e) => {
                warn!(error = %e, "Malformed client frame");
                Flow::Continue
            }
        }
    }

    /// Handles one client message.
    #[instrument(skip(self), fields(connection_id = %self.connection_id))]
    pub fn handle(&mut self, message: ClientMessage) -> Flow {
        match message {
            ClientMessage::Join {
                room,
                username,
                spectate,
            } => self.join(&room, username, spectate),
            ClientMessage::Start => {
                self.start();
                Flow::Continue
            }
            ClientMessage::Move { x, y } => {
                self.place(x, y);
                Flow::Continue
            }
        }
    }

    fn join(&mut self, room: &str, username: String, spectate: bool) -> Flow {
        if self.state != SessionState::Unbound {
            debug!(state = ?self.state, "Join ignored: already handled");
            return Flow::Continue;
        }
        let participant = Participant::new(self.connection_id.clone(), username);
        match self.lobby.join(room, participant, spectate) {
            Ok(joined) => {
                info!(room, role = ?joined.role, "Session bound");
                self.state = match joined.role {
                    Role::Player(slot) => SessionState::Player {
                        handle: joined.handle,
                        slot,
                        started: false,
                    },
                    Role::Spectator => SessionState::Spectator {
                        handle: joined.handle,
                    },
                };
                Flow::Continue
            }
            Err(e) => {
                warn!(room, error = %e, "Join refused");
                self.lobby.send(
                    &self.connection_id,
                    JoinReply::Error {
                        message: e.to_string(),
                    }
                    .into(),
                );
                self.state = SessionState::Closed;
                Flow::Close
            }
        }
    }

    fn start(&mut self) {
        let SessionState::Player {
            handle, started, ..
        } = &mut self.state
        else {
            debug!("Start ignored: not a seated player");
            return;
        };
        if *started {
            debug!("Start ignored: already used");
            return;
        }
        if self.lobby.start(handle, &self.connection_id) {
            *started = true;
        }
    }

    fn place(&mut self, x: i64, y: i64) {
        let handle = match &self.state {
            SessionState::Player { handle, .. } | SessionState::Spectator { handle } => handle,
            SessionState::Unbound | SessionState::Closed => {
                debug!("Move ignored: session not bound");
                return;
            }
        };
        if let Err(rejection) = self.lobby.place(handle, &self.connection_id, x, y) {
            debug!(x, y, %rejection, "Move dropped");
        }
    }

    /// Cleans up after the connection dropped: leaves the bound room and
    /// unregisters the outbound queue. Safe to call more than once.
    #[instrument(skip(self), fields(connection_id = %self.connection_id))]
    pub fn disconnect(&mut self) {
        let state = std::mem::replace(&mut self.state, SessionState::Closed);
        match state {
            SessionState::Player { handle, .. } | SessionState::Spectator { handle } => {
                if let Some(departure) = self.lobby.leave(&handle, &self.connection_id) {
                    info!(room = %handle, role = ?departure.role, "Left room");
                }
            }
            SessionState::Unbound | SessionState::Closed => {}
        }
        self.lobby.disconnect(&self.connection_id);
    }
}
