//! Shared server state: the room registry plus one outbound channel per
//! connection.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use strictly_gomoku::{
    ConnectionId, Departure, JoinError, Joined, MoveRejection, Notice, Participant, Placement,
    RegistryError, RoomHandle, RoomRegistry, RoomSummary, ServerMessage,
};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, trace};

/// Sending half of a connection's outbound queue.
pub type Outbox = mpsc::UnboundedSender<ServerMessage>;

#[derive(Debug, Default)]
struct LobbyState {
    registry: RoomRegistry,
    outboxes: HashMap<ConnectionId, Outbox>,
    next_connection: u64,
}

impl LobbyState {
    /// Pushes notices to their connections. Closed connections are skipped.
    fn deliver(&self, notices: Vec<Notice>) {
        for Notice { to, message } in notices {
            match self.outboxes.get(&to) {
                Some(outbox) => {
                    if outbox.send(message).is_err() {
                        debug!(connection_id = %to, "Outbox closed, dropping message");
                    }
                }
                None => trace!(connection_id = %to, "No outbox for connection"),
            }
        }
    }
}

/// Rooms and connections shared by every session.
///
/// Each operation takes the lock once and runs to completion, including
/// delivery, so a move, its broadcast, the turn flip and the win check are
/// never interleaved with another connection's message.
#[derive(Debug, Clone, Default)]
pub struct Lobby {
    state: Arc<Mutex<LobbyState>>,
}

impl Lobby {
    /// Creates an empty lobby.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating lobby");
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LobbyState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a connection's outbound queue and assigns its id.
    #[instrument(skip(self, outbox))]
    pub fn connect(&self, outbox: Outbox) -> ConnectionId {
        let mut state = self.lock();
        state.next_connection += 1;
        let connection_id = format!("conn-{}", state.next_connection);
        state.outboxes.insert(connection_id.clone(), outbox);
        debug!(%connection_id, "Connection registered");
        connection_id
    }

    /// Forgets a connection's outbound queue.
    #[instrument(skip(self))]
    pub fn disconnect(&self, connection_id: &str) {
        if self.lock().outboxes.remove(connection_id).is_some() {
            debug!("Connection unregistered");
        }
    }

    /// Sends one message to one connection.
    pub fn send(&self, connection_id: &str, message: ServerMessage) {
        self.lock()
            .deliver(vec![Notice::new(connection_id.to_string(), message)]);
    }

    /// Creates a room.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyExists`] if the name is taken.
    #[instrument(skip(self))]
    pub fn create_room(&self, name: &str) -> Result<RoomHandle, RegistryError> {
        self.lock().registry.create(name)
    }

    /// Lists rooms sorted by name.
    pub fn list_rooms(&self) -> Vec<RoomSummary> {
        self.lock().registry.list()
    }

    /// Number of live rooms.
    pub fn room_count(&self) -> usize {
        self.lock().registry.len()
    }

    /// Join handshake; on success the join notices are delivered.
    ///
    /// # Errors
    ///
    /// Returns the [`JoinError`] to report to the client. Nothing is
    /// delivered in that case.
    #[instrument(skip(self, participant), fields(connection_id = %participant.connection_id))]
    pub fn join(
        &self,
        room: &str,
        participant: Participant,
        spectate: bool,
    ) -> Result<Joined, JoinError> {
        let mut state = self.lock();
        let joined = state.registry.join(room, participant, spectate)?;
        state.deliver(joined.notices.clone());
        Ok(joined)
    }

    /// Forwards a start request.
    pub fn start(&self, handle: &RoomHandle, connection_id: &str) -> bool {
        self.lock().registry.start(handle, connection_id)
    }

    /// Forwards a move; accepted moves are broadcast and a decided game
    /// leaves the registry.
    ///
    /// # Errors
    ///
    /// Returns the [`MoveRejection`]; nothing is delivered in that case.
    pub fn place(
        &self,
        handle: &RoomHandle,
        connection_id: &str,
        x: i64,
        y: i64,
    ) -> Result<Placement, MoveRejection> {
        let mut state = self.lock();
        let placement = state.registry.place(handle, connection_id, x, y)?;
        state.deliver(placement.notices.clone());
        Ok(placement)
    }

    /// Detaches a connection from its room and delivers departure notices.
    pub fn leave(&self, handle: &RoomHandle, connection_id: &str) -> Option<Departure> {
        let mut state = self.lock();
        let departure = state.registry.leave(handle, connection_id)?;
        state.deliver(departure.notices.clone());
        Some(departure)
    }
}
