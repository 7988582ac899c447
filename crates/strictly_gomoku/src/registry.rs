//! Room registry: name → room, with the operations that span a room's
//! lifetime (join, move, leave) and remove it when it ends.

use crate::error::{JoinError, MoveRejection, RegistryError};
use crate::participant::{Notice, Participant, Role};
use crate::room::{Departure, Placement, Room, RoomSummary};
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

/// Reference to a registered room, stored by a connection at bind time.
///
/// The generation tells apart rooms that reuse a name, so a stale handle
/// never reaches a newer room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
#[display("{}#{}", name, generation)]
pub struct RoomHandle {
    /// Room name.
    pub name: String,
    /// Generation assigned at creation.
    pub generation: u64,
}

/// A successful join handshake.
#[derive(Debug, Clone, PartialEq)]
pub struct Joined {
    /// The room the connection is now bound to.
    pub handle: RoomHandle,
    /// Seat or spectator.
    pub role: Role,
    /// Replies and notifications to deliver.
    pub notices: Vec<Notice>,
}

/// All live rooms, keyed by name.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<String, Room>,
    next_generation: u64,
}

impl RoomRegistry {
    /// Creates an empty registry.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating room registry");
        Self::default()
    }

    /// Registers a new empty room.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyExists`] if the name is taken.
    #[instrument(skip(self, name), fields(room = %name.as_ref()))]
    pub fn create(&mut self, name: impl AsRef<str>) -> Result<RoomHandle, RegistryError> {
        let name = name.as_ref();
        if self.rooms.contains_key(name) {
            warn!("Room already exists");
            return Err(RegistryError::AlreadyExists(name.to_string()));
        }
        let generation = self.next_generation;
        self.next_generation += 1;
        self.rooms
            .insert(name.to_string(), Room::new(name.to_string(), generation));
        info!(generation, "Room created");
        Ok(RoomHandle {
            name: name.to_string(),
            generation,
        })
    }

    /// Looks a room up by name.
    pub fn find(&self, name: &str) -> Option<&Room> {
        self.rooms.get(name)
    }

    /// Looks a room up by handle; `None` if it is gone or was replaced.
    pub fn get(&self, handle: &RoomHandle) -> Option<&Room> {
        self.rooms
            .get(&handle.name)
            .filter(|room| *room.generation() == handle.generation)
    }

    /// Mutable lookup by handle.
    pub fn get_mut(&mut self, handle: &RoomHandle) -> Option<&mut Room> {
        self.rooms
            .get_mut(&handle.name)
            .filter(|room| *room.generation() == handle.generation)
    }

    /// Summaries of all rooms, sorted by name.
    #[instrument(skip(self))]
    pub fn list(&self) -> Vec<RoomSummary> {
        let mut summaries: Vec<_> = self.rooms.values().map(Room::summary).collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(count = summaries.len(), "Listed rooms");
        summaries
    }

    /// Removes a room.
    ///
    /// Removing a room that is already gone, or that was replaced by a newer
    /// room of the same name, is a no-op returning `None`.
    #[instrument(skip(self), fields(room = %handle))]
    pub fn remove(&mut self, handle: &RoomHandle) -> Option<Room> {
        self.get(handle)?;
        let room = self.rooms.remove(&handle.name);
        info!("Room removed");
        room
    }

    /// Number of live rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Checks if no room is registered.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Join handshake: binds `participant` to the named room as a player or,
    /// with `spectate`, as a spectator.
    ///
    /// # Errors
    ///
    /// [`JoinError::RoomNotFound`] for an unknown room (nothing is created),
    /// otherwise whatever the room refuses.
    #[instrument(skip(self, participant), fields(connection_id = %participant.connection_id))]
    pub fn join(
        &mut self,
        room: &str,
        participant: Participant,
        spectate: bool,
    ) -> Result<Joined, JoinError> {
        let target = self.rooms.get_mut(room).ok_or_else(|| {
            debug!("Join target missing");
            JoinError::RoomNotFound
        })?;
        let handle = RoomHandle {
            name: target.name().clone(),
            generation: *target.generation(),
        };
        let (role, notices) = if spectate {
            (Role::Spectator, target.add_spectator(participant)?)
        } else {
            let (slot, notices) = target.add_player(participant)?;
            (Role::Player(slot), notices)
        };
        Ok(Joined {
            handle,
            role,
            notices,
        })
    }

    /// Forwards a start request. Unknown rooms are ignored.
    #[instrument(skip(self), fields(room = %handle))]
    pub fn start(&mut self, handle: &RoomHandle, connection_id: &str) -> bool {
        self.get_mut(handle)
            .is_some_and(|room| room.start(connection_id))
    }

    /// Forwards a move and removes the room when the move decides the game.
    ///
    /// # Errors
    ///
    /// [`MoveRejection::GameOver`] when the room is gone, otherwise whatever
    /// the room rejects.
    #[instrument(skip(self), fields(room = %handle))]
    pub fn place(
        &mut self,
        handle: &RoomHandle,
        connection_id: &str,
        x: i64,
        y: i64,
    ) -> Result<Placement, MoveRejection> {
        let room = self.get_mut(handle).ok_or(MoveRejection::GameOver)?;
        let placement = room.place(x, y, connection_id)?;
        if placement.outcome.is_decisive() {
            self.remove(handle);
        }
        Ok(placement)
    }

    /// Detaches a connection on disconnect, removing the room if a player
    /// left. Returns `None` if the room or the participant is already gone.
    #[instrument(skip(self), fields(room = %handle))]
    pub fn leave(&mut self, handle: &RoomHandle, connection_id: &str) -> Option<Departure> {
        let departure = self.get_mut(handle)?.remove_participant(connection_id)?;
        if departure.closes_room() {
            self.remove(handle);
        }
        Some(departure)
    }
}
