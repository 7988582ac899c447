//! Room state machine: seats, spectators, turn order and move legality.

use crate::board::{BOARD_SIZE, Board, Slot};
use crate::error::{JoinError, MoveRejection};
use crate::participant::{Notice, Participant, Role, notify_all};
use crate::protocol::{GameEvent, JoinReply, RoomSnapshot, ServerMessage};
use crate::rules::{self, Outcome};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Maximum number of seated players.
pub const MAX_PLAYERS: usize = 2;

/// Lifecycle phase of a room, derived from its seats and progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RoomPhase {
    /// No players.
    Empty,
    /// One player seated.
    AwaitingOpponent,
    /// Two players seated, match not started.
    Ready,
    /// Moves are accepted.
    InProgress,
    /// Won or drawn; the room is about to leave the registry.
    Finished,
}

/// Listing entry for a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    /// Room name.
    pub name: String,
    /// Usernames of seated players in slot order.
    pub players: Vec<String>,
    /// Number of spectators.
    pub spectators: usize,
    /// Whether the match has started.
    pub started: bool,
}

/// A stone that was placed, with what followed from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Slot that moved.
    pub slot: Slot,
    /// Board judgement after the move.
    pub outcome: Outcome,
    /// Messages to deliver: the `place` broadcast and, on a decisive
    /// outcome, the `win` broadcast.
    pub notices: Vec<Notice>,
}

/// A participant that left the room.
#[derive(Debug, Clone, PartialEq)]
pub struct Departure {
    /// The departed participant.
    pub participant: Participant,
    /// How they were attached.
    pub role: Role,
    /// Messages for those who remain.
    pub notices: Vec<Notice>,
}

impl Departure {
    /// A departing player closes the room.
    pub fn closes_room(&self) -> bool {
        matches!(self.role, Role::Player(_))
    }
}

/// One game session bound to a unique name.
#[derive(Debug, Clone, Getters)]
pub struct Room {
    /// Unique name within the registry.
    name: String,
    /// Registry generation, distinguishing rooms that reuse a name.
    generation: u64,
    /// Seated players; the index is the slot.
    players: Vec<Participant>,
    /// Watchers.
    spectators: Vec<Participant>,
    /// The board.
    board: Board,
    /// Slot to move next.
    turn: Slot,
    /// Set by the first `start` from a seated player.
    started: bool,
    /// Set when a move decides the game.
    finished: bool,
}

impl Room {
    /// Creates an empty room.
    #[instrument]
    pub fn new(name: String, generation: u64) -> Self {
        debug!(room = %name, generation, "Creating room");
        Self {
            name,
            generation,
            players: Vec::with_capacity(MAX_PLAYERS),
            spectators: Vec::new(),
            board: Board::new(),
            turn: Slot::First,
            started: false,
            finished: false,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> RoomPhase {
        if self.finished {
            RoomPhase::Finished
        } else if self.started {
            RoomPhase::InProgress
        } else {
            match self.players.len() {
                0 => RoomPhase::Empty,
                1 => RoomPhase::AwaitingOpponent,
                _ => RoomPhase::Ready,
            }
        }
    }

    /// Slot of the seated player on `connection_id`.
    pub fn slot_of(&self, connection_id: &str) -> Option<Slot> {
        self.players
            .iter()
            .position(|p| p.connection_id == connection_id)
            .and_then(Slot::from_index)
    }

    /// Every participant: players first, then spectators.
    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.players.iter().chain(self.spectators.iter())
    }

    /// Seats a player in the next free slot.
    ///
    /// The joiner receives `success` while waiting for an opponent; when the
    /// second seat fills, both players receive `start` with their own slot
    /// and the opponent.
    ///
    /// # Errors
    ///
    /// Returns [`JoinError::GameInProgress`] when both seats are taken.
    #[instrument(skip(self), fields(room = %self.name))]
    pub fn add_player(&mut self, player: Participant) -> Result<(Slot, Vec<Notice>), JoinError> {
        let slot = Slot::from_index(self.players.len()).ok_or_else(|| {
            debug!(connection_id = %player.connection_id, "Room is full");
            JoinError::GameInProgress
        })?;
        info!(connection_id = %player.connection_id, username = %player.username, %slot, "Player seated");
        let joiner = player.connection_id.clone();
        self.players.push(player);

        if self.players.len() < MAX_PLAYERS {
            return Ok((slot, vec![Notice::new(joiner, JoinReply::Success.into())]));
        }

        let notices = [Slot::First, Slot::Second]
            .into_iter()
            .map(|own| {
                let opponent = self.players[own.opponent().index()].clone();
                Notice::new(
                    self.players[own.index()].connection_id.clone(),
                    JoinReply::Start { slot: own, opponent }.into(),
                )
            })
            .collect();
        Ok((slot, notices))
    }

    /// Attaches a spectator.
    ///
    /// Players are told a spectator joined; the spectator receives a
    /// snapshot of the room.
    ///
    /// # Errors
    ///
    /// Returns [`JoinError::GameNotStarted`] while fewer than two players
    /// are seated.
    #[instrument(skip(self), fields(room = %self.name))]
    pub fn add_spectator(&mut self, spectator: Participant) -> Result<Vec<Notice>, JoinError> {
        if self.players.len() < MAX_PLAYERS {
            debug!(players = self.players.len(), "Nothing to spectate yet");
            return Err(JoinError::GameNotStarted);
        }
        info!(connection_id = %spectator.connection_id, username = %spectator.username, "Spectator joined");
        let joiner = spectator.connection_id.clone();
        self.spectators.push(spectator);

        let mut notices = notify_all(&self.players, GameEvent::SpectatorJoined.into());
        notices.push(Notice::new(
            joiner,
            JoinReply::RoomInfo { room: self.snapshot() }.into(),
        ));
        Ok(notices)
    }

    /// Begins the match when requested by a seated player of a full room.
    ///
    /// Returns whether the room moved to [`RoomPhase::InProgress`]; every
    /// other request is a no-op.
    #[instrument(skip(self), fields(room = %self.name))]
    pub fn start(&mut self, connection_id: &str) -> bool {
        if self.phase() != RoomPhase::Ready {
            debug!(phase = %self.phase(), "Start ignored");
            return false;
        }
        if self.slot_of(connection_id).is_none() {
            debug!("Start ignored: not a seated player");
            return false;
        }
        info!("Match started");
        self.started = true;
        true
    }

    /// Places a stone for the player on `connection_id`.
    ///
    /// On success the stone is set, every participant receives `place`, the
    /// turn passes to the opponent and the board is judged; a decisive
    /// outcome adds a `win` broadcast and moves the room to
    /// [`RoomPhase::Finished`].
    ///
    /// # Errors
    ///
    /// Returns a [`MoveRejection`] and leaves the room untouched when the
    /// match is not running, the connection holds no seat, it is not the
    /// mover's turn, the position is off the board or the cell is taken.
    #[instrument(skip(self), fields(room = %self.name))]
    pub fn place(&mut self, x: i64, y: i64, connection_id: &str) -> Result<Placement, MoveRejection> {
        match self.phase() {
            RoomPhase::InProgress => {}
            RoomPhase::Finished => return Err(MoveRejection::GameOver),
            _ => return Err(MoveRejection::NotStarted),
        }
        let slot = self.slot_of(connection_id).ok_or(MoveRejection::NotAPlayer)?;
        if slot != self.turn {
            return Err(MoveRejection::OutOfTurn { expected: self.turn });
        }
        let (col, row) = match (usize::try_from(x), usize::try_from(y)) {
            (Ok(col), Ok(row)) if col < BOARD_SIZE && row < BOARD_SIZE => (col, row),
            _ => return Err(MoveRejection::OutOfBounds { x, y }),
        };
        if !self.board.get(col, row).is_empty() {
            return Err(MoveRejection::CellOccupied { x: col, y: row });
        }

        self.board.set(col, row, slot);
        let mut notices = notify_all(
            self.participants(),
            GameEvent::Place { x: col, y: row, slot }.into(),
        );
        self.turn = slot.opponent();

        let outcome = rules::evaluate(&self.board);
        debug!(x = col, y = row, %slot, ?outcome, "Stone placed");
        match outcome {
            Outcome::Continue => {}
            Outcome::Draw => {
                info!("Game drawn");
                self.finished = true;
                notices.extend(notify_all(
                    self.participants(),
                    GameEvent::Win { winner: None, highlight: None }.into(),
                ));
            }
            Outcome::Win { slot: winner, highlight } => {
                let winner = self.players.get(winner.index()).cloned();
                info!(winner = ?winner.as_ref().map(|p| &p.username), ?highlight, "Game won");
                self.finished = true;
                notices.extend(notify_all(
                    self.participants(),
                    GameEvent::Win { winner, highlight: Some(highlight) }.into(),
                ));
            }
        }

        Ok(Placement { slot, outcome, notices })
    }

    /// Detaches the participant on `connection_id`.
    ///
    /// A departing player with an opponent still seated triggers
    /// `player_disconnected` to everyone left in the room; the caller must
    /// then close the room (see [`Departure::closes_room`]). A departing
    /// spectator is dropped and the players receive `spectator_left`.
    ///
    /// Returns `None` when the connection is not attached to this room.
    #[instrument(skip(self), fields(room = %self.name))]
    pub fn remove_participant(&mut self, connection_id: &str) -> Option<Departure> {
        if let Some(slot) = self.slot_of(connection_id) {
            let participant = self.players[slot.index()].clone();
            let notices = if self.players.len() > 1 {
                let message: ServerMessage = GameEvent::PlayerDisconnected {
                    user: participant.clone(),
                }
                .into();
                notify_all(
                    self.participants().filter(|p| p.connection_id != connection_id),
                    message,
                )
            } else {
                Vec::new()
            };
            info!(connection_id, %slot, "Player left");
            return Some(Departure {
                participant,
                role: Role::Player(slot),
                notices,
            });
        }

        let index = self
            .spectators
            .iter()
            .position(|p| p.connection_id == connection_id)?;
        let participant = self.spectators.remove(index);
        debug!(connection_id, "Spectator left");
        Some(Departure {
            participant,
            role: Role::Spectator,
            notices: notify_all(&self.players, GameEvent::SpectatorLeft.into()),
        })
    }

    /// Current state for a joining spectator.
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            name: self.name.clone(),
            players: self.players.clone(),
            spectators: self.spectators.len(),
            board: self.board.clone(),
            turn: self.turn,
            started: self.started,
        }
    }

    /// Listing entry.
    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            name: self.name.clone(),
            players: self.players.iter().map(|p| p.username.clone()).collect(),
            spectators: self.spectators.len(),
            started: self.started,
        }
    }
}
