//! Wire messages exchanged with clients over a session connection.
//!
//! Frames are JSON. Inbound frames are tagged by `"type"`; outbound frames
//! carry a channel name in `"event"` (`"join"` or `"game"`) and a payload in
//! `"data"` that is itself tagged by `"type"`.

use crate::board::{Board, Slot};
use crate::participant::Participant;
use crate::rules::Highlight;
use serde::{Deserialize, Serialize};

/// Message sent by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Join handshake; only the first one on a connection is honored.
    Join {
        /// Name of the room to join.
        room: String,
        /// Display name.
        username: String,
        /// Watch instead of play.
        #[serde(default)]
        spectate: bool,
    },
    /// Request to begin the match.
    Start,
    /// Place a stone at column `x`, row `y`.
    Move {
        /// Column.
        x: i64,
        /// Row.
        y: i64,
    },
}

impl ClientMessage {
    /// Parses a JSON text frame.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Message sent to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_more::From)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Reply to the join handshake.
    Join(JoinReply),
    /// Event inside a running room.
    Game(GameEvent),
}

impl ServerMessage {
    /// Encodes the message as a JSON text frame.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Result of a join handshake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JoinReply {
    /// Join refused; the connection is closed afterwards.
    Error {
        /// Human-readable reason.
        message: String,
    },
    /// Seated as the first player; waiting for an opponent.
    Success,
    /// Seated as a spectator; current state of the room.
    RoomInfo {
        /// Room state at join time.
        room: RoomSnapshot,
    },
    /// Both seats are taken; sent to each player.
    Start {
        /// The recipient's own slot.
        slot: Slot,
        /// The other player.
        opponent: Participant,
    },
}

/// Event broadcast inside a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// A stone was placed.
    Place {
        /// Column.
        x: usize,
        /// Row.
        y: usize,
        /// Owner of the stone.
        slot: Slot,
    },
    /// The game is over. Both fields are `None` on a draw.
    Win {
        /// The winning player.
        winner: Option<Participant>,
        /// The winning line.
        highlight: Option<Highlight>,
    },
    /// A spectator joined.
    SpectatorJoined,
    /// A spectator left.
    SpectatorLeft,
    /// A player's connection dropped; the room is closed.
    PlayerDisconnected {
        /// The departed player.
        user: Participant,
    },
}

/// Room state handed to a joining spectator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    /// Room name.
    pub name: String,
    /// Seated players in slot order.
    pub players: Vec<Participant>,
    /// Number of spectators, including the recipient.
    pub spectators: usize,
    /// Current board.
    pub board: Board,
    /// Slot to move next.
    pub turn: Slot,
    /// Whether a player has started the match.
    pub started: bool,
}
