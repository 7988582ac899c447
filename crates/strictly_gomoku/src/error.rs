//! Error types for room and registry operations.

use crate::board::Slot;
use derive_more::{Display, Error};

/// Reason a join handshake was refused.
///
/// The display text is what the client sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum JoinError {
    /// No room with the requested name.
    #[display("target room does not exist")]
    RoomNotFound,
    /// Both player seats are taken.
    #[display("game already in progress")]
    GameInProgress,
    /// Spectating needs two seated players.
    #[display("spectated game has not started")]
    GameNotStarted,
}

/// Registry operation failure.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum RegistryError {
    /// A room with this name is already registered.
    #[display("Room '{}' already exists", _0)]
    AlreadyExists(#[error(not(source))] String),
}

/// Reason a move was dropped.
///
/// Rejections never reach the wire; they exist for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum MoveRejection {
    /// Nobody has started the match yet.
    #[display("Game has not started")]
    NotStarted,
    /// The game already ended.
    #[display("Game is already over")]
    GameOver,
    /// The connection is not a seated player.
    #[display("Only seated players can move")]
    NotAPlayer,
    /// The mover's slot is not the one to move.
    #[display("Not your turn, waiting for slot {}", expected)]
    OutOfTurn {
        /// Slot whose turn it is.
        expected: Slot,
    },
    /// Coordinates outside the board.
    #[display("Position ({}, {}) is off the board", x, y)]
    OutOfBounds {
        /// Requested column.
        x: i64,
        /// Requested row.
        y: i64,
    },
    /// The cell already holds a stone.
    #[display("Cell ({}, {}) is already occupied", x, y)]
    CellOccupied {
        /// Column.
        x: usize,
        /// Row.
        y: usize,
    },
}
