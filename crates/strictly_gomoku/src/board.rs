//! Core domain types for the 15×15 gomoku board.

use serde::{Deserialize, Serialize};

/// Width and height of the board.
pub const BOARD_SIZE: usize = 15;

/// Number of equal stones in a line needed to win.
pub const RUN_LENGTH: usize = 5;

/// Turn slot of a player: the first player to join moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(into = "u8", try_from = "u8")]
pub enum Slot {
    /// Slot 0, moves first.
    #[strum(to_string = "0")]
    First,
    /// Slot 1.
    #[strum(to_string = "1")]
    Second,
}

impl Slot {
    /// Returns the other slot.
    pub fn opponent(self) -> Self {
        match self {
            Slot::First => Slot::Second,
            Slot::Second => Slot::First,
        }
    }

    /// Index of this slot in a room's player list.
    pub fn index(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
        }
    }

    /// Slot for a player list index, if there is one.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Slot::First),
            1 => Some(Slot::Second),
            _ => None,
        }
    }
}

impl From<Slot> for u8 {
    fn from(slot: Slot) -> Self {
        slot.index() as u8
    }
}

impl TryFrom<u8> for Slot {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Slot::from_index(value as usize).ok_or_else(|| format!("invalid slot {}", value))
    }
}

/// A cell on the board.
///
/// Serializes as `null` when empty and as the owning slot number otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<Slot>", into = "Option<Slot>")]
pub enum Cell {
    /// No stone.
    #[default]
    Empty,
    /// Stone of the given slot.
    Occupied(Slot),
}

impl Cell {
    /// Returns the owning slot of an occupied cell.
    pub fn slot(self) -> Option<Slot> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(slot) => Some(slot),
        }
    }

    /// Checks if the cell holds no stone.
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl From<Option<Slot>> for Cell {
    fn from(slot: Option<Slot>) -> Self {
        slot.map_or(Cell::Empty, Cell::Occupied)
    }
}

impl From<Cell> for Option<Slot> {
    fn from(cell: Cell) -> Self {
        cell.slot()
    }
}

/// 15×15 gomoku board, indexed as `(x, y)` with `x` the column and `y` the row.
///
/// The board does no validation of its own: callers check bounds and occupancy
/// before calling [`Board::set`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Rows top to bottom, each row left to right.
    rows: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            rows: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Gets the cell at column `x`, row `y`.
    ///
    /// Panics if either coordinate is `>= BOARD_SIZE`.
    pub fn get(&self, x: usize, y: usize) -> Cell {
        self.rows[y][x]
    }

    /// Places a stone for `slot` at column `x`, row `y`.
    ///
    /// Panics if either coordinate is `>= BOARD_SIZE`.
    pub fn set(&mut self, x: usize, y: usize, slot: Slot) {
        self.rows[y][x] = Cell::Occupied(slot);
    }

    /// Checks if every cell holds a stone.
    pub fn is_full(&self) -> bool {
        self.rows.iter().flatten().all(|cell| !cell.is_empty())
    }

    /// Number of stones on the board.
    pub fn stone_count(&self) -> usize {
        self.rows.iter().flatten().filter(|cell| !cell.is_empty()).count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
