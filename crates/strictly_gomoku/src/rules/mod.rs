//! Game rules for gomoku.
//!
//! Pure functions over a [`Board`](crate::Board). Rules never touch room or
//! registry state; callers feed them the board they want judged.

pub mod draw;
pub mod win;

pub use draw::is_draw;
pub use win::{Highlight, Orientation, find_line};

use crate::board::{Board, Slot};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Result of judging a board after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// No line and free cells left.
    Continue,
    /// Every cell is occupied and no line exists.
    Draw,
    /// `slot` owns the highlighted five-in-a-row.
    Win {
        /// The winning slot.
        slot: Slot,
        /// The winning line.
        highlight: Highlight,
    },
}

impl Outcome {
    /// Checks if the game is over.
    pub fn is_decisive(&self) -> bool {
        !matches!(self, Outcome::Continue)
    }
}

/// Judges the board.
///
/// Lines are searched first, in the fixed order documented on [`find_line`];
/// a full board is only a draw when no line exists anywhere.
#[instrument(skip(board))]
pub fn evaluate(board: &Board) -> Outcome {
    if let Some((slot, highlight)) = find_line(board) {
        return Outcome::Win { slot, highlight };
    }
    if is_draw(board) {
        return Outcome::Draw;
    }
    Outcome::Continue
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_continues() {
        assert_eq!(evaluate(&Board::new()), Outcome::Continue);
        assert!(!Outcome::Continue.is_decisive());
    }

    #[test]
    fn test_full_board_with_line_is_a_win() {
        let mut board = Board::new();
        for y in 0..15 {
            for x in 0..15 {
                board.set(x, y, Slot::Second);
            }
        }
        assert_eq!(
            evaluate(&board),
            Outcome::Win {
                slot: Slot::Second,
                highlight: Highlight::new(Orientation::Horizontal, 0, 0),
            }
        );
    }
}
