//! Draw detection logic for gomoku.

use super::win::find_line;
use crate::board::Board;
use tracing::instrument;

/// Checks if the board is a draw: every cell occupied and no five-in-a-row.
#[instrument(skip(board))]
pub fn is_draw(board: &Board) -> bool {
    board.is_full() && find_line(board).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BOARD_SIZE, Slot};

    /// Fills the board so that no row, column or diagonal holds five equal stones.
    ///
    /// Pairs of columns alternate and every row inverts the one above it.
    fn drawn_board() -> Board {
        let mut board = Board::new();
        for y in 0..BOARD_SIZE {
            for x in 0..BOARD_SIZE {
                let slot = if (x / 2 + y) % 2 == 0 {
                    Slot::First
                } else {
                    Slot::Second
                };
                board.set(x, y, slot);
            }
        }
        board
    }

    #[test]
    fn test_empty_board_not_draw() {
        assert!(!is_draw(&Board::new()));
    }

    #[test]
    fn test_partial_board_not_draw() {
        let mut board = Board::new();
        board.set(7, 7, Slot::First);
        assert!(!is_draw(&board));
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        let board = drawn_board();
        assert!(board.is_full());
        assert!(find_line(&board).is_none());
        assert!(is_draw(&board));
    }

    #[test]
    fn test_full_board_with_line_not_draw() {
        let mut board = Board::new();
        for y in 0..BOARD_SIZE {
            for x in 0..BOARD_SIZE {
                board.set(x, y, Slot::First);
            }
        }
        assert!(!is_draw(&board));
    }
}
