//! Win detection logic for gomoku.

use crate::board::{BOARD_SIZE, Board, Cell, RUN_LENGTH, Slot};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Last start coordinate from which a run still fits on the board.
const LAST_START: usize = BOARD_SIZE - RUN_LENGTH;

/// Direction of a winning line.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum Orientation {
    /// Left to right along a row.
    #[serde(rename = "h")]
    #[strum(to_string = "h")]
    Horizontal,
    /// Top to bottom along a column.
    #[serde(rename = "v")]
    #[strum(to_string = "v")]
    Vertical,
    /// Down and to the right.
    #[serde(rename = "d")]
    #[strum(to_string = "d")]
    DiagonalDownRight,
    /// Down and to the left.
    #[serde(rename = "rd")]
    #[strum(to_string = "rd")]
    DiagonalDownLeft,
}

impl Orientation {
    /// Column and row step from one cell of the line to the next.
    pub fn step(self) -> (isize, isize) {
        match self {
            Orientation::Horizontal => (1, 0),
            Orientation::Vertical => (0, 1),
            Orientation::DiagonalDownRight => (1, 1),
            Orientation::DiagonalDownLeft => (-1, 1),
        }
    }
}

/// The winning five-cell run: its direction and the cell the scan started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct Highlight {
    /// Direction of the line.
    #[serde(rename = "type")]
    pub orientation: Orientation,
    /// Anchor column.
    pub x: usize,
    /// Anchor row.
    pub y: usize,
}

impl Highlight {
    /// The five cells of the line, starting at the anchor.
    pub fn cells(&self) -> [(usize, usize); RUN_LENGTH] {
        let (dx, dy) = self.orientation.step();
        std::array::from_fn(|i| {
            let i = i as isize;
            (
                (self.x as isize + dx * i) as usize,
                (self.y as isize + dy * i) as usize,
            )
        })
    }
}

/// Returns the owner of the run if all of its cells hold the same slot.
fn run_owner(board: &Board, highlight: &Highlight) -> Option<Slot> {
    let mut cells = highlight.cells().into_iter().map(|(x, y)| board.get(x, y));
    let first = cells.next()?.slot()?;
    cells.all(|cell| cell == Cell::Occupied(first)).then_some(first)
}

/// Every candidate run in scan order: rows, then columns, then the `↘`
/// diagonals, then the `↙` diagonals.
///
/// The two diagonal sweeps run one after the other rather than interleaved
/// per anchor row, so any `↘` line outranks every `↙` line.
fn candidates() -> impl Iterator<Item = Highlight> {
    let rows = (0..BOARD_SIZE).flat_map(|y| {
        (0..=LAST_START).map(move |x| Highlight::new(Orientation::Horizontal, x, y))
    });
    let columns = (0..BOARD_SIZE).flat_map(|x| {
        (0..=LAST_START).map(move |y| Highlight::new(Orientation::Vertical, x, y))
    });
    let down_right = (0..=LAST_START).flat_map(|y| {
        (0..=LAST_START).map(move |x| Highlight::new(Orientation::DiagonalDownRight, x, y))
    });
    let down_left = (0..=LAST_START).flat_map(|y| {
        (RUN_LENGTH - 1..BOARD_SIZE)
            .rev()
            .map(move |x| Highlight::new(Orientation::DiagonalDownLeft, x, y))
    });
    rows.chain(columns).chain(down_right).chain(down_left)
}

/// Finds the first five-in-a-row on the board.
///
/// The scan order is fixed so that a board holding several lines always
/// reports the same one:
///
/// 1. rows `y = 0..=14`, start `x = 0..=10`
/// 2. columns `x = 0..=14`, start `y = 0..=10`
/// 3. `↘` diagonals, anchor rows `0..=10`, anchor columns `0..=10`
/// 4. `↙` diagonals, anchor rows `0..=10`, anchor columns `14` down to `4`
///
/// Returns the owning slot and the line's highlight, or `None`.
#[instrument(skip(board))]
pub fn find_line(board: &Board) -> Option<(Slot, Highlight)> {
    let found = candidates().find_map(|highlight| {
        run_owner(board, &highlight).map(|slot| (slot, highlight))
    });
    if let Some((slot, highlight)) = &found {
        debug!(%slot, orientation = %highlight.orientation, x = highlight.x, y = highlight.y, "Found five in a row");
    }
    found
}
