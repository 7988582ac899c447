//! Strictly Gomoku - five-in-a-row rules and room lifecycle.
//!
//! Everything here is plain data and pure functions: no sockets, no tasks.
//! Operations that would push messages to clients return [`Notice`]s
//! instead, and the server delivers them.
//!
//! # Architecture
//!
//! - **Board**: 15×15 grid of cells
//! - **Rules**: win and draw detection over a board
//! - **Room**: seats, spectators, turn order and move legality
//! - **Registry**: live rooms by name, removed when their game ends
//! - **Protocol**: JSON messages exchanged with clients
//!
//! # Example
//!
//! ```
//! use strictly_gomoku::{Participant, RoomRegistry};
//!
//! let mut registry = RoomRegistry::new();
//! registry.create("r1").unwrap();
//! let alice = registry
//!     .join("r1", Participant::new("c1".into(), "alice".into()), false)
//!     .unwrap();
//! registry
//!     .join("r1", Participant::new("c2".into(), "bob".into()), false)
//!     .unwrap();
//! assert!(registry.start(&alice.handle, "c1"));
//! let placement = registry.place(&alice.handle, "c1", 7, 7).unwrap();
//! assert_eq!(placement.notices.len(), 2);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod error;
mod participant;
mod protocol;
mod registry;
mod room;
pub mod rules;

pub use board::{BOARD_SIZE, Board, Cell, RUN_LENGTH, Slot};
pub use error::{JoinError, MoveRejection, RegistryError};
pub use participant::{ConnectionId, Notice, Participant, Role};
pub use protocol::{ClientMessage, GameEvent, JoinReply, RoomSnapshot, ServerMessage};
pub use registry::{Joined, RoomHandle, RoomRegistry};
pub use room::{Departure, MAX_PLAYERS, Placement, Room, RoomPhase, RoomSummary};
pub use rules::{Highlight, Orientation, Outcome, evaluate};
