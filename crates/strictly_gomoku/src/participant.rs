//! Participants and outbound message addressing.

use crate::protocol::ServerMessage;
use serde::{Deserialize, Serialize};

/// Unique identifier of one client connection.
pub type ConnectionId = String;

/// A player or spectator attached to a room.
///
/// Identity is the connection: two participants may share a username.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct Participant {
    /// Connection the participant speaks through.
    #[serde(rename = "id")]
    pub connection_id: ConnectionId,
    /// Display name chosen at join time.
    pub username: String,
}

/// How a participant is attached to a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Seated player owning a turn slot.
    Player(crate::Slot),
    /// Watcher with no turn.
    Spectator,
}

/// A message addressed to one connection.
///
/// Room operations return notices instead of pushing them, so the rules stay
/// free of I/O and the caller decides how to deliver.
#[derive(Debug, Clone, PartialEq, Serialize, derive_new::new)]
pub struct Notice {
    /// Recipient connection.
    pub to: ConnectionId,
    /// Message to deliver.
    pub message: ServerMessage,
}

/// Builds one notice per participant, all carrying the same message.
pub(crate) fn notify_all<'a>(
    participants: impl IntoIterator<Item = &'a Participant>,
    message: ServerMessage,
) -> Vec<Notice> {
    participants
        .into_iter()
        .map(|p| Notice::new(p.connection_id.clone(), message.clone()))
        .collect()
}
