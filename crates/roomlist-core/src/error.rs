//! Error types for the room list store.
//!
//! None of these abort event handling. Classification failures drop a single
//! room from one pass; a missing session skips the pass entirely.

use thiserror::Error;

use crate::room::{Membership, RoomId};

/// Errors reported while categorizing rooms.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoomListError {
    /// The local user's membership in a room is not one the store knows
    #[error("unrecognised membership {membership} in room {room_id}")]
    UnrecognisedMembership {
        /// Room that could not be classified
        room_id: RoomId,
        /// Membership that was found
        membership: Membership,
    },

    /// Categorization was requested before a session was bound
    #[error("no session bound")]
    NoSession,
}

impl RoomListError {
    /// Room the error concerns, if it concerns a single room.
    pub fn room_id(&self) -> Option<&str> {
        match self {
            Self::UnrecognisedMembership { room_id, .. } => Some(room_id),
            Self::NoSession => None,
        }
    }
}
