//! Store input events.
//!
//! This module defines [`RoomListEvent`], the set of inputs that drive the
//! [`crate::RoomListStore`] state machine. Each variant carries only what the
//! store needs to decide whether to recategorize.
//!
//! Events originate from two sources:
//! - Session notifications (sync state, tags, account data, membership).
//! - Local tag-change requests and their failures.

use crate::{
    categorize::TagRequest,
    room::{Membership, RoomId, UserId},
};

/// Account data event type holding the direct-message mapping.
pub const DIRECT_EVENT_TYPE: &str = "m.direct";

/// Lifecycle phase of the session's sync loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncState {
    /// Initial sync completed; rooms are available.
    Prepared,
    /// Incremental sync running.
    Syncing,
    /// Catching up after a reconnect.
    Catchup,
    /// Connection lost, retrying.
    Reconnecting,
    /// Sync failed.
    Error,
    /// Sync stopped.
    Stopped,
}

/// Events processed by the store.
///
/// Generic over `S`, the session handle bound when the session is prepared.
#[derive(Debug, Clone)]
pub enum RoomListEvent<S> {
    /// Sync state changed.
    Sync {
        /// Previous state. `None` before the first sync.
        prev_state: Option<SyncState>,
        /// New state.
        state: SyncState,
        /// Session that is syncing.
        session: S,
    },

    /// Tags of a room changed on the server.
    RoomTags {
        /// Room whose tags changed.
        room_id: RoomId,
    },

    /// Account data of the given type changed.
    AccountData {
        /// Account data event type.
        event_type: String,
    },

    /// A member's membership changed in some room.
    Membership {
        /// Room the change happened in.
        room_id: RoomId,
        /// Member whose membership changed.
        user_id: UserId,
        /// New membership.
        membership: Membership,
    },

    /// The user asked to retag a room; the server has not confirmed yet.
    TagRoomPending {
        /// Requested change.
        request: TagRequest,
    },

    /// A pending tag change was rejected.
    TagRoomFailure {
        /// The change that failed.
        request: TagRequest,
    },

    /// The session ended.
    LoggedOut,
}

impl<S> RoomListEvent<S> {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Sync { .. } => "sync",
            Self::RoomTags { .. } => "room_tags",
            Self::AccountData { .. } => "account_data",
            Self::Membership { .. } => "membership",
            Self::TagRoomPending { .. } => "tag_room_pending",
            Self::TagRoomFailure { .. } => "tag_room_failure",
            Self::LoggedOut => "logged_out",
        }
    }
}
