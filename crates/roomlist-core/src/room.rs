//! Session, room and direct-message abstractions.
//!
//! The store never owns rooms. It reads them through the [`Session`] and
//! [`Room`] traits for the duration of one categorization pass, and asks a
//! [`DirectMessages`] lookup whether an untagged room is a direct chat.
//!
//! Production implementations wrap the remote session client; the simulation
//! harness provides in-memory ones.

use std::{collections::HashMap, fmt, sync::Arc};

/// Room identifier (e.g. `!abc:example.org`).
pub type RoomId = String;

/// User identifier (e.g. `@alice:example.org`).
pub type UserId = String;

/// Membership of a user in a room.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Membership {
    /// Invited but not yet joined.
    Invite,
    /// Joined.
    Join,
    /// Left, or was removed.
    Leave,
    /// Banned.
    Ban,
    /// Any membership value this store does not recognise.
    Other(String),
}

impl Membership {
    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Invite => "invite",
            Self::Join => "join",
            Self::Leave => "leave",
            Self::Ban => "ban",
            Self::Other(value) => value,
        }
    }
}

impl From<&str> for Membership {
    fn from(value: &str) -> Self {
        match value {
            "invite" => Self::Invite,
            "join" => Self::Join,
            "leave" => Self::Leave,
            "ban" => Self::Ban,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for Membership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's membership record in a room.
///
/// Mirrors the latest member state event: `user_id` is the subject (state
/// key) and `sender` is whoever sent the event. A `leave` sent by somebody
/// else is a kick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomMember {
    /// Subject of the member event.
    pub user_id: UserId,
    /// Current membership.
    pub membership: Membership,
    /// Sender of the member event.
    pub sender: UserId,
}

impl RoomMember {
    /// Create a record for a membership the user set themselves.
    pub fn new(user_id: impl Into<UserId>, membership: Membership) -> Self {
        let user_id = user_id.into();
        Self { sender: user_id.clone(), user_id, membership }
    }

    /// Set the sender of the member event.
    #[must_use]
    pub fn with_sender(mut self, sender: impl Into<UserId>) -> Self {
        self.sender = sender.into();
        self
    }

    /// Whether the user sent their own member event.
    pub fn is_self_initiated(&self) -> bool {
        self.sender == self.user_id
    }
}

/// A room as seen by the local session.
///
/// Implementations are expected to be cheap handles: every categorization
/// pass clones each room into the buckets it belongs to.
pub trait Room: Clone {
    /// Unique room identifier.
    fn room_id(&self) -> &RoomId;

    /// Membership record of `user_id`, or `None` if the room has none.
    fn member(&self, user_id: &str) -> Option<RoomMember>;

    /// Tag names the local user applied to this room, in the room's order.
    ///
    /// Repeated names are tolerated; categorization keeps the first one.
    fn tag_names(&self) -> Vec<String>;
}

/// A bound session of the remote client.
pub trait Session {
    /// Room handle type.
    type Room: Room;

    /// Local user identifier. Stable for the session's lifetime.
    fn user_id(&self) -> &UserId;

    /// Every room the session knows about, in enumeration order.
    fn rooms(&self) -> Vec<Self::Room>;
}

/// Lookup from room to direct-message counterparty.
pub trait DirectMessages {
    /// Counterparty of the direct chat held in `room_id`, if any.
    fn user_id_for_room(&self, room_id: &str) -> Option<UserId>;
}

impl DirectMessages for HashMap<RoomId, UserId> {
    fn user_id_for_room(&self, room_id: &str) -> Option<UserId> {
        self.get(room_id).cloned()
    }
}

impl<T: DirectMessages + ?Sized> DirectMessages for Arc<T> {
    fn user_id_for_room(&self, room_id: &str) -> Option<UserId> {
        (**self).user_id_for_room(room_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_parses_known_values() {
        assert_eq!(Membership::from("invite"), Membership::Invite);
        assert_eq!(Membership::from("join"), Membership::Join);
        assert_eq!(Membership::from("leave"), Membership::Leave);
        assert_eq!(Membership::from("ban"), Membership::Ban);
        assert_eq!(Membership::from("knock"), Membership::Other("knock".into()));
        assert_eq!(Membership::from("knock").to_string(), "knock");
    }

    #[test]
    fn kick_is_not_self_initiated() {
        let left = RoomMember::new("@me:hs", Membership::Leave);
        assert!(left.is_self_initiated());

        let kicked = left.with_sender("@mod:hs");
        assert!(!kicked.is_self_initiated());
    }

    #[test]
    fn hash_map_direct_messages() {
        let mut map = HashMap::new();
        map.insert("!dm:hs".to_owned(), "@bob:hs".to_owned());

        assert_eq!(map.user_id_for_room("!dm:hs").as_deref(), Some("@bob:hs"));
        assert_eq!(map.user_id_for_room("!other:hs"), None);
    }

    #[test]
    fn shared_direct_messages_delegate() {
        let mut map = HashMap::new();
        map.insert("!dm:hs".to_owned(), "@bob:hs".to_owned());
        let shared = Arc::new(map);

        assert_eq!(shared.user_id_for_room("!dm:hs").as_deref(), Some("@bob:hs"));
        assert_eq!(Arc::clone(&shared).user_id_for_room("!other:hs"), None);
    }
}
