//! Categorization engine.
//!
//! Pure projection of a session's rooms into [`RoomLists`]. Given the same
//! rooms, tags, direct-message lookup and request, the output is identical,
//! including the order of rooms inside each bucket.
//!
//! # Rules
//!
//! For the local user's membership in each room:
//!
//! - no membership: the room is skipped
//! - `invite`: [`INVITE`] only
//! - `join`, `ban`, or a `leave` sent by someone else (a kick): one entry per
//!   effective tag, else [`DIRECT`] if the room is a direct chat, else
//!   [`RECENT`]
//! - self-initiated `leave`: [`ARCHIVED`]
//! - anything else: dropped and reported

use crate::{
    error::RoomListError,
    lists::{ARCHIVED, DIRECT, INVITE, RECENT, RoomLists},
    room::{DirectMessages, Membership, Room, RoomId, Session},
};

/// A tag change the user initiated that the server has not confirmed yet.
///
/// Passed to a single categorization pass to preview the change; it is never
/// stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRequest {
    /// Room being retagged.
    pub room_id: RoomId,
    /// Tag being removed. `None` if only adding.
    pub old_tag: Option<String>,
    /// Tag being added. `None` or empty if only removing.
    pub new_tag: Option<String>,
}

impl TagRequest {
    /// Move `room_id` from `old_tag` to `new_tag`.
    pub fn new(
        room_id: impl Into<RoomId>,
        old_tag: Option<impl Into<String>>,
        new_tag: Option<impl Into<String>>,
    ) -> Self {
        Self {
            room_id: room_id.into(),
            old_tag: old_tag.map(Into::into),
            new_tag: new_tag.map(Into::into),
        }
    }

    /// Apply the change to a room's confirmed tags.
    pub fn apply(&self, tags: &mut Vec<String>) {
        if let Some(old_tag) = &self.old_tag {
            tags.retain(|tag| tag != old_tag);
        }
        if let Some(new_tag) = &self.new_tag
            && !new_tag.is_empty()
            && !tags.contains(new_tag)
        {
            tags.push(new_tag.clone());
        }
    }
}

/// Where a single room belongs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Pending invite.
    Invite,
    /// One entry per tag, in tag order.
    Tagged(Vec<String>),
    /// Untagged direct chat.
    Direct,
    /// Untagged, not a direct chat.
    Recent,
    /// Left by the user.
    Archived,
}

impl Placement {
    /// Bucket keys this placement puts the room into.
    pub fn keys(&self) -> Vec<&str> {
        match self {
            Self::Invite => vec![INVITE],
            Self::Tagged(tags) => tags.iter().map(String::as_str).collect(),
            Self::Direct => vec![DIRECT],
            Self::Recent => vec![RECENT],
            Self::Archived => vec![ARCHIVED],
        }
    }
}

/// Result of one categorization pass.
#[derive(Debug, Clone)]
pub struct Categorization<R> {
    /// Rooms by bucket.
    pub lists: RoomLists<R>,
    /// Rooms that could not be classified. They appear in no bucket.
    pub failures: Vec<RoomListError>,
}

/// Decide where a single room belongs for `user_id`.
///
/// Returns `Ok(None)` if the user has no membership in the room.
///
/// # Errors
///
/// [`RoomListError::UnrecognisedMembership`] if the membership is not one of
/// `invite`, `join`, `leave` or `ban`.
pub fn classify<R: Room, D: DirectMessages + ?Sized>(
    room: &R,
    user_id: &str,
    direct_messages: &D,
    request: Option<&TagRequest>,
) -> Result<Option<Placement>, RoomListError> {
    let Some(me) = room.member(user_id) else {
        return Ok(None);
    };

    let self_initiated = me.is_self_initiated();
    let placement = match me.membership {
        Membership::Invite => Placement::Invite,
        Membership::Leave if self_initiated => Placement::Archived,
        Membership::Join | Membership::Ban | Membership::Leave => {
            classify_by_tag(room, direct_messages, request)
        },
        Membership::Other(value) => {
            return Err(RoomListError::UnrecognisedMembership {
                room_id: room.room_id().clone(),
                membership: Membership::Other(value),
            });
        },
    };

    Ok(Some(placement))
}

fn classify_by_tag<R: Room, D: DirectMessages + ?Sized>(
    room: &R,
    direct_messages: &D,
    request: Option<&TagRequest>,
) -> Placement {
    let mut tags = Vec::new();
    for tag in room.tag_names() {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    if let Some(request) = request.filter(|request| &request.room_id == room.room_id()) {
        request.apply(&mut tags);
        tracing::debug!(room_id = %room.room_id(), ?tags, "new tags optimistically");
    }

    if !tags.is_empty() {
        Placement::Tagged(tags)
    } else if direct_messages.user_id_for_room(room.room_id()).is_some() {
        Placement::Direct
    } else {
        Placement::Recent
    }
}

/// Categorize every room of `session`.
///
/// `request` previews an unconfirmed tag change; a request for a room the
/// session does not know has no effect.
pub fn categorize<S: Session, D: DirectMessages + ?Sized>(
    session: &S,
    direct_messages: &D,
    request: Option<&TagRequest>,
) -> Categorization<S::Room> {
    let user_id = session.user_id();
    let mut lists = RoomLists::new();
    let mut failures = Vec::new();

    for room in session.rooms() {
        match classify(&room, user_id, direct_messages, request) {
            Ok(Some(placement)) => {
                for key in placement.keys() {
                    lists.push(key, room.clone());
                }
            },
            Ok(None) => {},
            Err(e) => failures.push(e),
        }
    }

    Categorization { lists, failures }
}
