//! In-memory session, rooms and direct-message table.
//!
//! [`SimSession`] and [`SimDirectMessages`] are shared handles: clones see the
//! same state, so a test can mutate rooms after the session was bound to a
//! store and then dispatch the event that makes the store notice.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use roomlist_core::{DirectMessages, Membership, Room, RoomId, RoomMember, Session, UserId};
use serde::Deserialize;

/// Snapshot of a room as the simulated session reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimRoom {
    room_id: RoomId,
    members: BTreeMap<UserId, RoomMember>,
    tags: Vec<String>,
}

impl SimRoom {
    /// Create a room with no members and no tags.
    pub fn new(room_id: impl Into<RoomId>) -> Self {
        Self { room_id: room_id.into(), members: BTreeMap::new(), tags: Vec::new() }
    }

    /// Set a member record, replacing any previous one for the same user.
    #[must_use]
    pub fn with_member(mut self, member: RoomMember) -> Self {
        self.set_member(member);
        self
    }

    /// Set the room's tags.
    #[must_use]
    pub fn with_tags<T: Into<String>>(mut self, tags: impl IntoIterator<Item = T>) -> Self {
        self.set_tags(tags);
        self
    }

    /// Set a member record, replacing any previous one for the same user.
    pub fn set_member(&mut self, member: RoomMember) {
        self.members.insert(member.user_id.clone(), member);
    }

    /// Set the room's tags. Duplicates are dropped, first occurrence wins.
    pub fn set_tags<T: Into<String>>(&mut self, tags: impl IntoIterator<Item = T>) {
        self.tags.clear();
        for tag in tags {
            let tag = tag.into();
            if !self.tags.contains(&tag) {
                self.tags.push(tag);
            }
        }
    }
}

impl Room for SimRoom {
    fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    fn member(&self, user_id: &str) -> Option<RoomMember> {
        self.members.get(user_id).cloned()
    }

    fn tag_names(&self) -> Vec<String> {
        self.tags.clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Simulated session client.
#[derive(Debug, Clone)]
pub struct SimSession {
    user_id: UserId,
    rooms: Arc<Mutex<Vec<SimRoom>>>,
}

impl SimSession {
    /// Create a session with no rooms.
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self { user_id: user_id.into(), rooms: Arc::new(Mutex::new(Vec::new())) }
    }

    /// Add a room in which the local user has `membership`.
    #[must_use]
    pub fn with_room(self, room_id: &str, membership: Membership) -> Self {
        let room = SimRoom::new(room_id).with_member(RoomMember::new(&*self.user_id, membership));
        self.add_room(room);
        self
    }

    /// Add a tagged room the local user joined.
    #[must_use]
    pub fn with_tagged_room(self, room_id: &str, tags: &[&str]) -> Self {
        let room = SimRoom::new(room_id)
            .with_member(RoomMember::new(&*self.user_id, Membership::Join))
            .with_tags(tags.iter().copied());
        self.add_room(room);
        self
    }

    /// Add a room, replacing any room with the same id in place.
    pub fn add_room(&self, room: SimRoom) {
        let mut rooms = lock(&self.rooms);
        match rooms.iter_mut().find(|r| r.room_id == room.room_id) {
            Some(existing) => *existing = room,
            None => rooms.push(room),
        }
    }

    /// Forget a room.
    pub fn remove_room(&self, room_id: &str) {
        lock(&self.rooms).retain(|r| r.room_id != room_id);
    }

    /// Replace a room's tags. No-op if the room is unknown.
    pub fn set_tags<T: Into<String>>(&self, room_id: &str, tags: impl IntoIterator<Item = T>) {
        if let Some(room) = lock(&self.rooms).iter_mut().find(|r| r.room_id == room_id) {
            room.set_tags(tags);
        }
    }

    /// Set a member record in a room. No-op if the room is unknown.
    pub fn set_member(&self, room_id: &str, member: RoomMember) {
        if let Some(room) = lock(&self.rooms).iter_mut().find(|r| r.room_id == room_id) {
            room.set_member(member);
        }
    }

    /// Set the local user's membership in a room.
    ///
    /// `sender` defaults to the local user; anything else makes a `leave`
    /// a kick.
    pub fn set_membership(&self, room_id: &str, membership: Membership, sender: Option<&str>) {
        let mut member = RoomMember::new(&*self.user_id, membership);
        if let Some(sender) = sender {
            member = member.with_sender(sender);
        }
        self.set_member(room_id, member);
    }

    /// Current snapshot of a room.
    pub fn room(&self, room_id: &str) -> Option<SimRoom> {
        lock(&self.rooms).iter().find(|r| r.room_id == room_id).cloned()
    }
}

impl Session for SimSession {
    type Room = SimRoom;

    fn user_id(&self) -> &UserId {
        &self.user_id
    }

    fn rooms(&self) -> Vec<SimRoom> {
        lock(&self.rooms).clone()
    }
}

/// Simulated direct-message table.
#[derive(Debug, Clone, Default)]
pub struct SimDirectMessages {
    map: Arc<Mutex<HashMap<RoomId, UserId>>>,
}

impl SimDirectMessages {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `room_id` as a direct chat with `user_id`.
    pub fn set(&self, room_id: impl Into<RoomId>, user_id: impl Into<UserId>) {
        lock(&self.map).insert(room_id.into(), user_id.into());
    }

    /// Forget the mapping for `room_id`.
    pub fn remove(&self, room_id: &str) {
        lock(&self.map).remove(room_id);
    }
}

impl DirectMessages for SimDirectMessages {
    fn user_id_for_room(&self, room_id: &str) -> Option<UserId> {
        lock(&self.map).get(room_id).cloned()
    }
}

/// Change applied to the simulated session or direct-message table.
///
/// Mutations change what the session reports without telling the store;
/// the store only notices on the next event that triggers a pass.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    /// Add (or replace) a room with the local user's membership.
    AddRoom {
        /// Room to add.
        room_id: RoomId,
        /// Local user's membership (`invite`, `join`, `leave`, `ban`, ...).
        membership: String,
        /// Sender of the member event. Defaults to the local user.
        #[serde(default)]
        sender: Option<UserId>,
        /// Room tags.
        #[serde(default)]
        tags: Vec<String>,
    },

    /// Forget a room.
    RemoveRoom {
        /// Room to remove.
        room_id: RoomId,
    },

    /// Replace a room's tags.
    SetTags {
        /// Room to retag.
        room_id: RoomId,
        /// New tags.
        tags: Vec<String>,
    },

    /// Change the local user's membership.
    SetMembership {
        /// Room concerned.
        room_id: RoomId,
        /// New membership.
        membership: String,
        /// Sender of the member event. Defaults to the local user.
        #[serde(default)]
        sender: Option<UserId>,
    },

    /// Set or clear a direct-message mapping.
    SetDirect {
        /// Room concerned.
        room_id: RoomId,
        /// Counterparty. `None` clears the mapping.
        #[serde(default)]
        user_id: Option<UserId>,
    },
}

impl Mutation {
    /// Apply to the given session and direct-message table.
    pub fn apply(&self, session: &SimSession, direct_messages: &SimDirectMessages) {
        match self {
            Self::AddRoom { room_id, membership, sender, tags } => {
                let mut member = RoomMember::new(session.user_id(), Membership::from(&**membership));
                if let Some(sender) = sender {
                    member = member.with_sender(sender.clone());
                }
                session.add_room(SimRoom::new(room_id.clone()).with_member(member).with_tags(tags));
            },
            Self::RemoveRoom { room_id } => session.remove_room(room_id),
            Self::SetTags { room_id, tags } => session.set_tags(room_id, tags),
            Self::SetMembership { room_id, membership, sender } => {
                session.set_membership(room_id, Membership::from(&**membership), sender.as_deref());
            },
            Self::SetDirect { room_id, user_id: Some(user_id) } => {
                direct_messages.set(room_id.clone(), user_id.clone());
            },
            Self::SetDirect { room_id, user_id: None } => direct_messages.remove(room_id),
        }
    }
}
