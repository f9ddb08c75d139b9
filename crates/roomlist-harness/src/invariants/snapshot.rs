//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable state of the store at a point in time.
//! Invariants operate on snapshots rather than live state to ensure
//! consistent, atomic checks.

use std::collections::BTreeMap;

use roomlist_core::{
    DirectMessages, Room, RoomId, RoomListStore, RoomListView, RoomLists, Session,
};

/// Snapshot of the store's lists, with rooms reduced to their ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListsSnapshot {
    /// Whether the store reported itself ready.
    pub ready: bool,
    /// Room ids per bucket, in bucket order.
    pub lists: BTreeMap<String, Vec<RoomId>>,
}

impl ListsSnapshot {
    /// Snapshot of a set of lists.
    pub fn from_lists<R: Room>(ready: bool, lists: &RoomLists<R>) -> Self {
        let lists = lists
            .buckets()
            .map(|(key, rooms)| {
                (key.to_owned(), rooms.iter().map(|room| room.room_id().clone()).collect())
            })
            .collect();
        Self { ready, lists }
    }

    /// Snapshot of a published view.
    pub fn from_view<R: Room>(view: &RoomListView<R>) -> Self {
        Self::from_lists(view.ready, &view.lists)
    }

    /// Snapshot of a store.
    pub fn from_store<S: Session, D: DirectMessages>(store: &RoomListStore<S, D>) -> Self {
        Self::from_lists(store.is_ready(), store.room_lists())
    }

    /// Room ids in a bucket. Empty if the bucket is missing.
    pub fn rooms(&self, key: &str) -> &[RoomId] {
        self.lists.get(key).map_or(&[], Vec::as_slice)
    }

    /// Keys of every bucket containing `room_id`.
    pub fn keys_for(&self, room_id: &str) -> Vec<&str> {
        self.lists
            .iter()
            .filter(|(_, rooms)| rooms.iter().any(|id| id == room_id))
            .map(|(key, _)| key.as_str())
            .collect()
    }
}
