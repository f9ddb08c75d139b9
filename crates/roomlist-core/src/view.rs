//! Published read-only snapshots of the store.

use std::sync::Arc;

use crate::RoomLists;

/// Snapshot of the store handed to subscribers.
///
/// Lists are shared behind an [`Arc`]; subscribers cannot mutate them.
#[derive(Debug)]
pub struct RoomListView<R> {
    /// Number of change notifications published so far.
    pub generation: u64,
    /// Whether the lists reflect a bound session.
    pub ready: bool,
    /// Categorized rooms.
    pub lists: Arc<RoomLists<R>>,
}

impl<R> RoomListView<R> {
    /// Unready view with empty well-known buckets.
    pub fn empty(generation: u64) -> Self {
        Self { generation, ready: false, lists: Arc::new(RoomLists::new()) }
    }
}

impl<R> Clone for RoomListView<R> {
    fn clone(&self) -> Self {
        Self { generation: self.generation, ready: self.ready, lists: Arc::clone(&self.lists) }
    }
}
