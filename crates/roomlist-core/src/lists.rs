//! Categorized room buckets.
//!
//! [`RoomLists`] is the "View Model" of the store: an ordered map from bucket
//! key to the rooms in that bucket. The six well-known buckets always exist;
//! every other key is a user-defined tag.

use std::collections::BTreeMap;

use crate::room::Room;

/// Pending invites.
pub const INVITE: &str = "im.vector.fake.invite";
/// Favourite rooms.
pub const FAVOURITE: &str = "m.favourite";
/// Untagged rooms that are not direct chats.
pub const RECENT: &str = "im.vector.fake.recent";
/// Untagged direct chats.
pub const DIRECT: &str = "im.vector.fake.direct";
/// Low priority rooms.
pub const LOW_PRIORITY: &str = "m.lowpriority";
/// Rooms the user left.
pub const ARCHIVED: &str = "im.vector.fake.archived";

/// Bucket keys present in every [`RoomLists`].
pub const WELL_KNOWN: [&str; 6] = [INVITE, FAVOURITE, RECENT, DIRECT, LOW_PRIORITY, ARCHIVED];

/// Rooms partitioned into named buckets.
///
/// Rooms within a bucket keep the order in which the session enumerated them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomLists<R> {
    lists: BTreeMap<String, Vec<R>>,
}

impl<R> Default for RoomLists<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> RoomLists<R> {
    /// Create lists with only the well-known buckets, all empty.
    pub fn new() -> Self {
        let lists = WELL_KNOWN.iter().map(|key| ((*key).to_owned(), Vec::new())).collect();
        Self { lists }
    }

    /// Append a room to a bucket, creating the bucket on demand.
    pub fn push(&mut self, key: &str, room: R) {
        match self.lists.get_mut(key) {
            Some(rooms) => rooms.push(room),
            None => {
                self.lists.insert(key.to_owned(), vec![room]);
            },
        }
    }

    /// Rooms in a bucket. Empty if the bucket does not exist.
    pub fn get(&self, key: &str) -> &[R] {
        self.lists.get(key).map_or(&[], Vec::as_slice)
    }

    /// Whether a bucket exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lists.contains_key(key)
    }

    /// All buckets in key order.
    pub fn buckets(&self) -> impl Iterator<Item = (&str, &[R])> {
        self.lists.iter().map(|(key, rooms)| (key.as_str(), rooms.as_slice()))
    }

    /// All bucket keys in key order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.lists.keys().map(String::as_str)
    }

    /// Keys of buckets created for tags that are not well-known.
    pub fn tag_keys(&self) -> impl Iterator<Item = &str> {
        self.keys().filter(|key| !WELL_KNOWN.contains(key))
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Whether there are no buckets at all.
    ///
    /// Never true for lists built by [`RoomLists::new`].
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Whether every bucket is empty.
    pub fn has_no_rooms(&self) -> bool {
        self.lists.values().all(Vec::is_empty)
    }
}

impl<R: Room> RoomLists<R> {
    /// Keys of every bucket containing `room_id`, in key order.
    pub fn keys_for(&self, room_id: &str) -> Vec<&str> {
        self.lists
            .iter()
            .filter(|(_, rooms)| rooms.iter().any(|room| room.room_id() == room_id))
            .map(|(key, _)| key.as_str())
            .collect()
    }

    /// Room ids in a bucket, in order.
    pub fn room_ids(&self, key: &str) -> Vec<&str> {
        self.get(key).iter().map(|room| room.room_id().as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_has_well_known_buckets() {
        let lists: RoomLists<u8> = RoomLists::new();

        assert_eq!(lists.len(), WELL_KNOWN.len());
        for key in WELL_KNOWN {
            assert!(lists.contains_key(key));
            assert!(lists.get(key).is_empty());
        }
        assert!(lists.has_no_rooms());
        assert_eq!(lists.tag_keys().count(), 0);
    }

    #[test]
    fn push_creates_tag_buckets() {
        let mut lists = RoomLists::new();
        lists.push("u.work", 1);
        lists.push("u.work", 2);
        lists.push(FAVOURITE, 3);

        assert_eq!(lists.get("u.work"), &[1, 2]);
        assert_eq!(lists.get(FAVOURITE), &[3]);
        assert_eq!(lists.tag_keys().collect::<Vec<_>>(), vec!["u.work"]);
        assert!(lists.get("u.missing").is_empty());
    }
}
