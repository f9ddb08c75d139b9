//! Checks behind [`super::InvariantRegistry::standard`].

use std::collections::HashSet;

use roomlist_core::{ARCHIVED, DIRECT, INVITE, RECENT, WELL_KNOWN};

use super::{Invariant, InvariantResult, ListsSnapshot, Violation};

/// The six well-known buckets always exist.
pub struct WellKnownListsPresent;

impl Invariant for WellKnownListsPresent {
    fn name(&self) -> &'static str {
        "well_known_lists_present"
    }

    fn check(&self, state: &ListsSnapshot) -> InvariantResult {
        match WELL_KNOWN.iter().find(|key| !state.lists.contains_key(**key)) {
            Some(key) => Err(Violation {
                invariant: self.name(),
                message: format!("missing bucket {key}"),
            }),
            None => Ok(()),
        }
    }
}

/// An unready store holds no rooms.
///
/// Consumers must not see data before the first pass or after logout.
pub struct UnreadyListsEmpty;

impl Invariant for UnreadyListsEmpty {
    fn name(&self) -> &'static str {
        "unready_lists_empty"
    }

    fn check(&self, state: &ListsSnapshot) -> InvariantResult {
        if state.ready {
            return Ok(());
        }
        match state.lists.iter().find(|(_, rooms)| !rooms.is_empty()) {
            Some((key, rooms)) => Err(Violation {
                invariant: self.name(),
                message: format!("unready store has rooms {rooms:?} in {key}"),
            }),
            None => Ok(()),
        }
    }
}

/// Invited and archived rooms appear in no other bucket.
pub struct ExclusiveLists;

impl Invariant for ExclusiveLists {
    fn name(&self) -> &'static str {
        "exclusive_lists"
    }

    fn check(&self, state: &ListsSnapshot) -> InvariantResult {
        for exclusive in [INVITE, ARCHIVED] {
            for room_id in state.rooms(exclusive) {
                let keys = state.keys_for(room_id);
                if keys != [exclusive] {
                    return Err(Violation {
                        invariant: self.name(),
                        message: format!("room {room_id} in {exclusive} is also in {keys:?}"),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Rooms in tag buckets never fall back to recent, direct or archived, and
/// recent and direct never overlap.
pub struct TagsTakePrecedence;

impl Invariant for TagsTakePrecedence {
    fn name(&self) -> &'static str {
        "tags_take_precedence"
    }

    fn check(&self, state: &ListsSnapshot) -> InvariantResult {
        let fallback = [RECENT, DIRECT, ARCHIVED];
        let tagged: HashSet<&str> = state
            .lists
            .iter()
            .filter(|(key, _)| *key != INVITE && !fallback.contains(&key.as_str()))
            .flat_map(|(_, rooms)| rooms.iter().map(String::as_str))
            .collect();

        for key in fallback {
            if let Some(room_id) = state.rooms(key).iter().find(|id| tagged.contains(id.as_str())) {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("tagged room {room_id} also in {key}"),
                });
            }
        }

        let direct = state.rooms(DIRECT);
        if let Some(room_id) = state.rooms(RECENT).iter().find(|id| direct.contains(*id)) {
            return Err(Violation {
                invariant: self.name(),
                message: format!("room {room_id} in both recent and direct"),
            });
        }
        Ok(())
    }
}

/// A room appears at most once per bucket.
pub struct NoDuplicateEntries;

impl Invariant for NoDuplicateEntries {
    fn name(&self) -> &'static str {
        "no_duplicate_entries"
    }

    fn check(&self, state: &ListsSnapshot) -> InvariantResult {
        for (key, rooms) in &state.lists {
            let mut seen = HashSet::new();
            if let Some(room_id) = rooms.iter().find(|id| !seen.insert(id.as_str())) {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("room {room_id} listed twice in {key}"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(lists: &[(&str, &[&str])]) -> ListsSnapshot {
        let mut state = ListsSnapshot { ready: true, ..Default::default() };
        for key in WELL_KNOWN {
            state.lists.insert(key.to_owned(), Vec::new());
        }
        for (key, rooms) in lists {
            state.lists.insert((*key).to_owned(), rooms.iter().map(|r| (*r).to_owned()).collect());
        }
        state
    }

    #[test]
    fn well_known_missing_fails() {
        let mut state = snapshot(&[]);
        state.lists.remove(DIRECT);
        assert!(WellKnownListsPresent.check(&state).is_err());
    }

    #[test]
    fn unready_with_rooms_fails() {
        let mut state = snapshot(&[(RECENT, &["!a"])]);
        state.ready = false;
        assert!(UnreadyListsEmpty.check(&state).is_err());
    }

    #[test]
    fn invite_elsewhere_fails() {
        let state = snapshot(&[(INVITE, &["!a"]), ("m.favourite", &["!a"])]);
        assert!(ExclusiveLists.check(&state).is_err());
    }

    #[test]
    fn tagged_in_recent_fails() {
        let state = snapshot(&[("u.work", &["!a"]), (RECENT, &["!a"])]);
        assert!(TagsTakePrecedence.check(&state).is_err());
    }

    #[test]
    fn recent_and_direct_overlap_fails() {
        let state = snapshot(&[(DIRECT, &["!a"]), (RECENT, &["!a"])]);
        assert!(TagsTakePrecedence.check(&state).is_err());
    }

    #[test]
    fn duplicate_entry_fails() {
        let state = snapshot(&[("u.work", &["!a", "!a"])]);
        assert!(NoDuplicateEntries.check(&state).is_err());
    }

    #[test]
    fn multi_tagged_room_passes() {
        let state = snapshot(&[("m.favourite", &["!a"]), ("u.work", &["!a"]), (RECENT, &["!b"])]);
        assert!(ExclusiveLists.check(&state).is_ok());
        assert!(TagsTakePrecedence.check(&state).is_ok());
        assert!(NoDuplicateEntries.check(&state).is_ok());
    }
}
