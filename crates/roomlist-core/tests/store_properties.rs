//! Property-based tests for the room list store.
//!
//! Arbitrary interleavings of session changes and events must keep the
//! bucket invariants, and logout must never notify subscribers.

use proptest::prelude::*;
use roomlist_core::{
    FAVOURITE, LOW_PRIORITY, Membership, Room as _, RoomListAction, RoomListEvent, RoomListStore,
    SyncState, TagRequest,
};
use roomlist_harness::{InvariantRegistry, ListsSnapshot, SimDirectMessages, SimSession};

const ME: &str = "@me:hs";
const ROOMS: [&str; 4] = ["!a:hs", "!b:hs", "!c:hs", "!d:hs"];

type Store = RoomListStore<SimSession, SimDirectMessages>;

/// One step of a generated run.
#[derive(Debug, Clone)]
enum Op {
    SetTags(usize, Vec<&'static str>),
    SetMembership(usize, Membership, bool),
    SetDirect(usize, bool),
    Prepared,
    RoomTags(usize),
    DirectChanged,
    OwnMembership(usize),
    Pending(usize, Option<&'static str>, Option<&'static str>),
    Failure(usize, Option<&'static str>, Option<&'static str>),
    LoggedOut,
}

fn tag_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![FAVOURITE, LOW_PRIORITY, "u.work", "u.social"])
}

fn membership_strategy() -> impl Strategy<Value = Membership> {
    prop_oneof![
        1 => Just(Membership::Invite),
        3 => Just(Membership::Join),
        1 => Just(Membership::Leave),
        1 => Just(Membership::Ban),
    ]
}

fn room_strategy() -> impl Strategy<Value = usize> {
    0..ROOMS.len()
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => (room_strategy(), prop::collection::vec(tag_strategy(), 0..3))
            .prop_map(|(room, tags)| Op::SetTags(room, tags)),
        2 => (room_strategy(), membership_strategy(), any::<bool>())
            .prop_map(|(room, membership, kicked)| Op::SetMembership(room, membership, kicked)),
        1 => (room_strategy(), any::<bool>()).prop_map(|(room, direct)| Op::SetDirect(room, direct)),
        1 => Just(Op::Prepared),
        2 => room_strategy().prop_map(Op::RoomTags),
        1 => Just(Op::DirectChanged),
        2 => room_strategy().prop_map(Op::OwnMembership),
        2 => (room_strategy(), prop::option::of(tag_strategy()), prop::option::of(tag_strategy()))
            .prop_map(|(room, old, new)| Op::Pending(room, old, new)),
        1 => (room_strategy(), prop::option::of(tag_strategy()), prop::option::of(tag_strategy()))
            .prop_map(|(room, old, new)| Op::Failure(room, old, new)),
        1 => Just(Op::LoggedOut),
    ]
}

fn session() -> SimSession {
    ROOMS.iter().fold(SimSession::new(ME), |session, room| session.with_room(room, Membership::Join))
}

fn prepared(session: &SimSession) -> RoomListEvent<SimSession> {
    RoomListEvent::Sync { prev_state: None, state: SyncState::Prepared, session: session.clone() }
}

/// Apply `op` to the simulated session, returning the event to deliver.
fn apply(
    op: &Op,
    session: &SimSession,
    direct_messages: &SimDirectMessages,
) -> Option<RoomListEvent<SimSession>> {
    match op {
        Op::SetTags(room, tags) => {
            session.set_tags(ROOMS[*room], tags.iter().copied());
            None
        },
        Op::SetMembership(room, membership, kicked) => {
            let sender = kicked.then_some("@mod:hs");
            session.set_membership(ROOMS[*room], membership.clone(), sender);
            None
        },
        Op::SetDirect(room, true) => {
            direct_messages.set(ROOMS[*room], "@bob:hs");
            None
        },
        Op::SetDirect(room, false) => {
            direct_messages.remove(ROOMS[*room]);
            None
        },
        Op::Prepared => Some(prepared(session)),
        Op::RoomTags(room) => Some(RoomListEvent::RoomTags { room_id: ROOMS[*room].into() }),
        Op::DirectChanged => Some(RoomListEvent::AccountData { event_type: "m.direct".into() }),
        Op::OwnMembership(room) => {
            let membership =
                session.room(ROOMS[*room]).and_then(|r| r.member(ME)).map(|m| m.membership)?;
            Some(RoomListEvent::Membership {
                room_id: ROOMS[*room].into(),
                user_id: ME.into(),
                membership,
            })
        },
        Op::Pending(room, old, new) => Some(RoomListEvent::TagRoomPending {
            request: TagRequest::new(ROOMS[*room], *old, *new),
        }),
        Op::Failure(room, old, new) => Some(RoomListEvent::TagRoomFailure {
            request: TagRequest::new(ROOMS[*room], *old, *new),
        }),
        Op::LoggedOut => Some(RoomListEvent::LoggedOut),
    }
}

proptest! {
    /// Bucket invariants hold after every event.
    #[test]
    fn prop_invariants_hold(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let session = session();
        let direct_messages = SimDirectMessages::new();
        let mut store = Store::new(direct_messages.clone());
        let invariants = InvariantRegistry::standard();

        for op in &ops {
            let Some(event) = apply(op, &session, &direct_messages) else { continue };
            let _ = store.handle(event);

            let snapshot = ListsSnapshot::from_store(&store);
            prop_assert!(
                invariants.check_all(&snapshot).is_ok(),
                "Invariant violated after {:?}: {:?}", op, invariants.check_all(&snapshot)
            );
        }
    }

    /// Logout never publishes and always leaves an unready, empty store.
    #[test]
    fn prop_logout_is_silent(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let session = session();
        let direct_messages = SimDirectMessages::new();
        let mut store = Store::new(direct_messages.clone());

        for op in &ops {
            if let Some(event) = apply(op, &session, &direct_messages) {
                let _ = store.handle(event);
            }
        }

        let actions = store.handle(RoomListEvent::LoggedOut);
        prop_assert_eq!(actions, vec![RoomListAction::Reset]);
        prop_assert!(!store.is_ready());
        prop_assert!(store.room_lists().has_no_rooms());
    }

    /// Regenerating twice without changes yields identical lists.
    #[test]
    fn prop_regeneration_is_idempotent(
        ops in prop::collection::vec(op_strategy(), 0..40),
        room in room_strategy(),
    ) {
        let session = session();
        let direct_messages = SimDirectMessages::new();
        let mut store = Store::new(direct_messages.clone());
        let _ = store.handle(prepared(&session));

        for op in &ops {
            if let Some(event) = apply(op, &session, &direct_messages) {
                let _ = store.handle(event);
            }
        }
        let _ = store.handle(prepared(&session));

        let first = store.room_lists().clone();
        let actions = store.handle(RoomListEvent::RoomTags { room_id: ROOMS[room].into() });
        prop_assert_eq!(actions, vec![RoomListAction::Publish]);
        prop_assert_eq!(store.room_lists(), &first);
    }

    /// A failed tag change restores the confirmed placement.
    #[test]
    fn prop_failure_restores_confirmed_state(
        ops in prop::collection::vec(op_strategy(), 0..40),
        room in room_strategy(),
        old in prop::option::of(tag_strategy()),
        new in prop::option::of(tag_strategy()),
    ) {
        let session = session();
        let direct_messages = SimDirectMessages::new();
        let mut store = Store::new(direct_messages.clone());

        for op in &ops {
            if let Some(event) = apply(op, &session, &direct_messages) {
                let _ = store.handle(event);
            }
        }
        let _ = store.handle(prepared(&session));
        let confirmed = store.room_lists().clone();

        let request = TagRequest::new(ROOMS[room], old, new);
        let _ = store.handle(RoomListEvent::TagRoomPending { request: request.clone() });
        let _ = store.handle(RoomListEvent::TagRoomFailure { request });

        prop_assert_eq!(store.room_lists(), &confirmed);
    }
}
