//! Room list store state machine.
//!
//! This module defines the [`RoomListStore`], which keeps the current
//! categorization of the session's rooms completely decoupled from the event
//! bus and the UI.
//!
//! This is a pure state machine: it consumes [`crate::RoomListEvent`] inputs
//! and produces [`crate::RoomListAction`] instructions for the runtime to
//! execute.
//!
//! # Responsibilities
//!
//! - Binds the session once its initial sync is prepared.
//! - Recategorizes on tag, direct-message and own-membership changes.
//! - Previews pending tag changes and reverts them when they fail.
//! - Resets silently on logout.

use crate::{
    RoomListAction, RoomListEvent,
    categorize::{Categorization, TagRequest, categorize},
    error::RoomListError,
    event::{DIRECT_EVENT_TYPE, SyncState},
    lists::RoomLists,
    room::{DirectMessages, Session},
};

/// Room list state machine.
///
/// Single writer of the categorized lists. No I/O dependencies - fully
/// testable in simulation.
pub struct RoomListStore<S: Session, D> {
    /// Bound session. `None` until prepared and after logout.
    session: Option<S>,
    /// Direct-message lookup.
    direct_messages: D,
    /// Current categorization.
    lists: RoomLists<S::Room>,
    /// Lists reflect a bound session.
    ready: bool,
}

impl<S: Session, D: DirectMessages> RoomListStore<S, D> {
    /// Create an unready store with empty lists.
    pub fn new(direct_messages: D) -> Self {
        Self { session: None, direct_messages, lists: RoomLists::new(), ready: false }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: RoomListEvent<S>) -> Vec<RoomListAction> {
        tracing::debug!(kind = event.kind(), "room list event");

        match event {
            RoomListEvent::Sync { prev_state, state, session } => {
                if prev_state == Some(SyncState::Prepared) || state != SyncState::Prepared {
                    return vec![];
                }
                self.session = Some(session);
                self.regenerate(None)
            },
            RoomListEvent::RoomTags { room_id } => {
                if !self.ready {
                    return vec![];
                }
                tracing::debug!(%room_id, "room tags changed");
                self.regenerate(None)
            },
            RoomListEvent::AccountData { event_type } => {
                if event_type != DIRECT_EVENT_TYPE {
                    return vec![];
                }
                self.regenerate(None)
            },
            RoomListEvent::Membership { room_id, user_id, membership } => {
                let is_me = self.session.as_ref().is_some_and(|s| *s.user_id() == user_id);
                if !is_me {
                    return vec![];
                }
                tracing::debug!(%room_id, %membership, "own membership changed");
                self.regenerate(None)
            },
            RoomListEvent::TagRoomPending { request } => self.regenerate(Some(&request)),
            RoomListEvent::TagRoomFailure { request } => {
                tracing::debug!(room_id = %request.room_id, "tag request failed, reverting");
                self.regenerate(None)
            },
            RoomListEvent::LoggedOut => {
                self.reset();
                vec![RoomListAction::Reset]
            },
        }
    }

    /// Categorize the bound session's rooms and commit the result.
    fn regenerate(&mut self, request: Option<&TagRequest>) -> Vec<RoomListAction> {
        let Categorization { lists, failures } = match self.categorize(request) {
            Ok(categorization) => categorization,
            Err(e) => {
                tracing::warn!("skipping room list update: {e}");
                return vec![];
            },
        };

        self.lists = lists;
        self.ready = true;

        let mut actions: Vec<_> = failures.into_iter().map(RoomListAction::Failed).collect();
        actions.push(RoomListAction::Publish);
        actions
    }

    fn categorize(
        &self,
        request: Option<&TagRequest>,
    ) -> Result<Categorization<S::Room>, RoomListError> {
        let session = self.session.as_ref().ok_or(RoomListError::NoSession)?;
        Ok(categorize(session, &self.direct_messages, request))
    }

    fn reset(&mut self) {
        self.session = None;
        self.lists = RoomLists::new();
        self.ready = false;
    }

    /// Current lists. All buckets are empty until the store is ready.
    pub fn room_lists(&self) -> &RoomLists<S::Room> {
        &self.lists
    }

    /// Whether the lists reflect a bound session.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Bound session. `None` before the first prepared sync and after logout.
    pub fn session(&self) -> Option<&S> {
        self.session.as_ref()
    }

    /// Direct-message lookup.
    pub fn direct_messages(&self) -> &D {
        &self.direct_messages
    }

    /// Mutable direct-message lookup.
    ///
    /// Changes take effect on the next pass, e.g. after an
    /// [`RoomListEvent::AccountData`] event for `m.direct`.
    pub fn direct_messages_mut(&mut self) -> &mut D {
        &mut self.direct_messages
    }
}
