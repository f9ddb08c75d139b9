//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` replays a queue of events and session mutations in order. It
//! implements [`Driver`] so the same [`roomlist_core::Runtime`] orchestration
//! code runs in both the host application and simulation.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use roomlist_core::{Driver, RoomListEvent, RoomListView, SyncState, TagRequest};

use crate::{
    invariants::{InvariantRegistry, ListsSnapshot},
    sim_session::{Mutation, SimDirectMessages, SimRoom, SimSession},
};

/// Error type for simulation driver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("SimDriverError: {0}")]
pub struct SimDriverError(pub String);

/// One queued step.
#[derive(Debug, Clone)]
pub enum SimStep {
    /// Change the session or direct-message table without telling the store.
    Mutate(Mutation),
    /// Deliver an event to the store.
    Event(RoomListEvent<SimSession>),
}

/// Shared state for step injection and render capture.
#[derive(Default)]
struct SharedState {
    pending: VecDeque<SimStep>,
    renders: Vec<RoomListView<SimRoom>>,
    stopped: bool,
}

/// Simulation driver for deterministic testing.
///
/// Clones share the queue and captured renders, so a test can keep a handle
/// after moving the driver into a [`roomlist_core::Runtime`].
#[derive(Clone)]
pub struct SimDriver {
    session: SimSession,
    direct_messages: SimDirectMessages,
    state: Arc<Mutex<SharedState>>,
    invariants: Option<Arc<InvariantRegistry>>,
}

impl SimDriver {
    /// Create a driver for the given session and direct-message table.
    pub fn new(session: SimSession, direct_messages: SimDirectMessages) -> Self {
        Self {
            session,
            direct_messages,
            state: Arc::new(Mutex::new(SharedState::default())),
            invariants: None,
        }
    }

    /// Enable invariant checking on every render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(Arc::new(registry));
        self
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Simulated session.
    pub fn session(&self) -> &SimSession {
        &self.session
    }

    /// Simulated direct-message table.
    pub fn direct_messages(&self) -> &SimDirectMessages {
        &self.direct_messages
    }

    /// Queue an event.
    pub fn inject_event(&self, event: RoomListEvent<SimSession>) {
        self.lock().pending.push_back(SimStep::Event(event));
    }

    /// Queue a mutation.
    pub fn inject_mutation(&self, mutation: Mutation) {
        self.lock().pending.push_back(SimStep::Mutate(mutation));
    }

    /// Queue the initial prepared sync for this driver's session.
    pub fn inject_prepared(&self) {
        self.inject_event(RoomListEvent::Sync {
            prev_state: None,
            state: SyncState::Prepared,
            session: self.session.clone(),
        });
    }

    /// Queue a tag change that is pending and then fails.
    pub fn inject_failed_tag_request(&self, request: TagRequest) {
        self.inject_event(RoomListEvent::TagRoomPending { request: request.clone() });
        self.inject_event(RoomListEvent::TagRoomFailure { request });
    }

    /// Check if there are pending steps.
    pub fn has_pending(&self) -> bool {
        !self.lock().pending.is_empty()
    }

    /// Views rendered so far, oldest first.
    pub fn renders(&self) -> Vec<RoomListView<SimRoom>> {
        self.lock().renders.clone()
    }

    /// Number of views rendered so far.
    pub fn render_count(&self) -> usize {
        self.lock().renders.len()
    }

    /// Whether the runtime stopped the driver.
    pub fn is_stopped(&self) -> bool {
        self.lock().stopped
    }
}

impl Driver for SimDriver {
    type Session = SimSession;
    type Error = SimDriverError;

    async fn poll_event(&mut self) -> Result<Option<RoomListEvent<SimSession>>, Self::Error> {
        loop {
            let step = self.lock().pending.pop_front();
            match step {
                Some(SimStep::Mutate(mutation)) => {
                    tracing::trace!(?mutation, "applying mutation");
                    mutation.apply(&self.session, &self.direct_messages);
                },
                Some(SimStep::Event(event)) => return Ok(Some(event)),
                None => return Ok(None),
            }
        }
    }

    fn render(&mut self, view: &RoomListView<SimRoom>) -> Result<(), Self::Error> {
        if let Some(registry) = &self.invariants {
            let snapshot = ListsSnapshot::from_view(view);
            if let Err(violations) = registry.check_all(&snapshot) {
                let messages: Vec<_> = violations.iter().map(ToString::to_string).collect();
                return Err(SimDriverError(format!(
                    "invariant violation at generation {}: {}",
                    view.generation,
                    messages.join("; ")
                )));
            }
        }

        self.lock().renders.push(view.clone());
        Ok(())
    }

    fn stop(&mut self) {
        self.lock().stopped = true;
    }
}
