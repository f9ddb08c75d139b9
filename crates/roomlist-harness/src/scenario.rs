//! JSON scenarios for replaying event sequences.
//!
//! A scenario describes the initial session (rooms, tags, direct chats) and a
//! list of steps: mutations of the simulated session and events delivered to
//! the store.
//!
//! ```json
//! {
//!   "user_id": "@me:example.org",
//!   "rooms": [{ "room_id": "!a:example.org", "membership": "join", "tags": ["m.favourite"] }],
//!   "direct": { "!dm:example.org": "@bob:example.org" },
//!   "steps": [
//!     { "event": { "type": "prepared" } },
//!     { "mutate": { "op": "set_tags", "room_id": "!a:example.org", "tags": [] } },
//!     { "event": { "type": "room_tags", "room_id": "!a:example.org" } }
//!   ]
//! }
//! ```

use std::{collections::BTreeMap, path::Path};

use roomlist_core::{Membership, RoomId, RoomListEvent, SyncState, TagRequest, UserId};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    sim_driver::{SimDriver, SimStep},
    sim_session::{Mutation, SimDirectMessages, SimSession},
};

/// Errors loading a scenario.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// Scenario file could not be read
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    /// Scenario is not valid JSON for this format
    #[error("invalid scenario: {0}")]
    Json(#[from] serde_json::Error),

    /// Sync state name not recognised
    #[error("unknown sync state: {0}")]
    UnknownSyncState(String),
}

/// A replayable scenario.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Local user.
    pub user_id: UserId,
    /// Rooms known to the session at the start.
    #[serde(default)]
    pub rooms: Vec<RoomSpec>,
    /// Initial direct-message table.
    #[serde(default)]
    pub direct: BTreeMap<RoomId, UserId>,
    /// Steps in delivery order.
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// A room in the initial session.
#[derive(Debug, Clone, Deserialize)]
pub struct RoomSpec {
    /// Room id.
    pub room_id: RoomId,
    /// Local user's membership.
    pub membership: String,
    /// Sender of the local user's member event. Defaults to the user.
    #[serde(default)]
    pub sender: Option<UserId>,
    /// Room tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One scenario step.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Mutate the simulated session.
    Mutate(Mutation),
    /// Deliver an event.
    Event(EventSpec),
}

/// Serializable form of [`RoomListEvent`].
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventSpec {
    /// First prepared sync of the scenario's session.
    Prepared,
    /// Arbitrary sync state transition.
    Sync {
        /// Previous state name.
        #[serde(default)]
        prev_state: Option<String>,
        /// New state name.
        state: String,
    },
    /// Room tags changed.
    RoomTags {
        /// Room concerned.
        room_id: RoomId,
    },
    /// Account data changed.
    AccountData {
        /// Event type, `m.direct` for the direct-message table.
        event_type: String,
    },
    /// Membership changed.
    Membership {
        /// Room concerned.
        room_id: RoomId,
        /// Member concerned.
        user_id: UserId,
        /// New membership.
        membership: String,
    },
    /// Pending tag change.
    TagRoomPending {
        /// Room concerned.
        room_id: RoomId,
        /// Tag removed.
        #[serde(default)]
        old_tag: Option<String>,
        /// Tag added.
        #[serde(default)]
        new_tag: Option<String>,
    },
    /// Failed tag change.
    TagRoomFailure {
        /// Room concerned.
        room_id: RoomId,
        /// Tag removed.
        #[serde(default)]
        old_tag: Option<String>,
        /// Tag added.
        #[serde(default)]
        new_tag: Option<String>,
    },
    /// Logout.
    LoggedOut,
}

/// Parse a sync state name (`PREPARED`, `syncing`, ...).
///
/// # Errors
///
/// [`ScenarioError::UnknownSyncState`] for any other name.
pub fn parse_sync_state(name: &str) -> Result<SyncState, ScenarioError> {
    match name.to_ascii_lowercase().as_str() {
        "prepared" => Ok(SyncState::Prepared),
        "syncing" => Ok(SyncState::Syncing),
        "catchup" => Ok(SyncState::Catchup),
        "reconnecting" => Ok(SyncState::Reconnecting),
        "error" => Ok(SyncState::Error),
        "stopped" => Ok(SyncState::Stopped),
        _ => Err(ScenarioError::UnknownSyncState(name.to_owned())),
    }
}

impl EventSpec {
    /// Build the event for `session`.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::UnknownSyncState`] for unknown sync state names.
    pub fn into_event(
        self,
        session: &SimSession,
    ) -> Result<RoomListEvent<SimSession>, ScenarioError> {
        let event = match self {
            Self::Prepared => RoomListEvent::Sync {
                prev_state: None,
                state: SyncState::Prepared,
                session: session.clone(),
            },
            Self::Sync { prev_state, state } => RoomListEvent::Sync {
                prev_state: prev_state.as_deref().map(parse_sync_state).transpose()?,
                state: parse_sync_state(&state)?,
                session: session.clone(),
            },
            Self::RoomTags { room_id } => RoomListEvent::RoomTags { room_id },
            Self::AccountData { event_type } => RoomListEvent::AccountData { event_type },
            Self::Membership { room_id, user_id, membership } => RoomListEvent::Membership {
                room_id,
                user_id,
                membership: Membership::from(membership.as_str()),
            },
            Self::TagRoomPending { room_id, old_tag, new_tag } => RoomListEvent::TagRoomPending {
                request: TagRequest { room_id, old_tag, new_tag },
            },
            Self::TagRoomFailure { room_id, old_tag, new_tag } => RoomListEvent::TagRoomFailure {
                request: TagRequest { room_id, old_tag, new_tag },
            },
            Self::LoggedOut => RoomListEvent::LoggedOut,
        };
        Ok(event)
    }
}

impl Scenario {
    /// Parse a scenario from JSON.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::Json`] if the JSON does not describe a scenario.
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a scenario file.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::Io`] if the file cannot be read, or
    /// [`ScenarioError::Json`] if it does not describe a scenario.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Build the initial session and a driver with every step queued.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::UnknownSyncState`] if a step names an unknown sync
    /// state. Nothing is queued in that case.
    pub fn into_driver(self) -> Result<SimDriver, ScenarioError> {
        let session = SimSession::new(self.user_id);
        let direct_messages = SimDirectMessages::new();

        for room in self.rooms {
            let mutation = Mutation::AddRoom {
                room_id: room.room_id,
                membership: room.membership,
                sender: room.sender,
                tags: room.tags,
            };
            mutation.apply(&session, &direct_messages);
        }
        for (room_id, user_id) in self.direct {
            direct_messages.set(room_id, user_id);
        }

        let steps = self
            .steps
            .into_iter()
            .map(|step| match step {
                Step::Mutate(mutation) => Ok(SimStep::Mutate(mutation)),
                Step::Event(spec) => spec.into_event(&session).map(SimStep::Event),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let driver = SimDriver::new(session, direct_messages);
        for step in steps {
            match step {
                SimStep::Mutate(mutation) => driver.inject_mutation(mutation),
                SimStep::Event(event) => driver.inject_event(event),
            }
        }
        Ok(driver)
    }
}
