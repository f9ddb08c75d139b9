//! Deterministic simulation harness for room list testing.
//!
//! In-memory implementations of the [`roomlist_core::Session`],
//! [`roomlist_core::Room`], [`roomlist_core::DirectMessages`] and
//! [`roomlist_core::Driver`] traits for deterministic, reproducible testing of
//! the store and its runtime.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Invariants verify WHAT must be true across all event sequences, not
//! specific scenarios. Use [`InvariantRegistry::standard()`] for the bucket
//! invariants.
//!
//! # Scenarios
//!
//! The `scenario` module loads JSON event sequences into a [`SimDriver`], as
//! used by the `roomlist-replay` tool.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod scenario;
pub mod sim_driver;
pub mod sim_session;

pub use invariants::{
    ExclusiveLists, Invariant, InvariantRegistry, InvariantResult, ListsSnapshot,
    NoDuplicateEntries, TagsTakePrecedence, UnreadyListsEmpty, Violation, WellKnownListsPresent,
};
pub use scenario::{EventSpec, RoomSpec, Scenario, ScenarioError, Step};
pub use sim_driver::{SimDriver, SimDriverError, SimStep};
pub use sim_session::{Mutation, SimDirectMessages, SimRoom, SimSession};
