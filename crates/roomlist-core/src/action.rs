//! Store side-effects.
//!
//! This module defines the [`RoomListAction`] enum, which represents
//! instructions produced by the [`crate::RoomListStore`] for the runtime to
//! execute.

use crate::RoomListError;

/// Actions produced by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomListAction {
    /// New lists were committed. Notify subscribers.
    Publish,

    /// The store was reset to its empty, unready state. Subscribers must not
    /// be notified.
    Reset,

    /// A room could not be classified during the last pass.
    Failed(RoomListError),
}
