//! Room list categorization
//!
//! Pure state machine and generic runtime that partition a session's rooms
//! into buckets (invites, favourites, direct chats, recent, low priority,
//! archived and user-defined tags) and republish them whenever tags,
//! direct-message mappings or the user's own memberships change.
//!
//! # Components
//!
//! - [`categorize`]: Pure categorization of a session's rooms
//! - [`RoomListStore`]: Reactive state machine (events in, actions out)
//! - [`Driver`]: Trait for host-specific event delivery and rendering
//! - [`Runtime`]: Event loop publishing [`RoomListView`]s to subscribers
//!
//! # Architecture
//!
//! The store never performs I/O. Sessions, rooms and the direct-message table
//! are consumed through the [`Session`], [`Room`] and [`DirectMessages`]
//! traits, so the same code runs against a real client and the in-memory
//! simulation harness.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod categorize;
mod driver;
mod error;
mod event;
mod lists;
mod room;
mod runtime;
mod store;
mod view;

pub use action::RoomListAction;
pub use categorize::{Categorization, Placement, TagRequest, categorize, classify};
pub use driver::{Driver, DriverRoom};
pub use error::RoomListError;
pub use event::{DIRECT_EVENT_TYPE, RoomListEvent, SyncState};
pub use lists::{
    ARCHIVED, DIRECT, FAVOURITE, INVITE, LOW_PRIORITY, RECENT, RoomLists, WELL_KNOWN,
};
pub use room::{DirectMessages, Membership, Room, RoomId, RoomMember, Session, UserId};
pub use runtime::Runtime;
pub use store::RoomListStore;
pub use view::RoomListView;
