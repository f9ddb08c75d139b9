//! Driver trait for abstracting event delivery and rendering.
//!
//! The [`Driver`] trait decouples the store runtime from the concrete event
//! bus and UI. Each host implements the trait, while the generic
//! [`crate::Runtime`] handles all orchestration.

use std::future::Future;

use crate::{RoomListEvent, RoomListView, Session};

/// Room handle type of a driver's session.
pub type DriverRoom<D> = <<D as Driver>::Session as Session>::Room;

/// Abstracts event delivery and rendering for the store runtime.
///
/// # Implementations
///
/// - **Host application**: Forwards its dispatcher's payloads and re-renders
///   the room list
/// - **Simulation**: Replays queued events against in-memory sessions
pub trait Driver: Send {
    /// Session handle carried by prepared sync events.
    type Session: Session;

    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next event, in delivery order.
    ///
    /// Returns `None` once the event stream is closed.
    fn poll_event(
        &mut self,
    ) -> impl Future<Output = Result<Option<RoomListEvent<Self::Session>>, Self::Error>> + Send;

    /// Render a freshly published view.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(
        &mut self,
        view: &RoomListView<<Self::Session as Session>::Room>,
    ) -> Result<(), Self::Error>;

    /// Release resources once the stream is closed.
    fn stop(&mut self);
}
