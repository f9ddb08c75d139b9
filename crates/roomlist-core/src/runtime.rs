//! Generic runtime for store orchestration.
//!
//! The Runtime drives the store's event loop, coordinating between:
//! - [`RoomListStore`]: categorization state machine
//! - [`Driver`]: event delivery and rendering
//! - subscribers: read-only [`RoomListView`]s on a watch channel

use std::sync::Arc;

use tokio::sync::watch;

use crate::{
    DirectMessages, Driver, RoomListAction, RoomListStore, RoomListView, driver::DriverRoom,
};

/// Generic runtime that owns the store and publishes its changes.
///
/// # Type Parameters
///
/// - `D`: Event source and renderer
/// - `M`: Direct-message lookup
pub struct Runtime<D: Driver, M> {
    driver: D,
    store: RoomListStore<D::Session, M>,
    publisher: watch::Sender<RoomListView<DriverRoom<D>>>,
    generation: u64,
}

impl<D, M> Runtime<D, M>
where
    D: Driver,
    M: DirectMessages,
{
    /// Create a new runtime with an unready store.
    pub fn new(driver: D, direct_messages: M) -> Self {
        let (publisher, _) = watch::channel(RoomListView::empty(0));
        Self { driver, store: RoomListStore::new(direct_messages), publisher, generation: 0 }
    }

    /// Subscribe to change notifications.
    ///
    /// The receiver is woken once per published change. A logout replaces
    /// the view with an empty one without waking it.
    pub fn subscribe(&self) -> watch::Receiver<RoomListView<DriverRoom<D>>> {
        self.publisher.subscribe()
    }

    /// Latest view, published or silently reset.
    pub fn view(&self) -> RoomListView<DriverRoom<D>> {
        self.publisher.borrow().clone()
    }

    /// Run until the driver closes its event stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to deliver an event or render.
    pub async fn run(mut self) -> Result<(), D::Error> {
        while self.step().await? {}

        self.driver.stop();
        Ok(())
    }

    /// Process the next event to completion.
    ///
    /// Returns `false` if the event stream is closed.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to deliver the event or render.
    pub async fn step(&mut self) -> Result<bool, D::Error> {
        let Some(event) = self.driver.poll_event().await? else {
            return Ok(false);
        };

        let actions = self.store.handle(event);
        self.process_actions(actions)?;
        Ok(true)
    }

    /// Process actions returned by the store.
    fn process_actions(&mut self, actions: Vec<RoomListAction>) -> Result<(), D::Error> {
        for action in actions {
            match action {
                RoomListAction::Publish => {
                    self.generation += 1;
                    let view = RoomListView {
                        generation: self.generation,
                        ready: self.store.is_ready(),
                        lists: Arc::new(self.store.room_lists().clone()),
                    };
                    tracing::debug!(generation = self.generation, "publishing room lists");
                    self.publisher.send_replace(view.clone());
                    self.driver.render(&view)?;
                },
                RoomListAction::Reset => {
                    let generation = self.generation;
                    self.publisher.send_if_modified(|view| {
                        *view = RoomListView::empty(generation);
                        false
                    });
                },
                RoomListAction::Failed(e) => {
                    tracing::error!(room_id = e.room_id(), "{e} - this should never happen");
                },
            }
        }
        Ok(())
    }

    /// The store.
    pub fn store(&self) -> &RoomListStore<D::Session, M> {
        &self.store
    }

    /// Mutable store access, e.g. to update the direct-message lookup.
    pub fn store_mut(&mut self) -> &mut RoomListStore<D::Session, M> {
        &mut self.store
    }

    /// The driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }
}
