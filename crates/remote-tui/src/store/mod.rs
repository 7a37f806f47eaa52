//! Domain stores: playlist, status and layout.
//!
//! State only changes through `Store::commit`, which runs the slice's pure
//! reducer and then publishes the mutation on the bus. Async actions live on
//! the `Dispatcher`; they run as tokio tasks and send their mutations back to
//! the App loop as `StoreMessage`s, which commits them in arrival order.

pub mod layout;
pub mod playlist;
pub mod status;

#[cfg(test)]
pub(crate) mod testing;

use std::future::Future;

use remote_proto::{Gateway, GatewayError};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::app_state::AppState;
use crate::bus::{ActionKind, EventBus, MutationKind, StoreEvent};

use layout::LayoutMutation;
use playlist::PlaylistMutation;
use status::StatusMutation;

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Playlist(PlaylistMutation),
    Status(StatusMutation),
    Layout(LayoutMutation),
}

impl Mutation {
    pub fn kind(&self) -> MutationKind {
        match self {
            Self::Playlist(m) => m.kind(),
            Self::Status(m) => m.kind(),
            Self::Layout(m) => m.kind(),
        }
    }
}

/// What an action task reports back to the App loop.
#[derive(Debug)]
pub enum StoreMessage {
    Commit(Mutation),
    Failed { action: ActionKind, error: GatewayError },
}

pub struct Store {
    state: AppState,
    bus: EventBus,
}

impl Store {
    pub fn new(state: AppState, bus: EventBus) -> Self {
        Self { state, bus }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Non-store parts of `AppState` (terminal size and the like).
    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn commit(&mut self, mutation: Mutation) {
        let kind = mutation.kind();
        match mutation {
            Mutation::Playlist(m) => {
                let old = std::mem::take(&mut self.state.playlist);
                self.state.playlist = playlist::reduce(old, m);
            }
            Mutation::Status(m) => {
                let old = std::mem::take(&mut self.state.status);
                self.state.status = status::reduce(old, m);
            }
            Mutation::Layout(m) => {
                self.state.layout = layout::reduce(self.state.layout, m);
            }
        }
        self.bus.publish(StoreEvent::Committed(kind));
    }

    fn announce(&self, action: ActionKind) {
        self.bus.publish(StoreEvent::Dispatched(action));
    }
}

/// Runs the async store actions against the player.
#[derive(Clone)]
pub struct Dispatcher {
    gateway: Gateway,
    bus: EventBus,
    tx: mpsc::Sender<StoreMessage>,
}

impl Dispatcher {
    pub fn new(gateway: Gateway, bus: EventBus, tx: mpsc::Sender<StoreMessage>) -> Self {
        Self { gateway, bus, tx }
    }

    /// Publish the action and run `work` on its own task.
    fn spawn<F, Fut>(&self, action: ActionKind, work: F)
    where
        F: FnOnce(Dispatcher) -> Fut,
        Fut: Future<Output = Result<(), GatewayError>> + Send + 'static,
    {
        debug!("dispatch {}", action.label());
        self.bus.publish(StoreEvent::Dispatched(action));
        let this = self.clone();
        let fut = work(self.clone());
        tokio::spawn(async move {
            if let Err(error) = fut.await {
                warn!("{} failed ({}): {}", action.label(), error.kind(), error);
                let _ = this.tx.send(StoreMessage::Failed { action, error }).await;
            }
        });
    }

    async fn commit(&self, mutation: Mutation) {
        if self.tx.send(StoreMessage::Commit(mutation)).await.is_err() {
            debug!("store channel closed, dropping mutation");
        }
    }
}
