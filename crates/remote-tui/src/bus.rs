//! Store event bus.
//!
//! Stores publish an event when an action is dispatched and when a mutation
//! is committed. Components subscribe to the kinds they care about and drain
//! their subscription right after each commit, so the state they read is the
//! state the event describes.

use tokio::sync::broadcast;
use tracing::warn;

const BUS_CAPACITY: usize = 256;

/// Actions, named by store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    // playlist
    FetchPlaylist,
    AddItem,
    RemoveItem,
    // status
    FetchStatus,
    Play,
    Pause,
    Stop,
    Next,
    Previous,
    ToggleRandom,
    ToggleRepeat,
    ToggleLoop,
    UpdateVolume,
    Seek,
    // layout
    SetLibraryView,
    SetPlayerView,
    OpenNavbar,
    CloseNavbar,
    OpenPlaylist,
    ClosePlaylist,
}

impl ActionKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::FetchPlaylist => "playlist/fetchPlaylist",
            Self::AddItem => "playlist/addItem",
            Self::RemoveItem => "playlist/removeItem",
            Self::FetchStatus => "status/fetchStatus",
            Self::Play => "status/play",
            Self::Pause => "status/pause",
            Self::Stop => "status/stop",
            Self::Next => "status/next",
            Self::Previous => "status/previous",
            Self::ToggleRandom => "status/toggleRandom",
            Self::ToggleRepeat => "status/toggleRepeat",
            Self::ToggleLoop => "status/toggleLoop",
            Self::UpdateVolume => "status/updateVolume",
            Self::Seek => "status/seek",
            Self::SetLibraryView => "layout/setLibraryView",
            Self::SetPlayerView => "layout/setPlayerView",
            Self::OpenNavbar => "layout/openNavbar",
            Self::CloseNavbar => "layout/closeNavbar",
            Self::OpenPlaylist => "layout/openPlaylist",
            Self::ClosePlaylist => "layout/closePlaylist",
        }
    }
}

/// Mutations, named by store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    SetPlaylist,
    RemoveItem,
    SetStatus,
    SetMainView,
    SetNavbar,
    SetPlaylistPanel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreEvent {
    Dispatched(ActionKind),
    Committed(MutationKind),
}

/// Publishing half; cheap to clone into action tasks.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BUS_CAPACITY);
        Self { tx }
    }

    /// Publish to every live subscription. Returns how many received it.
    pub fn publish(&self, event: StoreEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    /// Subscribe to the given event kinds only.
    pub fn subscribe(&self, kinds: &[StoreEvent]) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
            kinds: kinds.to_vec(),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Subscription {
    rx: broadcast::Receiver<StoreEvent>,
    kinds: Vec<StoreEvent>,
}

impl Subscription {
    /// Take every pending event this subscription matches, oldest first.
    pub fn drain(&mut self) -> Vec<StoreEvent> {
        let mut out = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => {
                    if self.kinds.contains(&event) {
                        out.push(event);
                    }
                }
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    warn!("store subscription lagged by {} events", n);
                }
                Err(_) => break,
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_only_sees_its_kinds() {
        let bus = EventBus::new();
        let mut status = bus.subscribe(&[StoreEvent::Committed(MutationKind::SetStatus)]);
        let mut nav = bus.subscribe(&[
            StoreEvent::Dispatched(ActionKind::OpenNavbar),
            StoreEvent::Dispatched(ActionKind::CloseNavbar),
        ]);

        bus.publish(StoreEvent::Dispatched(ActionKind::OpenNavbar));
        bus.publish(StoreEvent::Committed(MutationKind::SetNavbar));
        bus.publish(StoreEvent::Committed(MutationKind::SetStatus));
        bus.publish(StoreEvent::Dispatched(ActionKind::CloseNavbar));

        assert_eq!(
            status.drain(),
            vec![StoreEvent::Committed(MutationKind::SetStatus)]
        );
        assert_eq!(
            nav.drain(),
            vec![
                StoreEvent::Dispatched(ActionKind::OpenNavbar),
                StoreEvent::Dispatched(ActionKind::CloseNavbar),
            ]
        );
        assert!(nav.drain().is_empty());
    }

    #[test]
    fn publish_without_subscribers_is_harmless() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(StoreEvent::Committed(MutationKind::SetPlaylist)), 0);
    }
}
