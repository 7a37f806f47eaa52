//! Playlist store: the play queue and the media library.

use remote_proto::protocol::{PlaylistItem, PlaylistSnapshot};

use super::{Dispatcher, Mutation};
use crate::bus::{ActionKind, MutationKind};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaylistState {
    pub items: Vec<PlaylistItem>,
    pub library: Vec<PlaylistItem>,
}

impl PlaylistState {
    pub fn find(&self, id: i64) -> Option<&PlaylistItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// The item the player is on: by id when known, else the one flagged
    /// current in the last playlist snapshot.
    pub fn current(&self, current_id: Option<i64>) -> Option<&PlaylistItem> {
        current_id
            .and_then(|id| self.find(id))
            .or_else(|| self.items.iter().find(|item| item.current))
    }

    /// Sum of known item durations, in seconds.
    pub fn total_duration_secs(&self) -> u64 {
        self.items.iter().filter_map(|item| item.duration_secs).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlaylistMutation {
    SetPlaylist(PlaylistSnapshot),
    RemoveItem(i64),
}

impl PlaylistMutation {
    pub fn kind(&self) -> MutationKind {
        match self {
            Self::SetPlaylist(_) => MutationKind::SetPlaylist,
            Self::RemoveItem(_) => MutationKind::RemoveItem,
        }
    }
}

pub fn reduce(state: PlaylistState, mutation: PlaylistMutation) -> PlaylistState {
    match mutation {
        PlaylistMutation::SetPlaylist(snapshot) => PlaylistState {
            items: snapshot.items,
            library: snapshot.library,
        },
        PlaylistMutation::RemoveItem(id) => PlaylistState {
            items: state.items.into_iter().filter(|item| item.id != id).collect(),
            library: state.library,
        },
    }
}

impl Dispatcher {
    pub fn fetch_playlist(&self) {
        self.spawn(ActionKind::FetchPlaylist, |d| async move {
            let snapshot = d.gateway.fetch_playlist().await?;
            d.commit(Mutation::Playlist(PlaylistMutation::SetPlaylist(snapshot)))
                .await;
            Ok(())
        });
    }

    /// Enqueue `uri`. The list only changes once the follow-up fetch lands.
    pub fn add_item(&self, uri: String) {
        self.spawn(ActionKind::AddItem, |d| async move {
            d.gateway.add_item(&uri).await?;
            d.fetch_playlist();
            Ok(())
        });
    }

    /// Delete `id` on the player, then drop it locally without re-fetching.
    pub fn remove_item(&self, id: i64) {
        self.spawn(ActionKind::RemoveItem, |d| async move {
            d.gateway.remove_item(id).await?;
            d.commit(Mutation::Playlist(PlaylistMutation::RemoveItem(id)))
                .await;
            Ok(())
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::{item, ScriptedPlayer};
    use crate::store::StoreMessage;
    use remote_proto::protocol::Endpoint;

    #[test]
    fn set_playlist_replaces_everything() {
        let old = PlaylistState {
            items: vec![item(1, "a"), item(2, "b")],
            library: vec![item(9, "lib")],
        };
        let next = reduce(
            old,
            PlaylistMutation::SetPlaylist(PlaylistSnapshot {
                items: vec![item(3, "c")],
                library: Vec::new(),
            }),
        );
        assert_eq!(next.items, vec![item(3, "c")]);
        assert!(next.library.is_empty());
    }

    #[test]
    fn remove_item_drops_every_match_and_nothing_else() {
        let old = PlaylistState {
            items: vec![item(1, "a"), item(2, "b"), item(1, "a again"), item(3, "c")],
            library: vec![item(1, "lib")],
        };
        let next = reduce(old, PlaylistMutation::RemoveItem(1));
        assert_eq!(next.items, vec![item(2, "b"), item(3, "c")]);
        assert_eq!(next.library, vec![item(1, "lib")]);
    }

    #[test]
    fn remove_unknown_id_is_a_no_op() {
        let old = PlaylistState {
            items: vec![item(2, "b")],
            library: Vec::new(),
        };
        let next = reduce(old.clone(), PlaylistMutation::RemoveItem(7));
        assert_eq!(next, old);
    }

    #[test]
    fn current_prefers_status_id_over_flag() {
        let mut flagged = item(1, "a");
        flagged.current = true;
        let state = PlaylistState {
            items: vec![flagged, item(2, "b")],
            library: Vec::new(),
        };
        assert_eq!(state.current(Some(2)).map(|i| i.id), Some(2));
        assert_eq!(state.current(None).map(|i| i.id), Some(1));
        assert_eq!(state.current(Some(42)).map(|i| i.id), Some(1));
    }

    #[tokio::test]
    async fn add_item_only_changes_state_through_the_fetch() {
        let player = ScriptedPlayer::new()
            .status_body("{}")
            .playlist_body(r#"[{"id":1}]"#);
        let (dispatcher, mut rx) = player.dispatcher();

        dispatcher.add_item("file:///a.mp4".to_string());

        let msg = rx.recv().await.unwrap();
        let StoreMessage::Commit(mutation) = msg else {
            panic!("unexpected {:?}", msg);
        };
        assert_eq!(mutation.kind(), MutationKind::SetPlaylist);

        let requests = player.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].0, Endpoint::Status);
        assert_eq!(
            requests[0].1,
            vec![
                ("command", "in_enqueue".to_string()),
                ("input", "file:///a.mp4".to_string()),
            ]
        );
        assert_eq!(requests[1], (Endpoint::Playlist, Vec::new()));

        let mut store = crate::store::testing::store();
        store.commit(mutation);
        let items = &store.state().playlist.items;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 1);
    }

    #[tokio::test]
    async fn remove_item_commits_without_refetch() {
        let player = ScriptedPlayer::new().status_body("{}");
        let (dispatcher, mut rx) = player.dispatcher();

        dispatcher.remove_item(4);

        match rx.recv().await.unwrap() {
            StoreMessage::Commit(m) => {
                assert_eq!(m, Mutation::Playlist(PlaylistMutation::RemoveItem(4)))
            }
            other => panic!("unexpected {:?}", other),
        }
        let requests = player.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].1,
            vec![
                ("command", "pl_delete".to_string()),
                ("id", "4".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn failed_delete_reports_and_leaves_state_alone() {
        let player = ScriptedPlayer::new().status_body("not json");
        let (dispatcher, mut rx) = player.dispatcher();

        dispatcher.remove_item(4);

        match rx.recv().await.unwrap() {
            StoreMessage::Failed { action, error } => {
                assert_eq!(action, ActionKind::RemoveItem);
                assert_eq!(error.kind(), "parse");
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
