//! Status store: the player's last reported transport state.

use remote_proto::protocol::{PlaybackState, SeekTarget, StatusSnapshot, MAX_VOLUME};
use remote_proto::Result;

use super::{Dispatcher, Mutation};
use crate::bus::{ActionKind, MutationKind};

/// `None` until the first status response arrives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusState {
    pub data: Option<StatusSnapshot>,
}

impl StatusState {
    pub fn is_known(&self) -> bool {
        self.data.is_some()
    }

    pub fn playback(&self) -> PlaybackState {
        self.data.as_ref().map(|s| s.state).unwrap_or_default()
    }

    pub fn current_id(&self) -> Option<i64> {
        self.data.as_ref().and_then(|s| s.current_id)
    }

    pub fn volume(&self) -> u8 {
        self.data.as_ref().map_or(0, |s| s.volume)
    }

    /// Volume as a 0-100 percentage of the full scale.
    pub fn volume_percent(&self) -> u8 {
        ((self.volume() as u32 * 100 + MAX_VOLUME as u32 / 2) / MAX_VOLUME as u32) as u8
    }

    pub fn random(&self) -> bool {
        self.data.as_ref().is_some_and(|s| s.random)
    }

    pub fn repeat(&self) -> bool {
        self.data.as_ref().is_some_and(|s| s.repeat)
    }

    pub fn loop_all(&self) -> bool {
        self.data.as_ref().is_some_and(|s| s.loop_all)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatusMutation {
    SetStatus(StatusSnapshot),
}

impl StatusMutation {
    pub fn kind(&self) -> MutationKind {
        match self {
            Self::SetStatus(_) => MutationKind::SetStatus,
        }
    }
}

pub fn reduce(_state: StatusState, mutation: StatusMutation) -> StatusState {
    match mutation {
        StatusMutation::SetStatus(snapshot) => StatusState {
            data: Some(snapshot),
        },
    }
}

impl Dispatcher {
    pub fn fetch_status(&self) {
        self.spawn(ActionKind::FetchStatus, |d| async move {
            let snapshot = d.gateway.fetch_status().await?;
            d.commit(Mutation::Status(StatusMutation::SetStatus(snapshot)))
                .await;
            Ok(())
        });
    }

    /// Play `id` (or resume when `None`), then refresh the playlist so the
    /// current marker moves.
    pub fn play(&self, id: Option<i64>) {
        self.spawn(ActionKind::Play, |d| async move {
            d.gateway.play(id).await?;
            d.fetch_playlist();
            Ok(())
        });
    }

    pub fn pause(&self) {
        self.fire(ActionKind::Pause, |d| async move { d.gateway.pause().await });
    }

    pub fn stop(&self) {
        self.fire(ActionKind::Stop, |d| async move { d.gateway.stop().await });
    }

    pub fn next(&self) {
        self.fire(ActionKind::Next, |d| async move { d.gateway.next().await });
    }

    pub fn previous(&self) {
        self.fire(ActionKind::Previous, |d| async move {
            d.gateway.previous().await
        });
    }

    pub fn toggle_random(&self) {
        self.fire(ActionKind::ToggleRandom, |d| async move {
            d.gateway.toggle_random().await
        });
    }

    pub fn toggle_repeat(&self) {
        self.fire(ActionKind::ToggleRepeat, |d| async move {
            d.gateway.toggle_repeat().await
        });
    }

    pub fn toggle_loop(&self) {
        self.fire(ActionKind::ToggleLoop, |d| async move {
            d.gateway.toggle_loop().await
        });
    }

    pub fn update_volume(&self, level: u8) {
        self.fire(ActionKind::UpdateVolume, move |d| async move {
            d.gateway.set_volume(level).await
        });
    }

    pub fn seek(&self, target: SeekTarget) {
        self.fire(ActionKind::Seek, move |d| async move {
            d.gateway.seek(target).await
        });
    }

    /// Send a command and ignore its reply; the next status poll shows the
    /// effect.
    fn fire<F, Fut>(&self, action: ActionKind, command: F)
    where
        F: FnOnce(Dispatcher) -> Fut,
        Fut: std::future::Future<Output = Result<StatusSnapshot>> + Send + 'static,
    {
        self.spawn(action, |d| {
            let fut = command(d);
            async move { fut.await.map(|_| ()) }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::{self, GatedPlayer, ScriptedPlayer};
    use crate::store::StoreMessage;
    use remote_proto::protocol::Endpoint;

    fn snapshot(state: PlaybackState) -> StatusSnapshot {
        StatusSnapshot {
            state,
            ..StatusSnapshot::default()
        }
    }

    #[test]
    fn set_status_replaces_snapshot() {
        let first = reduce(
            StatusState::default(),
            StatusMutation::SetStatus(StatusSnapshot {
                volume: 200,
                random: true,
                ..snapshot(PlaybackState::Playing)
            }),
        );
        let second = reduce(
            first,
            StatusMutation::SetStatus(snapshot(PlaybackState::Paused)),
        );
        assert_eq!(second.playback(), PlaybackState::Paused);
        assert_eq!(second.volume(), 0);
        assert!(!second.random());
    }

    #[test]
    fn getters_before_first_fetch() {
        let state = StatusState::default();
        assert!(!state.is_known());
        assert_eq!(state.playback(), PlaybackState::Stopped);
        assert_eq!(state.current_id(), None);
        assert_eq!(state.volume_percent(), 0);
    }

    #[test]
    fn volume_percent_rounds() {
        let state = StatusState {
            data: Some(StatusSnapshot {
                volume: 128,
                ..StatusSnapshot::default()
            }),
        };
        assert_eq!(state.volume_percent(), 50);
    }

    #[tokio::test]
    async fn play_chains_a_playlist_fetch() {
        let player = ScriptedPlayer::new()
            .status_body(r#"{"state":"playing"}"#)
            .playlist_body("[]");
        let (dispatcher, mut rx) = player.dispatcher();

        dispatcher.play(Some(3));

        let Some(StoreMessage::Commit(m)) = rx.recv().await else {
            panic!("expected a commit");
        };
        assert_eq!(m.kind(), MutationKind::SetPlaylist);
        let requests = player.requests();
        assert_eq!(
            requests[0].1,
            vec![("command", "pl_play".to_string()), ("id", "3".to_string())]
        );
        assert_eq!(requests[1].0, Endpoint::Playlist);
    }

    #[tokio::test]
    async fn fire_and_forget_commands_commit_nothing() {
        let player = ScriptedPlayer::new().status_body(r#"{"state":"paused"}"#);
        let (dispatcher, mut rx) = player.dispatcher();

        dispatcher.pause();
        dispatcher.toggle_random();
        dispatcher.update_volume(128);
        drop(dispatcher);

        assert!(rx.recv().await.is_none());
        let names: Vec<String> = player
            .requests()
            .into_iter()
            .map(|(_, q)| q[0].1.clone())
            .collect();
        assert_eq!(names.len(), 3);
        assert!(names.contains(&"pl_pause".to_string()));
        assert!(names.contains(&"pl_random".to_string()));
        assert!(names.contains(&"volume".to_string()));
    }

    #[tokio::test]
    async fn overlapping_fetches_last_resolved_wins() {
        let player = GatedPlayer::new();
        let (dispatcher, mut rx) = player.dispatcher();
        let mut store = testing::store();

        dispatcher.fetch_status(); // A
        dispatcher.fetch_status(); // B
        player.wait_for(2).await;

        // B answers first.
        player.release(1, r#"{"state":"playing"}"#);
        let Some(StoreMessage::Commit(b)) = rx.recv().await else {
            panic!("expected B");
        };
        store.commit(b);
        assert_eq!(store.state().status.playback(), PlaybackState::Playing);

        // A answers later and overwrites B.
        player.release(0, r#"{"state":"paused"}"#);
        let Some(StoreMessage::Commit(a)) = rx.recv().await else {
            panic!("expected A");
        };
        store.commit(a);
        assert_eq!(store.state().status.playback(), PlaybackState::Paused);
    }
}
