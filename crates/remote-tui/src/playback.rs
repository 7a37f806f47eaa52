//! Keeping the on-screen playback widget in step with polled status.
//!
//! The player reports state every poll, whether or not it changed. The
//! reconciler remembers the last state it acted on and drives the widget
//! only on a change, with exactly one transition per change.

use std::time::Instant;

use remote_proto::protocol::{PlaybackState, StatusSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Resume,
    Pause,
    Stop,
}

impl From<PlaybackState> for Transition {
    fn from(state: PlaybackState) -> Self {
        match state {
            PlaybackState::Playing => Self::Resume,
            PlaybackState::Paused => Self::Pause,
            PlaybackState::Stopped => Self::Stop,
        }
    }
}

/// Imperative surface of a local playback widget.
pub trait PlaybackWidget {
    fn resume(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);

    fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::Resume => self.resume(),
            Transition::Pause => self.pause(),
            Transition::Stop => self.stop(),
        }
    }
}

/// Sole owner of the widget; nothing else may drive it.
pub struct Reconciler<W> {
    widget: W,
    previous: Option<PlaybackState>,
}

impl<W: PlaybackWidget> Reconciler<W> {
    pub fn new(widget: W) -> Self {
        Self {
            widget,
            previous: None,
        }
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    pub fn previous(&self) -> Option<PlaybackState> {
        self.previous
    }

    /// Returns the transition applied, if any.
    pub fn handle_state(&mut self, state: PlaybackState) -> Option<Transition> {
        if self.previous == Some(state) {
            return None;
        }
        self.previous = Some(state);
        let transition = Transition::from(state);
        self.widget.apply(transition);
        Some(transition)
    }
}

/// Elapsed-time display that runs on its own between polls.
#[derive(Debug, Clone, Default)]
pub struct PositionClock {
    base_secs: f64,
    /// Set while running: when `base_secs` was taken.
    running_since: Option<Instant>,
    length_secs: u64,
}

impl PositionClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-anchor to a fresh status report without changing run state.
    pub fn sync(&mut self, status: &StatusSnapshot) {
        self.sync_at(status, Instant::now());
    }

    fn sync_at(&mut self, status: &StatusSnapshot, now: Instant) {
        self.base_secs = status.time_secs as f64;
        self.length_secs = status.length_secs;
        if self.running_since.is_some() {
            self.running_since = Some(now);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    pub fn length_secs(&self) -> u64 {
        self.length_secs
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_at(Instant::now())
    }

    fn elapsed_at(&self, now: Instant) -> f64 {
        let mut secs = self.base_secs;
        if let Some(since) = self.running_since {
            secs += now.saturating_duration_since(since).as_secs_f64();
        }
        if self.length_secs > 0 {
            secs = secs.min(self.length_secs as f64);
        }
        secs
    }
}

impl PlaybackWidget for PositionClock {
    fn resume(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        self.base_secs = self.elapsed_secs();
        self.running_since = None;
    }

    fn stop(&mut self) {
        self.base_secs = 0.0;
        self.running_since = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Default)]
    struct Recorder(Vec<Transition>);

    impl PlaybackWidget for Recorder {
        fn resume(&mut self) {
            self.0.push(Transition::Resume);
        }
        fn pause(&mut self) {
            self.0.push(Transition::Pause);
        }
        fn stop(&mut self) {
            self.0.push(Transition::Stop);
        }
    }

    #[test]
    fn repeated_state_is_ignored() {
        let mut r = Reconciler::new(Recorder::default());
        assert_eq!(r.handle_state(PlaybackState::Playing), Some(Transition::Resume));
        assert_eq!(r.handle_state(PlaybackState::Playing), None);
        assert_eq!(r.handle_state(PlaybackState::Playing), None);
        assert_eq!(r.widget().0, vec![Transition::Resume]);
    }

    #[test]
    fn each_change_makes_one_transition() {
        let mut r = Reconciler::new(Recorder::default());
        for state in [
            PlaybackState::Playing,
            PlaybackState::Paused,
            PlaybackState::Paused,
            PlaybackState::Stopped,
            PlaybackState::Playing,
        ] {
            r.handle_state(state);
        }
        assert_eq!(
            r.widget().0,
            vec![
                Transition::Resume,
                Transition::Pause,
                Transition::Stop,
                Transition::Resume,
            ]
        );
        assert_eq!(r.previous(), Some(PlaybackState::Playing));
    }

    #[test]
    fn first_report_always_applies() {
        let mut r = Reconciler::new(Recorder::default());
        assert_eq!(r.handle_state(PlaybackState::Stopped), Some(Transition::Stop));
    }

    #[test]
    fn clock_advances_only_while_running() {
        let start = Instant::now();
        let status = StatusSnapshot {
            time_secs: 10,
            length_secs: 100,
            ..StatusSnapshot::default()
        };
        let mut clock = PositionClock::new();
        clock.sync_at(&status, start);
        assert_eq!(clock.elapsed_at(start + Duration::from_secs(5)), 10.0);

        clock.running_since = Some(start);
        assert_eq!(clock.elapsed_at(start + Duration::from_secs(5)), 15.0);
        // Never past the end.
        assert_eq!(clock.elapsed_at(start + Duration::from_secs(500)), 100.0);
    }

    #[test]
    fn sync_reanchors_a_running_clock() {
        let start = Instant::now();
        let mut clock = PositionClock {
            running_since: Some(start),
            ..PositionClock::default()
        };
        let later = start + Duration::from_secs(3);
        clock.sync_at(
            &StatusSnapshot {
                time_secs: 42,
                ..StatusSnapshot::default()
            },
            later,
        );
        assert!(clock.is_running());
        assert_eq!(clock.elapsed_at(later + Duration::from_secs(1)), 43.0);
    }

    #[test]
    fn stop_resets_and_pause_freezes() {
        let mut clock = PositionClock::new();
        clock.sync(&StatusSnapshot {
            time_secs: 30,
            ..StatusSnapshot::default()
        });
        clock.resume();
        clock.pause();
        assert!(!clock.is_running());
        assert!(clock.elapsed_secs() >= 30.0);
        clock.stop();
        assert_eq!(clock.elapsed_secs(), 0.0);
    }
}
