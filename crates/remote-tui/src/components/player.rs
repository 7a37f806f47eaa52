//! Player surface: now playing, seek bar, volume and mode flags.
//!
//! Owns the status poller and the only playback widget. Every committed
//! status goes through the reconciler, which moves the widget only when
//! the reported state actually changed.

use std::time::Duration;

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use remote_proto::config::UiConfig;
use remote_proto::protocol::{PlaybackState, SeekTarget, MAX_VOLUME};
use tracing::debug;

use crate::action::{Action, ComponentId};
use crate::app_state::AppState;
use crate::bus::{EventBus, MutationKind, StoreEvent, Subscription};
use crate::component::Component;
use crate::playback::{PositionClock, Reconciler};
use crate::poller::PollingController;
use crate::store::Dispatcher;
use crate::theme::{style_flag, style_muted, C_ACCENT, C_MUTED, C_PAUSED, C_PLAYING, C_PRIMARY, C_SECONDARY};
use crate::widgets::pane_chrome::{pane_chrome, Badge};
use crate::widgets::seek_bar::{bar, draw_seek_bar};

const VOLUME_BAR_W: usize = 20;

pub struct PlayerSurface {
    poller: PollingController,
    reconciler: Reconciler<PositionClock>,
    subscription: Option<Subscription>,
    volume_step: u8,
    seek_step_secs: i64,
    seek_area: Rect,
    volume_area: Rect,
}

fn state_color(state: PlaybackState) -> ratatui::style::Color {
    match state {
        PlaybackState::Playing => C_PLAYING,
        PlaybackState::Paused => C_PAUSED,
        PlaybackState::Stopped => C_MUTED,
    }
}

impl PlayerSurface {
    pub fn new(interval: Duration, ui: &UiConfig) -> Self {
        Self {
            poller: PollingController::new("status", interval),
            reconciler: Reconciler::new(PositionClock::new()),
            subscription: None,
            volume_step: ui.volume_step.max(1),
            seek_step_secs: ui.seek_step_secs.max(1),
            seek_area: Rect::default(),
            volume_area: Rect::default(),
        }
    }

    /// Restart the status poller with an immediate fetch.
    pub fn refresh(&mut self, dispatcher: &Dispatcher) {
        let d = dispatcher.clone();
        self.poller.refresh(move || d.fetch_status());
    }

    pub fn clock(&self) -> &PositionClock {
        self.reconciler.widget()
    }

    /// Transport keys. These work from any pane, so the App asks here first.
    pub fn transport_key(&self, key: KeyEvent, state: &AppState) -> Option<Action> {
        let status = &state.status;
        let action = match key.code {
            KeyCode::Char(' ') => {
                if status.playback() == PlaybackState::Playing {
                    Action::Pause
                } else {
                    Action::Play(status.current_id())
                }
            }
            KeyCode::Char('s') => Action::Stop,
            KeyCode::Char('>') => Action::Next,
            KeyCode::Char('<') => Action::Previous,
            KeyCode::Char('+') | KeyCode::Char('=') => {
                Action::SetVolume(status.volume().saturating_add(self.volume_step).min(MAX_VOLUME))
            }
            KeyCode::Char('-') => Action::SetVolume(status.volume().saturating_sub(self.volume_step)),
            KeyCode::Char('.') => Action::Seek(SeekTarget::By(self.seek_step_secs)),
            KeyCode::Char(',') => Action::Seek(SeekTarget::By(-self.seek_step_secs)),
            KeyCode::Char('r') => Action::ToggleRandom,
            KeyCode::Char('e') => Action::ToggleRepeat,
            KeyCode::Char('o') => Action::ToggleLoop,
            _ => return None,
        };
        Some(action)
    }

    fn now_playing(state: &AppState) -> (String, String) {
        let item = state.current_item();
        let title = state
            .status
            .data
            .as_ref()
            .and_then(|s| s.title.clone())
            .or_else(|| item.map(|i| i.title.clone()))
            .unwrap_or_else(|| "nothing playing".to_string());
        let uri = item.map(|i| i.uri.clone()).unwrap_or_default();
        (title, uri)
    }
}

/// Column of `x` within `area` as a fraction, or `None` outside it.
fn fraction_at(area: Rect, x: u16, y: u16) -> Option<f64> {
    if area.width == 0 || y != area.y || x < area.x || x >= area.x + area.width {
        return None;
    }
    Some((x - area.x) as f64 / area.width.saturating_sub(1).max(1) as f64)
}

impl Component for PlayerSurface {
    fn id(&self) -> ComponentId {
        ComponentId::MainView
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Left => vec![Action::Seek(SeekTarget::By(-self.seek_step_secs))],
            KeyCode::Right => vec![Action::Seek(SeekTarget::By(self.seek_step_secs))],
            KeyCode::Home => vec![Action::Seek(SeekTarget::To(0))],
            _ => self.transport_key(key, state).into_iter().collect(),
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return vec![];
        }
        if let Some(f) = fraction_at(self.seek_area, event.column, event.row) {
            return vec![Action::Seek(SeekTarget::Percent((f * 100.0).round() as u8))];
        }
        if let Some(f) = fraction_at(self.volume_area, event.column, event.row) {
            return vec![Action::SetVolume((f * MAX_VOLUME as f64).round() as u8)];
        }
        vec![]
    }

    fn mount(&mut self, bus: &EventBus, dispatcher: &Dispatcher) {
        self.subscription = Some(bus.subscribe(&[StoreEvent::Committed(MutationKind::SetStatus)]));
        self.refresh(dispatcher);
    }

    fn subscription(&mut self) -> Option<&mut Subscription> {
        self.subscription.as_mut()
    }

    fn on_event(&mut self, _event: StoreEvent, state: &AppState) -> Vec<Action> {
        if let Some(status) = &state.status.data {
            self.reconciler.widget_mut().sync(status);
            let before = self.reconciler.previous();
            if let Some(t) = self.reconciler.handle_state(status.state) {
                debug!("playback widget {:?}: {:?} -> {}", t, before, status.state.label());
            }
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let playback = state.status.playback();
        let badge = state
            .status
            .is_known()
            .then(|| Badge::new(playback.label(), state_color(playback)));
        let block = pane_chrome("player", focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if !state.status.is_known() {
            frame.render_widget(
                Paragraph::new(Span::styled("  waiting for player status…", style_muted())),
                inner,
            );
            self.seek_area = Rect::default();
            self.volume_area = Rect::default();
            return;
        }

        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .horizontal_margin(2)
        .split(inner);

        let (title, uri) = Self::now_playing(state);
        frame.render_widget(
            Paragraph::new(Span::styled(
                title,
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            )),
            rows[1],
        );
        frame.render_widget(
            Paragraph::new(Span::styled(uri, Style::default().fg(C_SECONDARY))),
            rows[2],
        );

        let (elapsed, length) = {
            let clock = self.clock();
            (clock.elapsed_secs(), clock.length_secs())
        };
        self.seek_area = draw_seek_bar(frame, rows[4], elapsed, length, state_color(playback));

        let volume = state.status.volume();
        let fill = volume as f64 / MAX_VOLUME as f64;
        let vol_line = Line::from(vec![
            Span::styled("vol ", Style::default().fg(C_SECONDARY)),
            Span::styled(bar(fill, VOLUME_BAR_W), Style::default().fg(C_ACCENT)),
            Span::styled(
                format!(" {:>3}%", state.status.volume_percent()),
                Style::default().fg(C_SECONDARY),
            ),
        ]);
        frame.render_widget(Paragraph::new(vol_line), rows[6]);
        self.volume_area = Rect {
            x: rows[6].x + 4,
            width: (VOLUME_BAR_W as u16).min(rows[6].width.saturating_sub(4)),
            ..rows[6]
        };

        let flags = Line::from(vec![
            Span::styled("random", style_flag(state.status.random())),
            Span::raw("  "),
            Span::styled("repeat", style_flag(state.status.repeat())),
            Span::raw("  "),
            Span::styled("loop", style_flag(state.status.loop_all())),
        ]);
        if rows[7].height > 1 {
            let flags_area = Rect {
                y: rows[7].y + 1,
                height: 1,
                ..rows[7]
            };
            frame.render_widget(Paragraph::new(flags), flags_area);
        }
    }
}
