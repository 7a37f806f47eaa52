//! Playlist panel: the play queue, a buttons row and the add-URI prompt.
//!
//! Owns the playlist poller. Listens for the layout's open/close actions to
//! take or give up focus.

use std::time::Duration;

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

use crate::action::{Action, ComponentId};
use crate::app_state::AppState;
use crate::bus::{ActionKind, EventBus, MutationKind, StoreEvent, Subscription};
use crate::component::Component;
use crate::components::playlist_entry::entry_line;
use crate::poller::PollingController;
use crate::store::Dispatcher;
use crate::theme::{style_flag, style_muted, style_selected, C_PLAYING, C_SECONDARY};
use crate::widgets::item_list::ItemList;
use crate::widgets::pane_chrome::{pane_chrome, Badge};
use crate::widgets::seek_bar::format_clock;
use crate::widgets::text_input::{InputOutcome, TextInput};

pub struct PlaylistPanel {
    list: ItemList,
    filter: TextInput,
    prompt: TextInput,
    poller: PollingController,
    subscription: Option<Subscription>,
    /// Clickable spans of the buttons row: (x range, action).
    buttons: Vec<(u16, u16, Action)>,
    buttons_y: u16,
    list_area: Rect,
}

fn filter_input() -> TextInput {
    TextInput::new("/", "filter playlist…")
}

fn prompt_input() -> TextInput {
    TextInput::new("+", "file:///path/to/media or http://…")
}

impl PlaylistPanel {
    pub fn new(interval: Duration) -> Self {
        Self {
            list: ItemList::new(),
            filter: filter_input(),
            prompt: prompt_input(),
            poller: PollingController::new("playlist", interval),
            subscription: None,
            buttons: Vec::new(),
            buttons_y: 0,
            list_area: Rect::default(),
        }
    }

    /// Restart the playlist poller with an immediate fetch.
    pub fn refresh(&mut self, dispatcher: &Dispatcher) {
        let d = dispatcher.clone();
        self.poller.refresh(move || d.fetch_playlist());
    }

    /// Drop any open prompt or filter. Returns true if one was open.
    pub fn cancel_input(&mut self) -> bool {
        let typing = self.filter.is_active() || self.prompt.is_active();
        if typing {
            self.prompt = prompt_input();
            self.filter = filter_input();
            self.list.set_filter("");
        }
        typing
    }

    fn play_selected(&self) -> Vec<Action> {
        match self.list.selected_item() {
            Some(item) => vec![Action::Play(Some(item.id)), Action::SetPlayerView],
            None => vec![],
        }
    }

    fn prompt_key(&mut self, key: KeyEvent) -> Vec<Action> {
        match self.prompt.handle_key(key) {
            InputOutcome::Submitted(uri) => {
                self.prompt.clear();
                let uri = uri.trim().to_string();
                if uri.is_empty() {
                    vec![Action::CloseInput]
                } else {
                    vec![Action::CloseInput, Action::AddItem(uri)]
                }
            }
            InputOutcome::Cancelled => vec![Action::CloseInput],
            InputOutcome::Changed(_) => vec![],
        }
    }

    fn filter_key(&mut self, key: KeyEvent) -> Vec<Action> {
        match key.code {
            KeyCode::Up => self.list.select_up(1),
            KeyCode::Down => self.list.select_down(1),
            _ => match self.filter.handle_key(key) {
                InputOutcome::Changed(q) => self.list.set_filter(&q),
                InputOutcome::Submitted(_) => return vec![Action::CloseInput],
                InputOutcome::Cancelled => {
                    self.list.set_filter("");
                    return vec![Action::CloseInput];
                }
            },
        }
        vec![]
    }

    fn draw_buttons(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let labels: [(String, Style, Action); 3] = [
            (
                "▶ start".to_string(),
                Style::default().fg(C_PLAYING),
                Action::Play(state.status.current_id()),
            ),
            (
                "⤮ random".to_string(),
                style_flag(state.status.random()),
                Action::ToggleRandom,
            ),
            (
                "⟳ repeat".to_string(),
                style_flag(state.status.repeat()),
                Action::ToggleRepeat,
            ),
        ];
        self.buttons.clear();
        self.buttons_y = area.y;
        let mut spans = Vec::new();
        let mut x = area.x + 1;
        spans.push(Span::raw(" "));
        for (label, style, action) in labels {
            let w = unicode_width::UnicodeWidthStr::width(label.as_str()) as u16;
            self.buttons.push((x, x + w, action));
            spans.push(Span::styled(label, style));
            spans.push(Span::raw("   "));
            x += w + 3;
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl Component for PlaylistPanel {
    fn id(&self) -> ComponentId {
        ComponentId::PlaylistPanel
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        if self.prompt.is_active() {
            return self.prompt_key(key);
        }
        if self.filter.is_active() {
            return self.filter_key(key);
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(1),
            KeyCode::PageUp => self.list.select_up(10),
            KeyCode::PageDown => self.list.select_down(10),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),
            KeyCode::Enter => return self.play_selected(),
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(item) = self.list.selected_item() {
                    return vec![Action::RemoveItem(item.id)];
                }
            }
            KeyCode::Char('a') => {
                self.prompt.activate();
                return vec![Action::OpenPrompt];
            }
            KeyCode::Char('/') => {
                self.filter.activate();
                return vec![Action::OpenFilter];
            }
            KeyCode::Char('S') => return vec![Action::Play(state.status.current_id())],
            KeyCode::Char('c') => {
                if let Some(current) = state.current_item() {
                    self.list.select_id(current.id);
                }
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::ScrollUp => self.list.select_up(1),
            MouseEventKind::ScrollDown => self.list.select_down(1),
            MouseEventKind::Down(MouseButton::Left) => {
                if event.row == self.buttons_y {
                    return self
                        .buttons
                        .iter()
                        .find(|(from, to, _)| event.column >= *from && event.column < *to)
                        .map(|(_, _, action)| vec![action.clone()])
                        .unwrap_or_default();
                }
                let area = self.list_area;
                if event.row >= area.y && event.row < area.y + area.height {
                    let before = self.list.selected_item().map(|i| i.id);
                    if self.list.click((event.row - area.y) as usize) {
                        // Second click on the same row plays it.
                        if before == self.list.selected_item().map(|i| i.id) {
                            return self.play_selected();
                        }
                    }
                }
            }
            _ => {}
        }
        vec![]
    }

    fn mount(&mut self, bus: &EventBus, dispatcher: &Dispatcher) {
        self.subscription = Some(bus.subscribe(&[
            StoreEvent::Dispatched(ActionKind::OpenPlaylist),
            StoreEvent::Dispatched(ActionKind::ClosePlaylist),
            StoreEvent::Committed(MutationKind::SetPlaylist),
            StoreEvent::Committed(MutationKind::RemoveItem),
        ]));
        self.refresh(dispatcher);
    }

    fn subscription(&mut self) -> Option<&mut Subscription> {
        self.subscription.as_mut()
    }

    fn on_event(&mut self, event: StoreEvent, state: &AppState) -> Vec<Action> {
        match event {
            StoreEvent::Dispatched(ActionKind::OpenPlaylist) => {
                if let Some(current) = state.current_item() {
                    self.list.select_id(current.id);
                }
                vec![Action::FocusPane(ComponentId::PlaylistPanel)]
            }
            StoreEvent::Dispatched(ActionKind::ClosePlaylist) => {
                let mut actions = Vec::new();
                if self.cancel_input() {
                    actions.push(Action::CloseInput);
                }
                actions.push(Action::FocusPane(ComponentId::MainView));
                actions
            }
            _ => {
                self.list.set_items(&state.playlist.items);
                vec![]
            }
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let total = state.playlist.total_duration_secs();
        let badge = Badge::new(
            format!("{} · {}", state.playlist.items.len(), format_clock(total)),
            C_SECONDARY,
        );
        let block = pane_chrome("playlist", focused, Some(badge));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height == 0 {
            return;
        }

        self.draw_buttons(
            frame,
            Rect {
                height: 1,
                ..inner
            },
            state,
        );

        let mut list_area = Rect {
            y: inner.y + 1,
            height: inner.height.saturating_sub(1),
            ..inner
        };
        let input = if self.prompt.is_active() {
            Some(&self.prompt)
        } else if self.filter.is_active() || !self.list.filter().is_empty() {
            Some(&self.filter)
        } else {
            None
        };
        if let Some(input) = input {
            let bar = Rect {
                y: list_area.y + list_area.height.saturating_sub(1),
                height: 1,
                ..list_area
            };
            input.draw(frame, bar);
            list_area.height = list_area.height.saturating_sub(1);
        }
        self.list_area = list_area;

        if self.list.is_empty() {
            let msg = if self.list.total_len() == 0 {
                "  playlist is empty · a to add"
            } else {
                "  nothing matches the filter"
            };
            frame.render_widget(Paragraph::new(Span::styled(msg, style_muted())), list_area);
            return;
        }

        let height = list_area.height as usize;
        self.list.ensure_visible(height);
        let selected_row = self.list.selected_row();
        let playback = state.status.playback();
        let rows: Vec<ListItem> = self
            .list
            .visible(height)
            .enumerate()
            .map(|(row, item)| {
                let line = entry_line(item, state.is_current(item), playback, list_area.width);
                if row == selected_row {
                    ListItem::new(line).style(style_selected(focused))
                } else {
                    ListItem::new(line)
                }
            })
            .collect();
        frame.render_widget(List::new(rows), list_area);
    }
}
