//! Media Library view: Enter enqueues the selected item.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    text::Span,
    widgets::{List, ListItem, Paragraph},
    Frame,
};

use crate::action::{Action, ComponentId};
use crate::app_state::AppState;
use crate::bus::{EventBus, MutationKind, StoreEvent, Subscription};
use crate::component::Component;
use crate::components::playlist_entry::entry_line;
use crate::store::Dispatcher;
use crate::theme::{style_muted, style_selected, C_SECONDARY};
use crate::widgets::item_list::ItemList;
use crate::widgets::pane_chrome::{pane_chrome, Badge};
use crate::widgets::text_input::{InputOutcome, TextInput};

pub struct Library {
    list: ItemList,
    filter: TextInput,
    subscription: Option<Subscription>,
}

impl Library {
    pub fn new() -> Self {
        Self {
            list: ItemList::new(),
            filter: TextInput::new("/", "filter library…"),
            subscription: None,
        }
    }

    /// Close an open filter and clear its query. Returns true if one was open.
    pub fn cancel_input(&mut self) -> bool {
        let typing = self.filter.is_active();
        if typing {
            self.filter = TextInput::new("/", "filter library…");
            self.list.set_filter("");
        }
        typing
    }

    fn enqueue_selected(&self) -> Vec<Action> {
        match self.list.selected_item() {
            Some(item) if !item.uri.is_empty() => vec![
                Action::AddItem(item.uri.clone()),
                Action::Notify(format!("enqueued {}", item.title)),
            ],
            _ => vec![],
        }
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Library {
    fn id(&self) -> ComponentId {
        ComponentId::MainView
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }

        if self.filter.is_active() {
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
            return vec![];
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(1),
            KeyCode::PageUp => self.list.select_up(10),
            KeyCode::PageDown => self.list.select_down(10),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),
            KeyCode::Enter | KeyCode::Char('a') => return self.enqueue_selected(),
            KeyCode::Char('/') => {
                self.filter.activate();
                return vec![Action::OpenFilter];
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, _state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::ScrollUp => self.list.select_up(1),
            MouseEventKind::ScrollDown => self.list.select_down(1),
            MouseEventKind::Down(MouseButton::Left) => {
                let row = event.row.saturating_sub(area.y + 1) as usize;
                self.list.click(row);
            }
            _ => {}
        }
        vec![]
    }

    fn mount(&mut self, bus: &EventBus, _dispatcher: &Dispatcher) {
        self.subscription = Some(bus.subscribe(&[StoreEvent::Committed(MutationKind::SetPlaylist)]));
    }

    fn subscription(&mut self) -> Option<&mut Subscription> {
        self.subscription.as_mut()
    }

    fn on_event(&mut self, _event: StoreEvent, state: &AppState) -> Vec<Action> {
        self.list.set_items(&state.playlist.library);
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let badge = Badge::new(
            format!("{}/{}", self.list.len(), self.list.total_len()),
            C_SECONDARY,
        );
        let block = pane_chrome("library", focused, Some(badge));
        let mut inner = block.inner(area);
        frame.render_widget(block, area);

        if self.filter.is_active() || !self.list.filter().is_empty() {
            let bar = Rect {
                y: inner.y + inner.height.saturating_sub(1),
                height: 1,
                ..inner
            };
            self.filter.draw(frame, bar);
            inner.height = inner.height.saturating_sub(1);
        }

        if self.list.is_empty() {
            let msg = if self.list.total_len() == 0 {
                "  media library is empty"
            } else {
                "  nothing matches the filter"
            };
            frame.render_widget(Paragraph::new(Span::styled(msg, style_muted())), inner);
            return;
        }

        let height = inner.height as usize;
        self.list.ensure_visible(height);
        let selected_row = self.list.selected_row();
        let playback = state.status.playback();
        let rows: Vec<ListItem> = self
            .list
            .visible(height)
            .enumerate()
            .map(|(row, item)| {
                let line = entry_line(item, false, playback, inner.width);
                if row == selected_row {
                    ListItem::new(line).style(style_selected(focused))
                } else {
                    ListItem::new(line)
                }
            })
            .collect();
        frame.render_widget(List::new(rows), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::item;
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn cancel_closes_filter_and_shows_everything() {
        let mut state = AppState::new(80);
        state.playlist.library = vec![item(1, "Blue Train"), item(2, "Giant Steps")];
        let mut library = Library::new();
        library.on_event(StoreEvent::Committed(MutationKind::SetPlaylist), &state);

        assert_eq!(
            library.handle_key(key(KeyCode::Char('/')), &state),
            vec![Action::OpenFilter]
        );
        library.handle_key(key(KeyCode::Char('g')), &state);
        library.handle_key(key(KeyCode::Char('i')), &state);
        assert_eq!(library.list.len(), 1);

        assert!(library.cancel_input());
        assert!(!library.cancel_input());
        assert!(!library.filter.is_active());
        assert_eq!(library.list.len(), 2);
        assert_eq!(
            library.handle_key(key(KeyCode::Enter), &state),
            vec![
                Action::AddItem("file:///Giant Steps.mp4".to_string()),
                Action::Notify("enqueued Giant Steps".to_string()),
            ]
        );
    }
}
