//! Side navigation menu.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

use crate::action::{Action, ComponentId};
use crate::app_state::AppState;
use crate::bus::{ActionKind, EventBus, StoreEvent, Subscription};
use crate::component::Component;
use crate::store::layout::MainView;
use crate::store::Dispatcher;
use crate::theme::{style_selected, C_ACCENT, C_SECONDARY};
use crate::widgets::pane_chrome::pane_chrome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Player,
    Library,
    Playlist,
}

const ENTRIES: [Entry; 3] = [Entry::Player, Entry::Library, Entry::Playlist];

impl Entry {
    fn label(self) -> &'static str {
        match self {
            Self::Player => "Player",
            Self::Library => "Library",
            Self::Playlist => "Playlist",
        }
    }

    fn action(self) -> Action {
        match self {
            Self::Player => Action::SetPlayerView,
            Self::Library => Action::SetLibraryView,
            Self::Playlist => Action::OpenPlaylist,
        }
    }

    fn is_active(self, state: &AppState) -> bool {
        match self {
            Self::Player => state.layout.main_view == MainView::Player,
            Self::Library => state.layout.main_view == MainView::Library,
            Self::Playlist => state.layout.playlist_open,
        }
    }
}

/// Width of the menu: a fifth of the screen, most of it when narrow.
pub fn width(total: u16, narrow: bool) -> u16 {
    let pct = if narrow { 60 } else { 20 };
    (total as u32 * pct / 100).max(14).min(total as u32) as u16
}

pub struct SideNav {
    selected: usize,
    subscription: Option<Subscription>,
}

impl SideNav {
    pub fn new() -> Self {
        Self {
            selected: 0,
            subscription: None,
        }
    }

    fn choose(&self, state: &AppState) -> Vec<Action> {
        let mut actions = vec![ENTRIES[self.selected].action()];
        // Narrow screens have no room to keep the menu open.
        if state.is_narrow() && ENTRIES[self.selected] != Entry::Playlist {
            actions.push(Action::CloseNavbar);
        }
        actions
    }
}

impl Default for SideNav {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for SideNav {
    fn id(&self) -> ComponentId {
        ComponentId::SideNav
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(ENTRIES.len() - 1)
            }
            KeyCode::Enter => return self.choose(state),
            KeyCode::Esc => return vec![Action::CloseNavbar],
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, state: &AppState) -> Vec<Action> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return vec![];
        }
        let row = event.row.saturating_sub(area.y + 1) as usize;
        if row < ENTRIES.len() {
            self.selected = row;
            return self.choose(state);
        }
        vec![]
    }

    fn mount(&mut self, bus: &EventBus, _dispatcher: &Dispatcher) {
        self.subscription = Some(bus.subscribe(&[
            StoreEvent::Dispatched(ActionKind::OpenNavbar),
            StoreEvent::Dispatched(ActionKind::CloseNavbar),
        ]));
    }

    fn subscription(&mut self) -> Option<&mut Subscription> {
        self.subscription.as_mut()
    }

    fn on_event(&mut self, event: StoreEvent, state: &AppState) -> Vec<Action> {
        match event {
            StoreEvent::Dispatched(ActionKind::OpenNavbar) => {
                self.selected = ENTRIES
                    .iter()
                    .position(|e| e.is_active(state))
                    .unwrap_or(0);
                vec![Action::FocusPane(ComponentId::SideNav)]
            }
            StoreEvent::Dispatched(ActionKind::CloseNavbar) => {
                vec![Action::FocusPane(ComponentId::MainView)]
            }
            _ => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let block = pane_chrome("menu", focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows: Vec<ListItem> = ENTRIES
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let (mark, style) = if entry.is_active(state) {
                    ("● ", Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD))
                } else {
                    ("  ", Style::default().fg(C_SECONDARY))
                };
                let line = Line::from(vec![
                    Span::styled(mark, Style::default().fg(C_ACCENT)),
                    Span::styled(entry.label(), style),
                ]);
                if i == self.selected {
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
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn menu_width_depends_on_narrow() {
        assert_eq!(width(200, false), 40);
        assert_eq!(width(70, true), 42);
        assert_eq!(width(40, false), 14);
    }

    #[test]
    fn choosing_library_on_narrow_closes_menu() {
        let mut nav = SideNav::new();
        let mut state = AppState::new(80);
        state.width = 60;
        nav.handle_key(key(KeyCode::Down), &state);
        assert_eq!(
            nav.handle_key(key(KeyCode::Enter), &state),
            vec![Action::SetLibraryView, Action::CloseNavbar]
        );

        state.width = 160;
        assert_eq!(
            nav.handle_key(key(KeyCode::Enter), &state),
            vec![Action::SetLibraryView]
        );
    }

    #[test]
    fn opening_highlights_active_view_and_takes_focus() {
        let mut nav = SideNav::new();
        let mut state = AppState::new(80);
        state.layout.main_view = MainView::Library;
        assert_eq!(
            nav.on_event(StoreEvent::Dispatched(ActionKind::OpenNavbar), &state),
            vec![Action::FocusPane(ComponentId::SideNav)]
        );
        assert_eq!(nav.selected, 1);
    }
}
