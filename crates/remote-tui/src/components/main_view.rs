//! Main area: the player surface or the library, per the layout store.

use std::time::Duration;

use ratatui::crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{layout::Rect, Frame};
use remote_proto::config::UiConfig;

use crate::action::{Action, ComponentId};
use crate::app_state::AppState;
use crate::component::Component;
use crate::components::library::Library;
use crate::components::player::PlayerSurface;
use crate::store::layout::MainView as View;

pub struct MainView {
    pub player: PlayerSurface,
    pub library: Library,
}

impl MainView {
    pub fn new(status_interval: Duration, ui: &UiConfig) -> Self {
        Self {
            player: PlayerSurface::new(status_interval, ui),
            library: Library::new(),
        }
    }

    fn active(&mut self, state: &AppState) -> &mut dyn Component {
        match state.layout.main_view {
            View::Player => &mut self.player,
            View::Library => &mut self.library,
        }
    }
}

impl Component for MainView {
    fn id(&self) -> ComponentId {
        ComponentId::MainView
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        self.active(state).handle_key(key, state)
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, state: &AppState) -> Vec<Action> {
        self.active(state).handle_mouse(event, area, state)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        self.active(state).draw(frame, area, focused, state);
    }
}
