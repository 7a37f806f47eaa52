//! Layout store: which main view shows and which side panels are open.
//!
//! Layout actions are synchronous; each one publishes itself, then commits.

use super::{Mutation, Store};
use crate::bus::{ActionKind, MutationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MainView {
    #[default]
    Player,
    Library,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutState {
    pub main_view: MainView,
    pub navbar_open: bool,
    pub playlist_open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMutation {
    SetMainView(MainView),
    SetNavbar(bool),
    SetPlaylistPanel(bool),
}

impl LayoutMutation {
    pub fn kind(&self) -> MutationKind {
        match self {
            Self::SetMainView(_) => MutationKind::SetMainView,
            Self::SetNavbar(_) => MutationKind::SetNavbar,
            Self::SetPlaylistPanel(_) => MutationKind::SetPlaylistPanel,
        }
    }
}

pub fn reduce(state: LayoutState, mutation: LayoutMutation) -> LayoutState {
    match mutation {
        LayoutMutation::SetMainView(main_view) => LayoutState { main_view, ..state },
        LayoutMutation::SetNavbar(navbar_open) => LayoutState {
            navbar_open,
            ..state
        },
        LayoutMutation::SetPlaylistPanel(playlist_open) => LayoutState {
            playlist_open,
            ..state
        },
    }
}

impl Store {
    fn layout_action(&mut self, action: ActionKind, mutation: LayoutMutation) {
        self.announce(action);
        self.commit(Mutation::Layout(mutation));
    }

    pub fn set_library_view(&mut self) {
        self.layout_action(
            ActionKind::SetLibraryView,
            LayoutMutation::SetMainView(MainView::Library),
        );
    }

    pub fn set_player_view(&mut self) {
        self.layout_action(
            ActionKind::SetPlayerView,
            LayoutMutation::SetMainView(MainView::Player),
        );
    }

    pub fn open_navbar(&mut self) {
        self.layout_action(ActionKind::OpenNavbar, LayoutMutation::SetNavbar(true));
    }

    pub fn close_navbar(&mut self) {
        self.layout_action(ActionKind::CloseNavbar, LayoutMutation::SetNavbar(false));
    }

    pub fn open_playlist(&mut self) {
        self.layout_action(
            ActionKind::OpenPlaylist,
            LayoutMutation::SetPlaylistPanel(true),
        );
    }

    pub fn close_playlist(&mut self) {
        self.layout_action(
            ActionKind::ClosePlaylist,
            LayoutMutation::SetPlaylistPanel(false),
        );
    }

    // Screen-wide gestures. On narrow terminals the two side panels never
    // share the screen.

    pub fn open_navbar_gesture(&mut self) {
        if self.state.is_narrow() && self.state.layout.playlist_open {
            self.close_playlist();
        }
        self.open_navbar();
    }

    pub fn open_playlist_gesture(&mut self) {
        if self.state.is_narrow() && self.state.layout.navbar_open {
            self.close_navbar();
        }
        self.open_playlist();
    }

    /// A click or Esc that landed outside the playlist panel.
    pub fn outside_playlist_gesture(&mut self) {
        if self.state.is_narrow() && self.state.layout.playlist_open {
            self.close_playlist();
        }
    }
}
