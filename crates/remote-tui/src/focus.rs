//! Keyboard focus across the panes the layout currently shows.

use crate::action::ComponentId;
use crate::store::layout::LayoutState;

/// Panes on screen for `layout`, left to right.
pub fn visible_panes(layout: &LayoutState) -> Vec<ComponentId> {
    let mut panes = Vec::with_capacity(3);
    if layout.navbar_open {
        panes.push(ComponentId::SideNav);
    }
    panes.push(ComponentId::MainView);
    if layout.playlist_open {
        panes.push(ComponentId::PlaylistPanel);
    }
    panes
}

#[derive(Debug, Clone, Copy)]
pub struct Focus {
    current: ComponentId,
}

impl Focus {
    pub fn new() -> Self {
        Self {
            current: ComponentId::MainView,
        }
    }

    pub fn current(&self) -> ComponentId {
        self.current
    }

    pub fn is_focused(&self, id: ComponentId) -> bool {
        self.current == id
    }

    pub fn set(&mut self, id: ComponentId, layout: &LayoutState) {
        if visible_panes(layout).contains(&id) {
            self.current = id;
        }
    }

    pub fn next(&mut self, layout: &LayoutState) {
        self.step(layout, 1);
    }

    pub fn prev(&mut self, layout: &LayoutState) {
        self.step(layout, -1);
    }

    fn step(&mut self, layout: &LayoutState, delta: isize) {
        let panes = visible_panes(layout);
        let pos = panes.iter().position(|&p| p == self.current).unwrap_or(0) as isize;
        let len = panes.len() as isize;
        self.current = panes[(pos + delta).rem_euclid(len) as usize];
    }

    /// After a layout change: a pane that closed hands focus to the main view.
    pub fn revalidate(&mut self, layout: &LayoutState) {
        if !visible_panes(layout).contains(&self.current) {
            self.current = ComponentId::MainView;
        }
    }
}

impl Default for Focus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(navbar_open: bool, playlist_open: bool) -> LayoutState {
        LayoutState {
            navbar_open,
            playlist_open,
            ..LayoutState::default()
        }
    }

    #[test]
    fn cycles_through_open_panes_only() {
        let mut focus = Focus::new();
        let l = layout(false, true);
        focus.next(&l);
        assert_eq!(focus.current(), ComponentId::PlaylistPanel);
        focus.next(&l);
        assert_eq!(focus.current(), ComponentId::MainView);
        focus.prev(&l);
        assert_eq!(focus.current(), ComponentId::PlaylistPanel);
    }

    #[test]
    fn closed_pane_cannot_take_focus() {
        let mut focus = Focus::new();
        focus.set(ComponentId::SideNav, &layout(false, false));
        assert_eq!(focus.current(), ComponentId::MainView);
    }

    #[test]
    fn closing_focused_pane_falls_back_to_main() {
        let mut focus = Focus::new();
        focus.set(ComponentId::SideNav, &layout(true, false));
        assert!(focus.is_focused(ComponentId::SideNav));
        focus.revalidate(&layout(false, false));
        assert_eq!(focus.current(), ComponentId::MainView);
    }
}
