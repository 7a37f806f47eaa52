//! AppState: the store slices plus the few bits of terminal context that
//! components need while drawing.
//!
//! Components only ever see `&AppState`. The slices change through
//! `Store::commit`; `width` is kept current by the App on resize.

use remote_proto::protocol::PlaylistItem;

use crate::store::layout::LayoutState;
use crate::store::playlist::PlaylistState;
use crate::store::status::StatusState;

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub playlist: PlaylistState,
    pub status: StatusState,
    pub layout: LayoutState,
    /// Terminal width in columns.
    pub width: u16,
    /// Widths at or below this count as narrow.
    pub narrow_width: u16,
    /// Whether the last status fetch succeeded.
    pub online: bool,
}

impl AppState {
    pub fn new(narrow_width: u16) -> Self {
        Self {
            narrow_width,
            width: u16::MAX,
            ..Self::default()
        }
    }

    pub fn is_narrow(&self) -> bool {
        self.width <= self.narrow_width
    }

    pub fn current_item(&self) -> Option<&PlaylistItem> {
        self.playlist.current(self.status.current_id())
    }

    pub fn is_current(&self, item: &PlaylistItem) -> bool {
        match self.status.current_id() {
            Some(id) => item.id == id,
            None => item.current,
        }
    }
}
