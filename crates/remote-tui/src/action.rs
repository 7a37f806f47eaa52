//! Action enum: everything a component can ask the App to do.

use remote_proto::protocol::SeekTarget;

/// Focusable panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    SideNav,
    MainView,
    PlaylistPanel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Status store ─────────────────────────────────────────────────────────
    Play(Option<i64>),
    Pause,
    Stop,
    Next,
    Previous,
    ToggleRandom,
    ToggleRepeat,
    ToggleLoop,
    SetVolume(u8),
    Seek(SeekTarget),

    // ── Playlist store ───────────────────────────────────────────────────────
    AddItem(String),
    RemoveItem(i64),

    // ── Layout store ─────────────────────────────────────────────────────────
    SetPlayerView,
    SetLibraryView,
    ToggleNavbar,
    TogglePlaylist,
    OpenPlaylist,
    CloseNavbar,
    /// Esc or a click outside the playlist panel.
    DismissPlaylist,

    // ── Navigation ───────────────────────────────────────────────────────────
    FocusNext,
    FocusPrev,
    FocusPane(ComponentId),

    // ── Text entry ───────────────────────────────────────────────────────────
    OpenFilter,
    OpenPrompt,
    CloseInput,

    // ── System ───────────────────────────────────────────────────────────────
    /// Restart both pollers with an immediate fetch.
    Refresh,
    Notify(String),
    Quit,
    Resize(u16, u16),
}
