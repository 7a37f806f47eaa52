pub mod library;
pub mod main_view;
pub mod player;
pub mod playlist_entry;
pub mod playlist_panel;
pub mod sidenav;
