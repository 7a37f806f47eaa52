pub mod item_list;
pub mod pane_chrome;
pub mod seek_bar;
pub mod status_bar;
pub mod text_input;
pub mod toast;
