//! Colors and shared styles.

use ratatui::style::{Color, Modifier, Style};

pub const C_BG: Color = Color::Rgb(16, 16, 20);
/// The player's own orange.
pub const C_ACCENT: Color = Color::Rgb(255, 136, 0);
pub const C_PLAYING: Color = Color::Rgb(80, 200, 120);
pub const C_PAUSED: Color = Color::Rgb(255, 184, 80);
pub const C_MUTED: Color = Color::Rgb(72, 72, 88);
pub const C_SECONDARY: Color = Color::Rgb(120, 120, 140);
pub const C_PRIMARY: Color = Color::Rgb(215, 215, 228);
pub const C_SELECTION_BG: Color = Color::Rgb(30, 30, 42);
pub const C_PANEL_BORDER: Color = Color::Rgb(44, 44, 56);
pub const C_PANEL_BORDER_FOCUSED: Color = Color::Rgb(255, 136, 0);
pub const C_INPUT_BG: Color = Color::Rgb(22, 22, 32);
pub const C_INPUT_FG: Color = Color::Rgb(255, 200, 80);
pub const C_TOAST_INFO: Color = Color::Rgb(80, 160, 220);
pub const C_TOAST_ERROR: Color = Color::Rgb(255, 95, 95);
pub const C_FLAG_ON: Color = Color::Rgb(255, 136, 0);
pub const C_FLAG_OFF: Color = Color::Rgb(72, 72, 88);

pub fn style_muted() -> Style {
    Style::default().fg(C_MUTED)
}


pub fn style_selected(focused: bool) -> Style {
    let style = Style::default().bg(C_SELECTION_BG).fg(C_PRIMARY);
    if focused {
        style.add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

pub fn style_flag(on: bool) -> Style {
    if on {
        Style::default().fg(C_FLAG_ON).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(C_FLAG_OFF)
    }
}
