//! Bottom line: link state, input mode and the keys that work right now.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_ACCENT, C_INPUT_FG, C_MUTED, C_PLAYING, C_SECONDARY, C_TOAST_ERROR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Filter,
    Prompt,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Filter => "FILTER",
            Self::Prompt => "ADD",
        }
    }

    fn keys(self) -> &'static str {
        match self {
            Self::Normal => {
                "Space play/pause  s stop  </> prev/next  +/- vol  ,/. seek  r/e/o random/repeat/loop  m menu  p playlist  1/2 views  R refresh  Tab panes  q quit"
            }
            Self::Filter => "type to filter  ↑↓ move  Enter keep  Esc clear/close",
            Self::Prompt => "media URI to enqueue  Enter add  Esc cancel",
        }
    }
}

pub fn draw_status_bar(
    frame: &mut Frame,
    area: Rect,
    mode: InputMode,
    online: bool,
    player_url: &str,
) {
    let link = if online {
        Span::styled(" ● ", Style::default().fg(C_PLAYING))
    } else {
        Span::styled(" ○ ", Style::default().fg(C_TOAST_ERROR))
    };
    let mode_color = match mode {
        InputMode::Normal => C_ACCENT,
        InputMode::Filter | InputMode::Prompt => C_INPUT_FG,
    };
    let line = Line::from(vec![
        link,
        Span::styled(
            format!("{} ", mode.label()),
            Style::default().fg(mode_color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{} ", player_url), Style::default().fg(C_SECONDARY)),
        Span::styled(mode.keys(), Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
