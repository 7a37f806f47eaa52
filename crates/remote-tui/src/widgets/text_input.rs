//! One-line text entry on top of tui-input, used for the list filter and
//! for the add-URI prompt.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::theme::{C_INPUT_BG, C_INPUT_FG, C_MUTED};

#[derive(Debug, PartialEq, Eq)]
pub enum InputOutcome {
    Changed(String),
    Submitted(String),
    Cancelled,
}

pub struct TextInput {
    input: Input,
    prefix: &'static str,
    placeholder: &'static str,
    active: bool,
}

impl TextInput {
    pub fn new(prefix: &'static str, placeholder: &'static str) -> Self {
        Self {
            input: Input::default(),
            prefix,
            placeholder,
            active: false,
        }
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn clear(&mut self) {
        self.input = Input::default();
    }

    /// Enter submits and closes. Esc on text clears it; Esc on an empty
    /// input closes.
    pub fn handle_key(&mut self, key: KeyEvent) -> InputOutcome {
        match key.code {
            KeyCode::Enter => {
                self.active = false;
                InputOutcome::Submitted(self.input.value().to_string())
            }
            KeyCode::Esc if !self.input.value().is_empty() => {
                self.input = Input::default();
                InputOutcome::Changed(String::new())
            }
            KeyCode::Esc => {
                self.active = false;
                InputOutcome::Cancelled
            }
            _ => {
                self.input.handle_event(&Event::Key(key));
                InputOutcome::Changed(self.input.value().to_string())
            }
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let prefix_w = self.prefix.len() as u16 + 1;
        let scroll = self
            .input
            .visual_scroll(area.width.saturating_sub(prefix_w + 1) as usize);
        let value = self.input.value();
        let span = if value.is_empty() {
            Span::styled(
                format!("{} {}", self.prefix, self.placeholder),
                Style::default().fg(C_MUTED),
            )
        } else {
            let shown: String = value.chars().skip(scroll).collect();
            Span::styled(
                format!("{} {}", self.prefix, shown),
                Style::default().fg(C_INPUT_FG),
            )
        };
        frame.render_widget(
            Paragraph::new(Line::from(span)).style(Style::default().bg(C_INPUT_BG)),
            area,
        );

        if self.active && area.width > 0 {
            let x = area.x + prefix_w + (self.input.visual_cursor() - scroll) as u16;
            frame.set_cursor_position((x.min(area.x + area.width - 1), area.y));
        }
    }
}
