//! Transient notifications in the top-right corner.
//!
//! A poll that keeps failing reports the same error every second, so a
//! repeated message bumps a counter on the existing toast instead of
//! stacking copies.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::theme::{C_TOAST_ERROR, C_TOAST_INFO};

const MAX_VISIBLE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

#[derive(Debug)]
struct Toast {
    message: String,
    severity: Severity,
    repeats: u32,
    expires: Instant,
}

impl Toast {
    fn text(&self) -> String {
        let icon = match self.severity {
            Severity::Info => "·",
            Severity::Error => "✗",
        };
        if self.repeats > 1 {
            format!(" {} {} (x{}) ", icon, self.message, self.repeats)
        } else {
            format!(" {} {} ", icon, self.message)
        }
    }
}

#[derive(Debug, Default)]
pub struct ToastManager {
    toasts: VecDeque<Toast>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>, severity: Severity, ttl: Duration) {
        let message = message.into();
        let expires = Instant::now() + ttl;
        if let Some(existing) = self.toasts.iter_mut().find(|t| t.message == message) {
            existing.repeats += 1;
            existing.expires = expires;
            return;
        }
        self.toasts.push_back(Toast {
            message,
            severity,
            repeats: 1,
            expires,
        });
        while self.toasts.len() > MAX_VISIBLE {
            self.toasts.pop_front();
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Info, Duration::from_secs(3));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Error, Duration::from_secs(5));
    }

    /// Drop expired toasts. Returns true if any went away.
    pub fn tick(&mut self) -> bool {
        let before = self.toasts.len();
        let now = Instant::now();
        self.toasts.retain(|t| t.expires > now);
        self.toasts.len() != before
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let max_width = (area.width / 2).clamp(30, 70).min(area.width);
        let mut y = area.y + 1;
        for toast in self.toasts.iter().rev() {
            if y >= area.y + area.height {
                break;
            }
            let text = toast.text();
            let width = (text.width() as u16).min(max_width);
            let rect = Rect {
                x: area.x + area.width.saturating_sub(width + 1),
                y,
                width,
                height: 1,
            };
            let color = match toast.severity {
                Severity::Info => C_TOAST_INFO,
                Severity::Error => C_TOAST_ERROR,
            };
            frame.render_widget(Clear, rect);
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    text,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ))),
                rect,
            );
            y += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_message_counts_instead_of_stacking() {
        let mut toasts = ToastManager::new();
        toasts.error("status/fetchStatus failed");
        toasts.error("status/fetchStatus failed");
        toasts.error("status/fetchStatus failed");
        assert_eq!(toasts.len(), 1);
        assert!(toasts.toasts[0].text().contains("(x3)"));
    }

    #[test]
    fn oldest_falls_off() {
        let mut toasts = ToastManager::new();
        for i in 0..6 {
            toasts.info(format!("m{}", i));
        }
        assert_eq!(toasts.len(), MAX_VISIBLE);
        assert_eq!(toasts.toasts[0].message, "m2");
    }

    #[test]
    fn expired_toasts_go_away() {
        let mut toasts = ToastManager::new();
        toasts.push("gone", Severity::Info, Duration::ZERO);
        assert!(toasts.tick());
        assert!(toasts.is_empty());
    }
}
