//! One row of the playlist or library: marker, title, duration.

use remote_proto::protocol::{PlaybackState, PlaylistItem};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::theme::{C_MUTED, C_PAUSED, C_PLAYING, C_PRIMARY, C_SECONDARY};
use crate::widgets::seek_bar::format_clock;

/// Cut `text` to at most `max` columns, marking the cut with an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

fn marker(current: bool, playback: PlaybackState) -> (&'static str, Style) {
    if !current {
        return ("  ", Style::default());
    }
    match playback {
        PlaybackState::Playing => ("▶ ", Style::default().fg(C_PLAYING)),
        PlaybackState::Paused => ("⏸ ", Style::default().fg(C_PAUSED)),
        PlaybackState::Stopped => ("■ ", Style::default().fg(C_MUTED)),
    }
}

pub fn entry_line(
    item: &PlaylistItem,
    current: bool,
    playback: PlaybackState,
    width: u16,
) -> Line<'static> {
    let (mark, mark_style) = marker(current, playback);
    let duration = item
        .duration_secs
        .map(format_clock)
        .unwrap_or_else(|| "--:--".to_string());
    let title_w = (width as usize).saturating_sub(mark.width() + duration.width() + 1);
    let title = truncate(&item.title, title_w);
    let pad = title_w.saturating_sub(title.width());

    let title_style = if current {
        Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(C_SECONDARY)
    };

    Line::from(vec![
        Span::styled(mark, mark_style),
        Span::styled(title, title_style),
        Span::raw(" ".repeat(pad + 1)),
        Span::styled(duration, Style::default().fg(C_MUTED)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, duration_secs: Option<u64>) -> PlaylistItem {
        PlaylistItem {
            id: 1,
            title: title.to_string(),
            uri: String::new(),
            duration_secs,
            current: false,
        }
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn truncate_respects_wide_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefgh", 5), "abcd…");
        assert_eq!(truncate("日本語の曲", 6), "日本…");
    }

    #[test]
    fn row_fills_width_with_duration_on_the_right() {
        let line = entry_line(&item("Song", Some(185)), false, PlaybackState::Playing, 20);
        let rendered = text(&line);
        assert_eq!(rendered.width(), 20);
        assert!(rendered.starts_with("  Song"));
        assert!(rendered.ends_with("3:05"));
    }

    #[test]
    fn current_row_shows_transport_marker() {
        let line = entry_line(&item("Song", None), true, PlaybackState::Paused, 30);
        assert!(text(&line).starts_with("⏸ "));
        assert!(text(&line).ends_with("--:--"));
    }
}
