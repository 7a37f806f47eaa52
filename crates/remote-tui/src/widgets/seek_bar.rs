//! Smooth Unicode seek bar with elapsed and total time labels.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_MUTED, C_SECONDARY};

const EIGHTHS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

/// `progress` in 0.0..=1.0 drawn across `width` cells.
pub fn bar(progress: f64, width: usize) -> String {
    let eighths = (progress.clamp(0.0, 1.0) * width as f64 * 8.0) as usize;
    let full = eighths / 8;
    let mut out = "█".repeat(full);
    if full < width {
        out.push(EIGHTHS[eighths % 8]);
        out.push_str(&" ".repeat(width - full - 1));
    }
    out
}

/// `h:mm:ss` above an hour, else `m:ss`.
pub fn format_clock(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

/// Returns the cells the bar itself occupies, for click mapping.
pub fn draw_seek_bar(
    frame: &mut Frame,
    area: Rect,
    elapsed_secs: f64,
    length_secs: u64,
    color: Color,
) -> Rect {
    if area.width < 8 || area.height == 0 {
        return Rect::default();
    }
    let left = format_clock(elapsed_secs.max(0.0) as u64);
    let right = if length_secs > 0 {
        format_clock(length_secs)
    } else {
        "--:--".to_string()
    };
    let bar_w = (area.width as usize).saturating_sub(left.len() + right.len() + 2);
    let progress = if length_secs > 0 {
        elapsed_secs / length_secs as f64
    } else {
        0.0
    };
    let line = Line::from(vec![
        Span::styled(format!("{} ", left), Style::default().fg(C_SECONDARY)),
        Span::styled(bar(progress, bar_w), Style::default().fg(color)),
        Span::styled(format!(" {}", right), Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
    Rect {
        x: area.x + left.len() as u16 + 1,
        y: area.y,
        width: bar_w as u16,
        height: 1,
    }
}
