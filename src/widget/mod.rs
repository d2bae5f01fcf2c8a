pub mod header;
pub mod help_popup;
pub mod welcome;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cut `text` to at most `max_width` display columns, marking the cut with `…`.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// A rect of fixed width centered horizontally, `percent_y` tall.
pub fn content_sized_rect(width: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    let available_width = r.width;
    let width = width.min(available_width);
    let margin = (available_width.saturating_sub(width)) / 2;

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(margin),
            Constraint::Length(width),
            Constraint::Length(margin),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate_to_width("Results", 10), "Results");
        assert_eq!(truncate_to_width("Results", 7), "Results");
    }

    #[test]
    fn test_truncate_marks_cut() {
        assert_eq!(truncate_to_width("Analysis Framework", 8), "Analysi…");
        assert_eq!(truncate_to_width("Analysis", 0), "");
        assert_eq!(truncate_to_width("Analysis", 1), "…");
    }

    #[test]
    fn test_content_sized_rect_is_centered() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = content_sized_rect(40, 50, area);
        assert_eq!(rect.width, 40);
        assert_eq!(rect.x, 30);
    }
}
