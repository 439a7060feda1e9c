//! Bordered pane shared by every dashboard region: focus styling, a
//! shortcut hint in the title and an optional badge on the right.

use crate::theme::{
    style_focused_border, style_unfocused_border, C_MUTED, C_NUMBER_HINT, C_PRIMARY,
};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
};

/// A badge shown in the top-right of the pane header (e.g. "LIVE", "ERR").
pub struct Badge<'a> {
    pub text: &'a str,
    pub color: Color,
}

/// Renders a bordered pane with consistent focus styling and optional badge.
///
/// `hint_key` is the single-key shortcut that focuses the pane, shown as
/// `[c] title`.
pub fn pane_chrome<'a>(
    title: &'a str,
    hint_key: Option<char>,
    focused: bool,
    badge: Option<Badge<'a>>,
) -> Block<'a> {
    let border_style = if focused {
        style_focused_border()
    } else {
        style_unfocused_border()
    };

    let title_style = if focused {
        Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(C_MUTED)
    };

    let mut title_spans = Vec::new();
    if let Some(key) = hint_key {
        title_spans.push(Span::styled(
            format!("[{}] ", key),
            Style::default().fg(C_NUMBER_HINT),
        ));
    }
    title_spans.push(Span::styled(title, title_style));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Line::from(title_spans));

    match badge {
        Some(b) => block.title_top(
            Line::from(Span::styled(
                format!(" {} ", b.text),
                Style::default().fg(b.color).add_modifier(Modifier::BOLD),
            ))
            .right_aligned(),
        ),
        None => block,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

    fn top_row(block: Block<'_>, width: u16) -> String {
        let area = Rect::new(0, 0, width, 3);
        let mut buf = Buffer::empty(area);
        block.render(area, &mut buf);
        (0..width).map(|x| buf[(x, 0)].symbol().to_string()).collect()
    }

    #[test]
    fn test_title_carries_hint_key() {
        let row = top_row(pane_chrome("Estado", Some('s'), true, None), 30);
        assert!(row.contains("[s] Estado"), "{row:?}");
        assert!(row.starts_with('┌'));
        assert!(row.ends_with('┐'));
    }

    #[test]
    fn test_badge_is_right_aligned() {
        let badge = Badge { text: "ERR", color: C_PRIMARY };
        let row = top_row(pane_chrome("Video", None, false, Some(badge)), 30);
        assert!(row.contains("Video"));
        assert!(!row.contains('['));
        assert!(row.trim_end_matches('┐').ends_with(" ERR "), "{row:?}");
    }
}
