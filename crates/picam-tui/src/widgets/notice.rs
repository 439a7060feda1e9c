//! Notice — centered modal for messages the user must acknowledge.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app_state::{Notice, Severity};
use crate::theme::{C_MUTED, C_NOTICE_ERROR, C_NOTICE_SUCCESS, C_PRIMARY};

pub fn draw_notice(frame: &mut Frame, area: Rect, notice: &Notice) {
    let (color, icon, title) = match notice.severity {
        Severity::Success => (C_NOTICE_SUCCESS, "✓", " aviso "),
        Severity::Error => (C_NOTICE_ERROR, "✗", " error "),
    };

    let popup = centered_rect(56, 7, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(Span::styled(
            title,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!(" {} ", icon),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(notice.message.as_str(), Style::default().fg(C_PRIMARY)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            " enter / esc  aceptar",
            Style::default().fg(C_MUTED),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        popup,
    );
}

/// A `width` x `height` rectangle centered in `area`, clamped to it.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(h) / 2),
            Constraint::Length(h),
            Constraint::Min(0),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(area.width.saturating_sub(w) / 2),
            Constraint::Length(w),
            Constraint::Min(0),
        ])
        .split(vertical[1]);
    horizontal[1]
}
