//! Status bar — bottom line with input mode and keybindings.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_MODE_FORM, C_MODE_NORMAL, C_MODE_NOTICE, C_MUTED, C_SEPARATOR};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    /// Typing into the config form.
    Form,
    /// A notice is open and swallows input.
    Notice,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Form => "CONFIG",
            Self::Notice => "NOTICE",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Form => C_MODE_FORM,
            Self::Notice => C_MODE_NOTICE,
        }
    }

    fn keys(self) -> &'static str {
        match self {
            Self::Normal => {
                " Tab/Shift-Tab panes  ↑↓/jk scroll  c config  r refresh  L logs  q quit"
            }
            Self::Form => " type value  ↑↓ field  Enter submit  Esc leave form  Tab next pane",
            Self::Notice => " Enter/Esc dismiss",
        }
    }
}

/// Draw a horizontal separator line.
pub fn draw_separator(frame: &mut Frame, area: Rect) {
    let line = Line::from(Span::styled(
        "─".repeat(area.width as usize),
        Style::default().fg(C_SEPARATOR),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", mode.label()),
            Style::default()
                .fg(mode.color())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(mode.keys(), Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
