//! FieldInput — a labelled single-line text field backed by tui-input.

use ratatui::crossterm::event::{Event, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::theme::{style_input, C_MUTED, C_SECONDARY};

pub struct FieldInput {
    input: Input,
    label: String,
}

impl FieldInput {
    pub fn new(label: impl Into<String>, initial: &str) -> Self {
        Self {
            input: Input::new(initial.to_string()),
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn text(&self) -> &str {
        self.input.value()
    }

    pub fn set_value(&mut self, value: &str) {
        self.input = Input::new(value.to_string());
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.input.handle_event(&Event::Key(key));
    }

    /// Render `label: value` into one row; the cursor is placed when `active`.
    pub fn draw(&self, frame: &mut Frame, area: Rect, active: bool) {
        if area.height == 0 {
            return;
        }
        let label = format!(" {:<18}", format!("{}:", self.label));
        let label_w = label.chars().count() as u16;
        let field_w = area.width.saturating_sub(label_w + 1) as usize;
        let scroll = self.input.visual_scroll(field_w);
        let value = self.input.value();
        let shown: String = value.chars().skip(scroll).take(field_w).collect();

        let label_style = if active {
            Style::default().fg(C_SECONDARY)
        } else {
            Style::default().fg(C_MUTED)
        };
        let value_style = if active {
            style_input()
        } else {
            Style::default().fg(C_SECONDARY)
        };
        let padded = format!("{:<width$}", shown, width = field_w);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(label, label_style),
                Span::styled(padded, value_style),
            ])),
            area,
        );

        if active {
            let cursor = (self.input.visual_cursor().saturating_sub(scroll)) as u16;
            let x = (area.x + label_w + cursor).min(area.x + area.width.saturating_sub(1));
            frame.set_cursor_position((x, area.y));
        }
    }
}
