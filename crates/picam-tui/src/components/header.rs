//! Header — one-row top bar: title, camera dot, motion indicator, backend.
//!
//! Not focusable.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app_state::{AppState, DotClass, MotionClass};
use crate::theme::{
    style_muted, style_title, C_ACCENT, C_ACTIVE, C_CONNECTING, C_ERROR, C_SECONDARY,
};

pub fn draw(frame: &mut Frame, area: Rect, state: &AppState) {
    if area.height == 0 {
        return;
    }
    let dot_color = match state.camera.dot {
        DotClass::Pending => C_CONNECTING,
        DotClass::Active => C_ACTIVE,
        DotClass::Error => C_ERROR,
    };
    let motion_style = match state.motion.class {
        MotionClass::Detected => Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
        MotionClass::Calm => Style::default().fg(C_ACTIVE),
    };

    let line = Line::from(vec![
        Span::styled(" picam ", style_title()),
        Span::styled("│ ", style_muted()),
        Span::styled("● ", Style::default().fg(dot_color)),
        Span::styled(state.camera.text.as_str(), Style::default().fg(C_SECONDARY)),
        Span::styled("  │ ", style_muted()),
        Span::styled(state.motion.text.as_str(), motion_style),
        Span::styled("  │ ", style_muted()),
        Span::styled(state.base_url.as_str(), style_muted()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
