//! EventList component — recent system events from the backend log.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::{AppState, EventNode, ListNode},
    component::Component,
    theme::{style_default, style_muted, C_ACCENT, C_CONNECTING, C_SECONDARY, C_TAG},
    widgets::pane_chrome::pane_chrome,
};

pub struct EventList {
    pub scroll: usize,
}

impl EventList {
    pub fn new() -> Self {
        Self { scroll: 0 }
    }
}

fn severity_color(severity: &str) -> Color {
    match severity {
        "error" | "critical" => C_ACCENT,
        "warning" => C_CONNECTING,
        _ => C_SECONDARY,
    }
}

impl Component for EventList {
    fn id(&self) -> ComponentId {
        ComponentId::EventList
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll += 1,
            KeyCode::Home | KeyCode::Char('g') => self.scroll = 0,
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::Refresh = action {
            self.scroll = 0;
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let block = pane_chrome("eventos", Some('2'), focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines: Vec<Line> = state.events.iter().map(node_line).collect();
        let max_scroll = lines.len().saturating_sub(inner.height as usize);
        self.scroll = self.scroll.min(max_scroll);
        frame.render_widget(
            Paragraph::new(lines).scroll((self.scroll as u16, 0)),
            inner,
        );
    }
}

fn node_line(node: &ListNode<EventNode>) -> Line<'_> {
    match node {
        ListNode::Placeholder(text) => Line::from(Span::styled(format!(" {}", text), style_muted())),
        ListNode::Item(ev) => Line::from(vec![
            Span::styled(format!(" {} ", ev.timestamp), style_muted()),
            Span::styled(
                format!("{:<8}", ev.severity),
                Style::default().fg(severity_color(&ev.severity)),
            ),
            Span::styled(format!("{} ", ev.event_type), Style::default().fg(C_TAG)),
            Span::styled(ev.message.as_str(), style_default()),
        ]),
    }
}
