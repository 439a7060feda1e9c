//! EpisodeList component — most recent motion episodes, newest first.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::{AppState, EpisodeNode, ListNode},
    component::Component,
    theme::{style_muted, style_secondary, style_title, C_CONNECTING, C_TAG},
    widgets::pane_chrome::{pane_chrome, Badge},
};

pub struct EpisodeList {
    /// First rendered line.
    pub scroll: usize,
}

impl EpisodeList {
    pub fn new() -> Self {
        Self { scroll: 0 }
    }
}

impl Component for EpisodeList {
    fn id(&self) -> ComponentId {
        ComponentId::EpisodeList
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
        let shown = state.episodes.iter().filter(|n| !n.is_placeholder()).count();
        let count = shown.to_string();
        let badge = (shown > 0).then(|| Badge {
            text: count.as_str(),
            color: C_TAG,
        });
        let block = pane_chrome("episodios", Some('1'), focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines: Vec<Line> = state.episodes.iter().flat_map(node_lines).collect();
        let max_scroll = lines.len().saturating_sub(inner.height as usize);
        self.scroll = self.scroll.min(max_scroll);
        frame.render_widget(
            Paragraph::new(lines).scroll((self.scroll as u16, 0)),
            inner,
        );
    }
}

fn node_lines(node: &ListNode<EpisodeNode>) -> Vec<Line<'_>> {
    match node {
        ListNode::Placeholder(text) => vec![Line::from(Span::styled(
            format!(" {}", text),
            style_muted(),
        ))],
        ListNode::Item(ep) => {
            let mut title = vec![Span::styled(format!(" {}", ep.title), style_title())];
            if ep.in_progress {
                title.push(Span::styled(
                    "  ●",
                    Style::default().fg(C_CONNECTING).add_modifier(Modifier::BOLD),
                ));
            }
            let mut lines = vec![
                Line::from(title),
                Line::from(Span::styled(format!("   {}", ep.start), style_secondary())),
                Line::from(Span::styled(format!("   {}", ep.duration), style_secondary())),
            ];
            if let Some(objects) = &ep.objects {
                lines.push(Line::from(Span::styled(
                    format!("   {}", objects),
                    Style::default().fg(C_TAG),
                )));
            }
            lines.push(Line::from(""));
            lines
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    #[test]
    fn test_scroll_and_refresh_reset() {
        let state = AppState::new("http://cam", "http://cam/video_feed");
        let mut list = EpisodeList::new();
        list.handle_key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE), &state);
        list.handle_key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE), &state);
        assert_eq!(list.scroll, 2);
        list.handle_key(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE), &state);
        assert_eq!(list.scroll, 1);
        list.on_action(&Action::Refresh, &state);
        assert_eq!(list.scroll, 0);
    }

    #[test]
    fn test_placeholder_is_single_line() {
        let node: ListNode<EpisodeNode> = ListNode::Placeholder("No hay episodios aún".into());
        assert_eq!(node_lines(&node).len(), 1);
    }
}
