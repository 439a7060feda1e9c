//! Stats panel — counters from the last status poll.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app_state::AppState;
use crate::theme::{style_default, style_secondary};
use crate::widgets::pane_chrome::pane_chrome;

pub fn draw(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = pane_chrome("estado", None, false, None);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut rows = vec![
        stat_line("Episodios", &state.motion_count),
        stat_line("FPS", &state.fps),
        stat_line("Tiempo activo", &state.uptime),
    ];
    if state.events_enabled {
        rows.push(stat_line("Eventos", &state.total_events));
    }
    let polls = state.status_polls.to_string();
    rows.push(stat_line("Sondeos", &polls));
    frame.render_widget(Paragraph::new(rows), inner);
}

fn stat_line<'a>(label: &'a str, value: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!(" {:<15}", label), style_secondary()),
        Span::styled(value, style_default()),
    ])
}
