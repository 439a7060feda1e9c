//! Stream panel — health of the video feed connection.
//!
//! A terminal cannot show the MJPEG frames, so the panel reports what the
//! monitor sees: source URL, phase, throughput, and reconnect count.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::app_state::{AppState, StreamPhase};
use crate::theme::{style_default, style_muted, style_secondary, C_ACTIVE, C_CONNECTING, C_ERROR};
use crate::widgets::pane_chrome::{pane_chrome, Badge};

pub fn draw(frame: &mut Frame, area: Rect, state: &AppState) {
    let stream = &state.stream;
    let badge = match stream.phase {
        StreamPhase::Connecting => Badge {
            text: "CONECTANDO",
            color: C_CONNECTING,
        },
        StreamPhase::Connected => Badge {
            text: "EN VIVO",
            color: C_ACTIVE,
        },
        StreamPhase::Reconnecting => Badge {
            text: "RECONECTANDO",
            color: C_ERROR,
        },
    };
    let block = pane_chrome("video", None, false, Some(badge));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rate = stream
        .frame_rate
        .map(|r| format!("{:.1} fps", r))
        .unwrap_or_else(|| "-".to_string());
    let mut lines = vec![
        Line::from(vec![
            Span::styled(" fuente   ", style_secondary()),
            Span::styled(stream.source.as_str(), style_muted()),
        ]),
        Line::from(vec![
            Span::styled(" frames   ", style_secondary()),
            Span::styled(
                format!("{}  ({})  {}", stream.frames, human_bytes(stream.bytes), rate),
                style_default(),
            ),
        ]),
        Line::from(vec![
            Span::styled(" reconex. ", style_secondary()),
            Span::styled(stream.reconnects.to_string(), style_default()),
        ]),
    ];
    if let Some(err) = &stream.last_error {
        lines.push(Line::from(vec![
            Span::styled(" error    ", style_secondary()),
            Span::styled(err.as_str(), Style::default().fg(C_ERROR)),
        ]));
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn human_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let b = bytes as f64;
    if b >= KIB * KIB {
        format!("{:.1} MiB", b / (KIB * KIB))
    } else if b >= KIB {
        format!("{:.1} KiB", b / KIB)
    } else {
        format!("{} B", bytes)
    }
}
