//! ConfigForm component — motion threshold and minimum area editor.
//!
//! Field text is only parsed on submit.  Threshold and area must be integers;
//! the background rate is optional (blank leaves it out of the request) and
//! must be a finite number otherwise.  Bad text is rejected here and never
//! reaches the backend.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use picam_proto::protocol::ConfigUpdate;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::style_muted,
    widgets::{field_input::FieldInput, pane_chrome::pane_chrome},
};

pub const DEFAULT_THRESHOLD: &str = "30";
pub const DEFAULT_MIN_AREA: &str = "500";

pub struct ConfigForm {
    fields: [FieldInput; 3],
    active: usize,
}

impl ConfigForm {
    pub fn new() -> Self {
        Self {
            fields: [
                FieldInput::new("Umbral movimiento", DEFAULT_THRESHOLD),
                FieldInput::new("Área mínima", DEFAULT_MIN_AREA),
                FieldInput::new("Tasa fondo", ""),
            ],
            active: 0,
        }
    }

    pub fn threshold(&self) -> &str {
        self.fields[0].text()
    }

    pub fn min_area(&self) -> &str {
        self.fields[1].text()
    }

    pub fn background_rate(&self) -> &str {
        self.fields[2].text()
    }

    pub fn set_values(&mut self, threshold: &str, min_area: &str, background_rate: &str) {
        self.fields[0].set_value(threshold);
        self.fields[1].set_value(min_area);
        self.fields[2].set_value(background_rate);
    }

    /// Build the request from the current field text.
    pub fn build_update(&self) -> Result<ConfigUpdate, String> {
        let threshold = parse_integer(&self.fields[0])?;
        let min_area = parse_integer(&self.fields[1])?;
        Ok(ConfigUpdate {
            background_update_rate: parse_optional_rate(&self.fields[2])?,
            ..ConfigUpdate::new(threshold, min_area)
        })
    }
}

fn parse_integer(field: &FieldInput) -> Result<i64, String> {
    let text = field.text().trim();
    text.parse::<i64>()
        .map_err(|_| format!("{} no es un número entero: {:?}", field.label(), text))
}

fn parse_optional_rate(field: &FieldInput) -> Result<Option<f64>, String> {
    let text = field.text().trim();
    if text.is_empty() {
        return Ok(None);
    }
    match text.parse::<f64>() {
        Ok(rate) if rate.is_finite() => Ok(Some(rate)),
        _ => Err(format!("{} no es un número: {:?}", field.label(), text)),
    }
}

impl Component for ConfigForm {
    fn id(&self) -> ComponentId {
        ComponentId::ConfigForm
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Enter => match self.build_update() {
                Ok(update) => vec![Action::SubmitConfig(update)],
                Err(reason) => vec![Action::ConfigRejected(reason)],
            },
            KeyCode::Esc => vec![Action::FocusPane(ComponentId::EpisodeList)],
            KeyCode::Up => {
                self.active = self.active.saturating_sub(1);
                vec![]
            }
            KeyCode::Down => {
                self.active = (self.active + 1).min(self.fields.len() - 1);
                vec![]
            }
            _ => {
                self.fields[self.active].handle_key(key);
                vec![]
            }
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, _state: &AppState) {
        let block = pane_chrome("configuración", Some('c'), focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        for (i, field) in self.fields.iter().enumerate() {
            field.draw(frame, rows[i], focused && i == self.active);
        }
        if focused {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    " enter aplicar  ↑↓ campo  esc salir",
                    style_muted(),
                ))),
                rows[3],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn state() -> AppState {
        AppState::new("http://cam", "http://cam/video_feed")
    }

    #[test]
    fn test_defaults_submit() {
        let mut form = ConfigForm::new();
        let actions = form.handle_key(key(KeyCode::Enter), &state());
        assert_eq!(actions, vec![Action::SubmitConfig(ConfigUpdate::new(30, 500))]);
    }

    #[test]
    fn test_typing_edits_active_field() {
        let s = state();
        let mut form = ConfigForm::new();
        form.handle_key(key(KeyCode::Backspace), &s);
        form.handle_key(key(KeyCode::Backspace), &s);
        form.handle_key(key(KeyCode::Char('5')), &s);
        form.handle_key(key(KeyCode::Char('0')), &s);
        form.handle_key(key(KeyCode::Down), &s);
        form.handle_key(key(KeyCode::Char('0')), &s);
        assert_eq!(form.threshold(), "50");
        assert_eq!(form.min_area(), "5000");
        assert_eq!(
            form.handle_key(key(KeyCode::Enter), &s),
            vec![Action::SubmitConfig(ConfigUpdate::new(50, 5000))]
        );
    }

    #[test]
    fn test_non_integer_rejected_locally() {
        let mut form = ConfigForm::new();
        form.set_values("abc", "500", "");
        let actions = form.handle_key(key(KeyCode::Enter), &state());
        assert_eq!(actions.len(), 1);
        assert!(matches!(actions[0], Action::ConfigRejected(_)));

        form.set_values("40", "", "");
        assert!(form.build_update().is_err());

        form.set_values(" 40 ", "-1", "");
        assert_eq!(form.build_update(), Ok(ConfigUpdate::new(40, -1)));
    }

    #[test]
    fn test_background_rate_optional() {
        let s = state();
        let mut form = ConfigForm::new();
        assert_eq!(form.background_rate(), "");
        assert_eq!(form.build_update().unwrap().background_update_rate, None);

        form.handle_key(key(KeyCode::Down), &s);
        form.handle_key(key(KeyCode::Down), &s);
        for c in "0.05".chars() {
            form.handle_key(key(KeyCode::Char(c)), &s);
        }
        let update = form.build_update().unwrap();
        assert_eq!(update.background_update_rate, Some(0.05));
        assert_eq!(
            serde_json::to_string(&update).unwrap(),
            r#"{"motion_threshold":30,"min_area":500,"background_update_rate":0.05}"#
        );
    }

    #[test]
    fn test_bad_background_rate_rejected() {
        let s = state();
        let mut form = ConfigForm::new();
        for bad in ["rápido", "inf", "NaN"] {
            form.set_values("30", "500", bad);
            let actions = form.handle_key(key(KeyCode::Enter), &s);
            assert!(
                matches!(actions.as_slice(), [Action::ConfigRejected(_)]),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_esc_leaves_form() {
        let mut form = ConfigForm::new();
        assert_eq!(
            form.handle_key(key(KeyCode::Esc), &state()),
            vec![Action::FocusPane(ComponentId::EpisodeList)]
        );
    }
}
