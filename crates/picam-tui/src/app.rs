//! App — component-based event loop for the dashboard.
//!
//! Architecture:
//! - `App` owns the components, the `Controller`, and `AppState`.
//! - A `tokio::mpsc` channel carries `AppMessage` events in from the input
//!   thread, the polling loops, and the stream monitor.
//! - The event loop draws a frame, then awaits the next message and drains
//!   whatever else is queued.
//! - Components return `Vec<Action>`; App dispatches each Action.

use std::io;
use std::time::Duration;

use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::Block,
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use picam_proto::client::{ApiClient, ApiError};
use picam_proto::config::Config;
use picam_proto::protocol::{ConfigAck, Episode, StatusSnapshot, SystemEvent};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::{
        config_form::ConfigForm, episode_list::EpisodeList, event_list::EventList, header,
        log_panel::LogPanel, stats_panel, stream_panel,
    },
    controller::Controller,
    focus::FocusRing,
    stream::{StreamEvent, StreamEventKind},
    theme::C_BG,
    widgets::{
        notice::draw_notice,
        status_bar::{self, InputMode},
    },
};

// ── Internal event bus ────────────────────────────────────────────────────────

pub enum AppMessage {
    Event(Event),
    Status(Result<StatusSnapshot, ApiError>),
    Episodes(Result<Vec<Episode>, ApiError>),
    Events(Result<Vec<SystemEvent>, ApiError>),
    ConfigSubmitted(Result<ConfigAck, ApiError>),
    Stream(StreamEvent),
    /// The reconnect delay after a stream error has elapsed.
    StreamReconnect,
}

const INPUT_POLL: Duration = Duration::from_millis(200);
const MAX_DRAIN: usize = 256;
const LOG_PANEL_HEIGHT: u16 = 10;

pub struct App {
    state: AppState,
    controller: Controller,
    rx: mpsc::Receiver<AppMessage>,
    tx: mpsc::Sender<AppMessage>,
    focus: FocusRing,
    episode_list: EpisodeList,
    event_list: EventList,
    config_form: ConfigForm,
    log_panel: LogPanel,
    should_quit: bool,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let (tx, rx) = mpsc::channel::<AppMessage>(1024);
        let api = ApiClient::new(config.server.base_url.clone());
        let base_url = api.base_url().to_string();
        let controller = Controller::new(api, config, tx.clone());

        let mut state = AppState::new(base_url, controller.stream_url().to_string());
        state.events_enabled = config.polling.events_enabled;

        let focus = FocusRing::new(focus_items(state.events_enabled, false));
        Self {
            state,
            controller,
            rx,
            tx,
            focus,
            episode_list: EpisodeList::new(),
            event_list: EventList::new(),
            config_form: ConfigForm::new(),
            log_panel: LogPanel::new(),
            should_quit: false,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let result = self.event_loop(&mut terminal).await;

        // ── Teardown ──────────────────────────────────────────────────────────
        self.controller.shutdown();
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        info!("picam stopped");
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        // ── Background task: keyboard events ──────────────────────────────────
        let event_tx = self.tx.clone();
        tokio::task::spawn_blocking(move || loop {
            if event_tx.is_closed() {
                break;
            }
            match event::poll(INPUT_POLL) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                },
                Ok(false) => {}
                Err(_) => break,
            }
        });

        self.state.push_log(format!("conectando a {}", self.state.base_url));
        self.controller.initialize();

        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            if self.should_quit {
                break;
            }

            let Some(msg) = self.rx.recv().await else {
                break;
            };
            let mut redraw = self.handle_message(msg);
            let mut drained = 0usize;
            while drained < MAX_DRAIN {
                let Ok(next) = self.rx.try_recv() else {
                    break;
                };
                drained += 1;
                redraw |= self.handle_message(next);
            }
            needs_redraw = redraw;
        }
        Ok(())
    }

    // ── Messages ──────────────────────────────────────────────────────────────

    /// Apply one message.  Returns whether the screen needs a redraw.
    fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(Event::Key(key)) => {
                for action in self.handle_key(key) {
                    self.dispatch(action);
                }
                true
            }
            AppMessage::Event(Event::Resize(..)) => true,
            AppMessage::Event(_) => false,
            AppMessage::Status(result) => {
                self.state.apply_status(result);
                true
            }
            AppMessage::Episodes(result) => {
                self.state.apply_episodes(result);
                true
            }
            AppMessage::Events(result) => {
                self.state.apply_events(result);
                true
            }
            AppMessage::ConfigSubmitted(result) => {
                self.state.apply_config_result(result);
                true
            }
            AppMessage::Stream(ev) => self.on_stream_event(ev),
            AppMessage::StreamReconnect => {
                let url = self.controller.reconnect_stream();
                self.state.push_log(format!("reconnecting stream: {}", url));
                self.state.stream_source_changed(url, true);
                true
            }
        }
    }

    fn on_stream_event(&mut self, ev: StreamEvent) -> bool {
        if ev.source != self.controller.stream_source() {
            debug!("dropping event from stale stream source {}", ev.source);
            return false;
        }
        self.state.apply_stream_event(&ev.kind);
        match ev.kind {
            StreamEventKind::Loaded => self.controller.handle_stream_load(),
            StreamEventKind::Error(_) => self.controller.handle_stream_error(),
            StreamEventKind::Progress { .. } => {}
        }
        true
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    fn input_mode(&self) -> InputMode {
        if self.state.notice.is_some() {
            InputMode::Notice
        } else if self.focus.is_focused(ComponentId::ConfigForm) {
            InputMode::Form
        } else {
            InputMode::Normal
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return vec![Action::Quit];
        }

        // An open notice swallows everything until dismissed.
        if self.state.notice.is_some() {
            return match key.code {
                KeyCode::Enter | KeyCode::Esc => vec![Action::DismissNotice],
                _ => vec![],
            };
        }

        match key.code {
            KeyCode::Tab => return vec![Action::FocusNext],
            KeyCode::BackTab => return vec![Action::FocusPrev],
            _ => {}
        }

        if self.input_mode() == InputMode::Normal {
            match key.code {
                KeyCode::Char('q') => return vec![Action::Quit],
                KeyCode::Char('c') => return vec![Action::FocusPane(ComponentId::ConfigForm)],
                KeyCode::Char('r') => return vec![Action::Refresh],
                KeyCode::Char('L') => return vec![Action::ToggleLogs],
                KeyCode::Char('1') => return vec![Action::FocusPane(ComponentId::EpisodeList)],
                KeyCode::Char('2') if self.state.events_enabled => {
                    return vec![Action::FocusPane(ComponentId::EventList)]
                }
                _ => {}
            }
        }

        let state = &self.state;
        match self.focus.current() {
            Some(ComponentId::EpisodeList) => self.episode_list.handle_key(key, state),
            Some(ComponentId::EventList) => self.event_list.handle_key(key, state),
            Some(ComponentId::ConfigForm) => self.config_form.handle_key(key, state),
            Some(ComponentId::LogPanel) => self.log_panel.handle_key(key, state),
            None => vec![],
        }
    }

    // ── Actions ───────────────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.episode_list.on_action(&action, s));
            out.extend(self.event_list.on_action(&action, s));
            out.extend(self.config_form.on_action(&action, s));
            out.extend(self.log_panel.on_action(&action, s));
            out
        };

        self.apply_action(action);

        for a in secondary {
            self.apply_action(a);
        }
    }

    fn apply_action(&mut self, action: Action) {
        debug!("apply_action: {:?}", action);
        match action {
            Action::FocusNext => {
                self.focus.next();
            }
            Action::FocusPrev => {
                self.focus.prev();
            }
            Action::FocusPane(id) => self.focus.set(id),
            Action::SubmitConfig(update) => {
                self.state.push_log(format!(
                    "config -> motion_threshold={} min_area={}",
                    update.motion_threshold, update.min_area
                ));
                self.controller.submit_config(update);
            }
            Action::ConfigRejected(reason) => self.state.reject_config(&reason),
            Action::Refresh => {
                self.state.push_log("manual refresh");
                self.controller.refresh_all();
            }
            Action::ToggleLogs => {
                let items = focus_items(self.state.events_enabled, self.log_panel.expanded);
                self.focus.set_items(items);
            }
            Action::DismissNotice => {
                self.state.dismiss_notice();
            }
            Action::Quit => {
                info!("quit requested");
                self.should_quit = true;
            }
        }
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);

        let log_h = if self.log_panel.expanded { LOG_PANEL_HEIGHT } else { 1 };
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(7),
                Constraint::Min(4),
                Constraint::Length(6),
                Constraint::Length(log_h),
                Constraint::Length(1),
            ])
            .split(area);

        header::draw(frame, outer[0], &self.state);
        status_bar::draw_separator(frame, outer[1]);

        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(outer[2]);
        stream_panel::draw(frame, top[0], &self.state);
        stats_panel::draw(frame, top[1], &self.state);

        let state = &self.state;
        if state.events_enabled {
            let lists = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
                .split(outer[3]);
            self.episode_list.draw(
                frame,
                lists[0],
                self.focus.is_focused(ComponentId::EpisodeList),
                state,
            );
            self.event_list.draw(
                frame,
                lists[1],
                self.focus.is_focused(ComponentId::EventList),
                state,
            );
        } else {
            self.episode_list.draw(
                frame,
                outer[3],
                self.focus.is_focused(ComponentId::EpisodeList),
                state,
            );
        }

        self.config_form.draw(
            frame,
            outer[4],
            self.focus.is_focused(ComponentId::ConfigForm),
            state,
        );
        self.log_panel.draw(
            frame,
            outer[5],
            self.focus.is_focused(ComponentId::LogPanel),
            state,
        );
        status_bar::draw_keys_bar(frame, outer[6], self.input_mode());

        if let Some(notice) = &self.state.notice {
            draw_notice(frame, area, notice);
        }
    }
}

fn focus_items(events_enabled: bool, show_logs: bool) -> Vec<ComponentId> {
    let mut items = vec![ComponentId::EpisodeList];
    if events_enabled {
        items.push(ComponentId::EventList);
    }
    items.push(ComponentId::ConfigForm);
    if show_logs {
        items.push(ComponentId::LogPanel);
    }
    items
}
