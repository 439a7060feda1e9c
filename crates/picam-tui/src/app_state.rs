//! AppState — the dashboard's display regions.
//!
//! Every region holds the text and visual class the front end draws.  Poll
//! results are applied here and nowhere else; a failed poll degrades its own
//! region and is logged, never propagated.
//!
//! Components read this; only the App event-loop writes to it.

use std::collections::VecDeque;
use std::time::Instant;

use picam_proto::client::ApiError;
use picam_proto::format::{format_date, format_duration, format_fps, format_uptime};
use picam_proto::protocol::{ConfigAck, Episode, StatusSnapshot, SystemEvent};
use tracing::{error, info, warn};

use crate::stream::StreamEventKind;

pub const MOTION_DETECTED_TEXT: &str = "⚠️ Movimiento Detectado";
pub const MOTION_CALM_TEXT: &str = "✅ Calmado";
pub const CAMERA_ACTIVE_TEXT: &str = "Activo";
pub const CAMERA_INACTIVE_TEXT: &str = "Inactivo";
pub const CONNECTION_ERROR_TEXT: &str = "Error de conexión";
pub const NO_EPISODES_TEXT: &str = "No hay episodios aún";
pub const EPISODES_ERROR_TEXT: &str = "Error cargando episodios";
pub const NO_EVENTS_TEXT: &str = "No hay eventos aún";
pub const EVENTS_ERROR_TEXT: &str = "Error cargando eventos";
pub const CONFIG_OK_TEXT: &str = "Configuración actualizada correctamente";

const MAX_LOG_LINES: usize = 200;

// ── Regions ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionClass {
    Detected,
    Calm,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MotionIndicator {
    pub text: String,
    pub class: MotionClass,
}

impl MotionIndicator {
    fn from_flag(motion_detected: bool) -> Self {
        if motion_detected {
            Self {
                text: MOTION_DETECTED_TEXT.to_string(),
                class: MotionClass::Detected,
            }
        } else {
            Self {
                text: MOTION_CALM_TEXT.to_string(),
                class: MotionClass::Calm,
            }
        }
    }
}

/// Visual state of the status dot.  `Pending` is the state before the first
/// poll completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotClass {
    Pending,
    Active,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraIndicator {
    pub dot: DotClass,
    pub text: String,
}

/// One rendered episode block.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeNode {
    pub title: String,
    pub start: String,
    pub duration: String,
    pub in_progress: bool,
    pub objects: Option<String>,
}

impl EpisodeNode {
    pub fn from_episode(episode: &Episode) -> Self {
        Self {
            title: episode.episode_id.clone(),
            start: format!("Inicio: {}", format_date(episode.start_time.as_deref())),
            duration: format!("Duración: {}", format_duration(episode.duration_seconds)),
            in_progress: episode.in_progress(),
            objects: episode
                .object_detected
                .as_ref()
                .filter(|objs| !objs.is_empty())
                .map(|objs| objs.join(", ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventNode {
    pub timestamp: String,
    pub severity: String,
    pub event_type: String,
    pub message: String,
}

impl EventNode {
    pub fn from_event(event: &SystemEvent) -> Self {
        Self {
            timestamp: format_date(event.timestamp.as_deref()),
            severity: event.severity.clone(),
            event_type: event.event_type.clone(),
            message: event.message.clone(),
        }
    }
}

/// Content of a list region: either one placeholder or one node per item.
#[derive(Debug, Clone, PartialEq)]
pub enum ListNode<T> {
    Placeholder(String),
    Item(T),
}

impl<T> ListNode<T> {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, ListNode::Placeholder(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamPhase {
    Connecting,
    Connected,
    /// Failed; a reconnect is scheduled.
    Reconnecting,
}

#[derive(Debug, Clone)]
pub struct StreamView {
    pub source: String,
    pub phase: StreamPhase,
    pub last_error: Option<String>,
    pub bytes: u64,
    pub frames: u64,
    pub frame_rate: Option<f64>,
    pub reconnects: u64,
    last_sample: Option<(Instant, u64)>,
}

impl StreamView {
    fn new(source: String) -> Self {
        Self {
            source,
            phase: StreamPhase::Connecting,
            last_error: None,
            bytes: 0,
            frames: 0,
            frame_rate: None,
            reconnects: 0,
            last_sample: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// Modal message the user has to dismiss.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

// ── AppState ──────────────────────────────────────────────────────────────────

pub struct AppState {
    pub base_url: String,
    pub motion: MotionIndicator,
    pub motion_count: String,
    pub fps: String,
    pub uptime: String,
    pub total_events: String,
    pub camera: CameraIndicator,
    pub episodes: Vec<ListNode<EpisodeNode>>,
    pub events: Vec<ListNode<EventNode>>,
    pub events_enabled: bool,
    pub stream: StreamView,
    pub notice: Option<Notice>,
    pub log_lines: VecDeque<String>,
    /// Successful status polls since start.
    pub status_polls: u64,
}

impl AppState {
    pub fn new(base_url: impl Into<String>, stream_source: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            motion: MotionIndicator::from_flag(false),
            motion_count: "0".to_string(),
            fps: "0.0".to_string(),
            uptime: "0s".to_string(),
            total_events: "0".to_string(),
            camera: CameraIndicator {
                dot: DotClass::Pending,
                text: "Conectando...".to_string(),
            },
            episodes: vec![ListNode::Placeholder("Cargando episodios...".to_string())],
            events: vec![ListNode::Placeholder("Cargando eventos...".to_string())],
            events_enabled: true,
            stream: StreamView::new(stream_source.into()),
            notice: None,
            log_lines: VecDeque::new(),
            status_polls: 0,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        let ts = chrono::Local::now().format("%H:%M:%S");
        self.log_lines.push_back(format!("{} {}", ts, msg.into()));
        while self.log_lines.len() > MAX_LOG_LINES {
            self.log_lines.pop_front();
        }
    }

    // ── Status ────────────────────────────────────────────────────────────────

    pub fn apply_status(&mut self, result: Result<StatusSnapshot, ApiError>) {
        match result {
            Ok(status) => {
                self.motion = MotionIndicator::from_flag(status.motion_detected);
                self.motion_count = status.total_episodes.to_string();
                self.fps = format_fps(status.fps);
                self.uptime = format_uptime(status.uptime_seconds);
                self.total_events = status.total_events.to_string();
                self.camera = if status.camera_active {
                    CameraIndicator {
                        dot: DotClass::Active,
                        text: CAMERA_ACTIVE_TEXT.to_string(),
                    }
                } else {
                    CameraIndicator {
                        dot: DotClass::Error,
                        text: CAMERA_INACTIVE_TEXT.to_string(),
                    }
                };
                self.status_polls += 1;
            }
            Err(e) => {
                error!("Error actualizando estado: {}", e);
                self.push_log(format!("status poll failed: {}", e));
                self.camera = CameraIndicator {
                    dot: DotClass::Error,
                    text: CONNECTION_ERROR_TEXT.to_string(),
                };
            }
        }
    }

    // ── Episodes / events ─────────────────────────────────────────────────────

    pub fn apply_episodes(&mut self, result: Result<Vec<Episode>, ApiError>) {
        self.episodes = match result {
            Ok(episodes) if episodes.is_empty() => {
                vec![ListNode::Placeholder(NO_EPISODES_TEXT.to_string())]
            }
            Ok(episodes) => episodes
                .iter()
                .map(|ep| ListNode::Item(EpisodeNode::from_episode(ep)))
                .collect(),
            Err(e) => {
                error!("Error actualizando episodios: {}", e);
                self.push_log(format!("episodes poll failed: {}", e));
                vec![ListNode::Placeholder(EPISODES_ERROR_TEXT.to_string())]
            }
        };
    }

    pub fn apply_events(&mut self, result: Result<Vec<SystemEvent>, ApiError>) {
        self.events = match result {
            Ok(events) if events.is_empty() => {
                vec![ListNode::Placeholder(NO_EVENTS_TEXT.to_string())]
            }
            Ok(events) => events
                .iter()
                .map(|ev| ListNode::Item(EventNode::from_event(ev)))
                .collect(),
            Err(e) => {
                error!("Error actualizando eventos: {}", e);
                self.push_log(format!("events poll failed: {}", e));
                vec![ListNode::Placeholder(EVENTS_ERROR_TEXT.to_string())]
            }
        };
    }

    // ── Config form ───────────────────────────────────────────────────────────

    pub fn apply_config_result(&mut self, result: Result<ConfigAck, ApiError>) {
        match result {
            Ok(ack) => {
                info!("Configuración actualizada: {:?}", ack);
                self.push_log(format!(
                    "config applied: {}",
                    ack.message.as_deref().unwrap_or("ok")
                ));
                self.show_notice(Severity::Success, CONFIG_OK_TEXT);
            }
            Err(e) => self.reject_config(&e.to_string()),
        }
    }

    /// Config submission failed, remotely or before anything was sent.
    pub fn reject_config(&mut self, reason: &str) {
        error!("Error actualizando configuración: {}", reason);
        self.push_log(format!("config update failed: {}", reason));
        self.show_notice(
            Severity::Error,
            format!("Error al actualizar configuración: {}", reason),
        );
    }

    pub fn show_notice(&mut self, severity: Severity, message: impl Into<String>) {
        self.notice = Some(Notice {
            severity,
            message: message.into(),
        });
    }

    pub fn dismiss_notice(&mut self) -> bool {
        self.notice.take().is_some()
    }

    // ── Stream ────────────────────────────────────────────────────────────────

    /// The stream source was (re)assigned.
    pub fn stream_source_changed(&mut self, source: String, reconnect: bool) {
        let reconnects = self.stream.reconnects + u64::from(reconnect);
        self.stream = StreamView::new(source);
        self.stream.reconnects = reconnects;
    }

    pub fn apply_stream_event(&mut self, kind: &StreamEventKind) {
        match kind {
            StreamEventKind::Loaded => {
                self.stream.phase = StreamPhase::Connected;
                self.stream.last_error = None;
                self.stream.last_sample = Some((Instant::now(), 0));
                self.push_log("stream connected");
            }
            StreamEventKind::Progress { bytes, frames } => {
                let now = Instant::now();
                if let Some((at, prev_frames)) = self.stream.last_sample {
                    let dt = now.duration_since(at).as_secs_f64();
                    if dt > 0.0 {
                        self.stream.frame_rate =
                            Some(frames.saturating_sub(prev_frames) as f64 / dt);
                    }
                }
                self.stream.last_sample = Some((now, *frames));
                self.stream.bytes = *bytes;
                self.stream.frames = *frames;
            }
            StreamEventKind::Error(reason) => {
                warn!("Error en stream de video: {}", reason);
                self.stream.phase = StreamPhase::Reconnecting;
                self.stream.last_error = Some(reason.clone());
                self.stream.frame_rate = None;
                self.push_log(format!("stream error: {}", reason));
            }
        }
    }
}
