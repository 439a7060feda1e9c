/// Controller — owns the polling schedules and the video-feed connection.
///
/// Each polling loop is a spawned task driven by `tokio::time::interval`.
/// Every tick spawns a fire-and-forget fetch whose result goes back to the
/// App event loop as an `AppMessage`; overlapping fetches are not sequenced,
/// the last one to arrive wins.  Only the schedules can be cancelled, never a
/// request that is already in flight.
///
/// The stream side mirrors an `<img src>` element: a monitor task is bound to
/// one source URL, and an error re-arms a fixed-delay reconnect that points
/// the source at `{stream}?t={epoch_ms}`.  Retries are unbounded.
use std::time::Duration;

use picam_proto::client::{ApiClient, EpisodeQuery};
use picam_proto::config::{Config, PollingConfig, StreamConfig};
use picam_proto::protocol::ConfigUpdate;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::app::AppMessage;
use crate::stream;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollKind {
    Status,
    Episodes,
    Events,
}

/// At most one live schedule per loop kind.
#[derive(Default)]
struct PollTimer {
    handle: Option<JoinHandle<()>>,
}

impl PollTimer {
    fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Start ticking every `period`, first tick immediately.  Returns false
    /// (and leaves the running schedule alone) if already started.
    fn start<F>(&mut self, period: Duration, mut on_tick: F) -> bool
    where
        F: FnMut() + Send + 'static,
    {
        if self.is_running() {
            return false;
        }
        self.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                on_tick();
            }
        }));
        true
    }

    fn stop(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }
}

pub struct Controller {
    api: ApiClient,
    polling: PollingConfig,
    stream_cfg: StreamConfig,
    tx: mpsc::Sender<AppMessage>,
    status_timer: PollTimer,
    episodes_timer: PollTimer,
    events_timer: PollTimer,
    stream_task: Option<JoinHandle<()>>,
    reconnect_task: Option<JoinHandle<()>>,
    /// Generation of the current stream source; bumps on every reassignment.
    stream_source: u64,
    stream_url: String,
}

impl Controller {
    pub fn new(api: ApiClient, config: &Config, tx: mpsc::Sender<AppMessage>) -> Self {
        let stream_url = api.stream_url(&config.stream.path, None);
        Self {
            api,
            polling: config.polling.clone(),
            stream_cfg: config.stream.clone(),
            tx,
            status_timer: PollTimer::default(),
            episodes_timer: PollTimer::default(),
            events_timer: PollTimer::default(),
            stream_task: None,
            reconnect_task: None,
            stream_source: 0,
            stream_url,
        }
    }

    /// Start every loop and open the video feed.  Call once per run.
    pub fn initialize(&mut self) {
        info!("Controller: starting polling against {}", self.api.base_url());
        self.start_status_updates();
        self.start_episode_updates();
        if self.polling.events_enabled {
            self.start_event_updates();
        }
        let url = self.stream_url.clone();
        self.connect_stream(url);
    }

    // ── Polling loops ─────────────────────────────────────────────────────────

    pub fn start_status_updates(&mut self) -> bool {
        let (api, tx) = (self.api.clone(), self.tx.clone());
        let started = self
            .status_timer
            .start(self.polling.status_interval(), move || {
                spawn_status_fetch(api.clone(), tx.clone())
            });
        log_start(PollKind::Status, started);
        started
    }

    pub fn start_episode_updates(&mut self) -> bool {
        let (api, tx) = (self.api.clone(), self.tx.clone());
        let query = self.polling.episode_query();
        let started = self
            .episodes_timer
            .start(self.polling.episodes_interval(), move || {
                spawn_episodes_fetch(api.clone(), tx.clone(), query)
            });
        log_start(PollKind::Episodes, started);
        started
    }

    pub fn start_event_updates(&mut self) -> bool {
        let (api, tx) = (self.api.clone(), self.tx.clone());
        let limit = self.polling.events_limit;
        let started = self
            .events_timer
            .start(self.polling.events_interval(), move || {
                spawn_events_fetch(api.clone(), tx.clone(), limit)
            });
        log_start(PollKind::Events, started);
        started
    }

    pub fn is_polling(&self, kind: PollKind) -> bool {
        match kind {
            PollKind::Status => self.status_timer.is_running(),
            PollKind::Episodes => self.episodes_timer.is_running(),
            PollKind::Events => self.events_timer.is_running(),
        }
    }

    /// One-off refresh outside the schedule.
    pub fn refresh_status(&self) {
        spawn_status_fetch(self.api.clone(), self.tx.clone());
    }

    pub fn refresh_episodes(&self) {
        spawn_episodes_fetch(self.api.clone(), self.tx.clone(), self.polling.episode_query());
    }

    pub fn refresh_events(&self) {
        spawn_events_fetch(self.api.clone(), self.tx.clone(), self.polling.events_limit);
    }

    pub fn refresh_all(&self) {
        self.refresh_status();
        self.refresh_episodes();
        if self.polling.events_enabled {
            self.refresh_events();
        }
    }

    // ── Config ────────────────────────────────────────────────────────────────

    pub fn submit_config(&self, update: ConfigUpdate) {
        info!(
            "Controller: submitting config motion_threshold={} min_area={}",
            update.motion_threshold, update.min_area
        );
        let (api, tx) = (self.api.clone(), self.tx.clone());
        tokio::spawn(async move {
            let result = api.update_config(&update).await;
            let _ = tx.send(AppMessage::ConfigSubmitted(result)).await;
        });
    }

    // ── Stream ────────────────────────────────────────────────────────────────

    pub fn stream_source(&self) -> u64 {
        self.stream_source
    }

    pub fn stream_url(&self) -> &str {
        &self.stream_url
    }

    /// Point the feed at `url`, dropping any previous connection.
    fn connect_stream(&mut self, url: String) {
        if let Some(task) = self.stream_task.take() {
            task.abort();
        }
        self.stream_source += 1;
        self.stream_url = url.clone();
        debug!("Controller: stream source {} -> {}", self.stream_source, url);
        self.stream_task = Some(stream::spawn_monitor(
            self.api.http().clone(),
            url,
            self.stream_source,
            self.tx.clone(),
        ));
    }

    /// Video feed failed: re-request it after the fixed delay.
    pub fn handle_stream_error(&mut self) {
        let delay = self.stream_cfg.reconnect_delay();
        warn!(
            "Error en stream de video, intentando reconectar en {} ms...",
            delay.as_millis()
        );
        if let Some(pending) = self.reconnect_task.take() {
            pending.abort();
        }
        let tx = self.tx.clone();
        self.reconnect_task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(AppMessage::StreamReconnect).await;
        }));
    }

    /// The delayed reconnect fired: reassign the source with a fresh
    /// cache-buster.  Returns the new URL.
    pub fn reconnect_stream(&mut self) -> String {
        self.reconnect_task = None;
        let ts = chrono::Utc::now().timestamp_millis();
        let url = self.api.stream_url(&self.stream_cfg.path, Some(ts));
        self.connect_stream(url.clone());
        url
    }

    pub fn handle_stream_load(&self) {
        info!("Stream de video conectado ({})", self.stream_url);
    }

    // ── Teardown ──────────────────────────────────────────────────────────────

    /// Cancel every schedule and the feed.  Safe to call at any time,
    /// including before `initialize` and more than once.
    pub fn shutdown(&mut self) {
        let mut stopped = Vec::new();
        if self.status_timer.stop() {
            stopped.push("status");
        }
        if self.episodes_timer.stop() {
            stopped.push("episodes");
        }
        if self.events_timer.stop() {
            stopped.push("events");
        }
        if let Some(task) = self.reconnect_task.take() {
            task.abort();
        }
        if let Some(task) = self.stream_task.take() {
            task.abort();
            stopped.push("stream");
        }
        if !stopped.is_empty() {
            info!("Controller: stopped {}", stopped.join(", "));
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn log_start(kind: PollKind, started: bool) {
    if started {
        debug!("Controller: {:?} polling started", kind);
    } else {
        debug!("Controller: {:?} polling already running", kind);
    }
}

fn spawn_status_fetch(api: ApiClient, tx: mpsc::Sender<AppMessage>) {
    tokio::spawn(async move {
        let result = api.status().await;
        let _ = tx.send(AppMessage::Status(result)).await;
    });
}

fn spawn_episodes_fetch(api: ApiClient, tx: mpsc::Sender<AppMessage>, query: EpisodeQuery) {
    tokio::spawn(async move {
        let result = api.episodes(query).await;
        let _ = tx.send(AppMessage::Episodes(result)).await;
    });
}

fn spawn_events_fetch(api: ApiClient, tx: mpsc::Sender<AppMessage>, limit: u32) {
    tokio::spawn(async move {
        let result = api.events(limit).await;
        let _ = tx.send(AppMessage::Events(result)).await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::{AppState, DotClass, CONNECTION_ERROR_TEXT};
    use crate::stream::StreamEventKind;
    use picam_mock::MockBackend;

    fn fast_config(base_url: &str) -> Config {
        let mut config = Config::default();
        config.server.base_url = base_url.to_string();
        config.polling.status_interval_ms = 40;
        config.polling.episodes_interval_ms = 200;
        config.polling.events_enabled = false;
        config.stream.reconnect_delay_ms = 50;
        config
    }

    fn controller(config: &Config) -> (Controller, mpsc::Receiver<AppMessage>) {
        let (tx, rx) = mpsc::channel(256);
        let api = ApiClient::new(config.server.base_url.clone());
        (Controller::new(api, config, tx), rx)
    }

    async fn recv(rx: &mut mpsc::Receiver<AppMessage>) -> AppMessage {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for controller message")
            .expect("channel closed")
    }

    #[tokio::test]
    async fn test_shutdown_before_start_is_noop() {
        let config = fast_config("http://127.0.0.1:9");
        let (mut ctl, mut rx) = controller(&config);
        ctl.shutdown();
        ctl.shutdown();
        assert!(!ctl.is_polling(PollKind::Status));
        assert!(!ctl.is_polling(PollKind::Episodes));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_start_twice_keeps_single_schedule() {
        let config = fast_config("http://127.0.0.1:9");
        let (mut ctl, _rx) = controller(&config);
        assert!(ctl.start_status_updates());
        assert!(!ctl.start_status_updates());
        assert!(ctl.is_polling(PollKind::Status));

        ctl.shutdown();
        assert!(!ctl.is_polling(PollKind::Status));
        // A stopped loop can be started again.
        assert!(ctl.start_status_updates());
        ctl.shutdown();
    }

    #[tokio::test]
    async fn test_failed_status_poll_recovers_on_next_tick() {
        let backend = MockBackend::start().await;
        backend.fail_status_once(500);
        let config = fast_config(&backend.base_url);
        let (mut ctl, mut rx) = controller(&config);
        let mut state = AppState::new(&backend.base_url, ctl.stream_url().to_string());

        ctl.start_status_updates();

        // One tick hits the scripted 500; a later tick must restore the dot.
        let mut saw_error = false;
        loop {
            if let AppMessage::Status(result) = recv(&mut rx).await {
                let failed = result.is_err();
                state.apply_status(result);
                if failed {
                    assert_eq!(state.camera.dot, DotClass::Error);
                    assert_eq!(state.camera.text, CONNECTION_ERROR_TEXT);
                    saw_error = true;
                } else if saw_error {
                    break;
                }
            }
        }
        assert_eq!(state.camera.dot, DotClass::Active);
        assert_eq!(state.camera.text, "Activo");
        assert!(ctl.is_polling(PollKind::Status));
        ctl.shutdown();
    }

    #[tokio::test]
    async fn test_initialize_fetches_immediately() {
        let backend = MockBackend::start().await;
        let config = fast_config(&backend.base_url);
        let (mut ctl, mut rx) = controller(&config);
        let mut state = AppState::new(&backend.base_url, ctl.stream_url().to_string());

        ctl.initialize();
        let (mut got_status, mut got_episodes) = (false, false);
        while !(got_status && got_episodes) {
            match recv(&mut rx).await {
                AppMessage::Status(result) => {
                    state.apply_status(result);
                    got_status = true;
                }
                AppMessage::Episodes(result) => {
                    state.apply_episodes(result);
                    got_episodes = true;
                }
                _ => {}
            }
        }
        assert_eq!(state.episodes.len(), 1);
        assert!(state.episodes[0].is_placeholder());
        let queries = backend.episode_queries();
        assert_eq!(queries[0].get("limit").map(String::as_str), Some("5"));
        assert_eq!(queries[0].get("motion_only").map(String::as_str), Some("true"));
        ctl.shutdown();
    }

    #[tokio::test]
    async fn test_submit_config_posts_exact_body() {
        let backend = MockBackend::start().await;
        let config = fast_config(&backend.base_url);
        let (ctl, mut rx) = controller(&config);

        ctl.submit_config(ConfigUpdate::new(50, 500));
        loop {
            if let AppMessage::ConfigSubmitted(result) = recv(&mut rx).await {
                assert!(result.is_ok());
                break;
            }
        }
        let posts = backend.config_posts();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].content_type.as_deref(), Some("application/json"));
        assert_eq!(posts[0].body, br#"{"motion_threshold":50,"min_area":500}"#.to_vec());
    }

    #[tokio::test]
    async fn test_submit_config_with_background_rate() {
        let backend = MockBackend::start().await;
        let config = fast_config(&backend.base_url);
        let (ctl, mut rx) = controller(&config);

        ctl.submit_config(ConfigUpdate {
            background_update_rate: Some(0.05),
            ..ConfigUpdate::new(20, 800)
        });
        loop {
            if let AppMessage::ConfigSubmitted(result) = recv(&mut rx).await {
                assert!(result.is_ok());
                break;
            }
        }
        let posts = backend.config_posts();
        assert_eq!(
            String::from_utf8(posts[0].body.clone()).unwrap(),
            r#"{"motion_threshold":20,"min_area":800,"background_update_rate":0.05}"#
        );
    }

    #[tokio::test]
    async fn test_stream_error_reconnects_with_cache_buster() {
        let backend = MockBackend::start().await;
        backend.fail_stream_once(503);
        let config = fast_config(&backend.base_url);
        let (mut ctl, mut rx) = controller(&config);

        let url = ctl.stream_url().to_string();
        ctl.connect_stream(url);
        let first_source = ctl.stream_source();

        // 503 from the feed -> Error for the first source.
        loop {
            if let AppMessage::Stream(ev) = recv(&mut rx).await {
                assert_eq!(ev.source, first_source);
                assert!(matches!(ev.kind, StreamEventKind::Error(_)));
                break;
            }
        }
        ctl.handle_stream_error();
        loop {
            if let AppMessage::StreamReconnect = recv(&mut rx).await {
                break;
            }
        }
        let new_url = ctl.reconnect_stream();
        assert!(new_url.starts_with(&format!("{}/video_feed?t=", backend.base_url)));
        assert_eq!(ctl.stream_source(), first_source + 1);

        // The second attempt reaches the feed.
        loop {
            if let AppMessage::Stream(ev) = recv(&mut rx).await {
                if ev.source == ctl.stream_source() && ev.kind == StreamEventKind::Loaded {
                    break;
                }
            }
        }
        let hits = backend.stream_queries();
        assert_eq!(hits.len(), 2);
        assert!(hits[0].get("t").is_none());
        assert!(hits[1].get("t").is_some());
        ctl.shutdown();
    }
}
