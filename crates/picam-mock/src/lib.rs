//! In-process stand-in for the camera backend, shared by the test suites.
//!
//! Serves the JSON API and an endless MJPEG feed on an ephemeral port.
//! Responses can be scripted to fail once per queued status code, and every
//! request worth asserting on is recorded.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::{Query, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

const FRAME_INTERVAL: Duration = Duration::from_millis(30);

#[derive(Debug, Clone)]
pub struct CapturedPost {
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

type Queries = Arc<Mutex<Vec<HashMap<String, String>>>>;
type Failures = Arc<Mutex<VecDeque<u16>>>;

#[derive(Clone)]
struct MockState {
    status_body: Arc<Mutex<Value>>,
    /// Served with 200 instead of `status_body` when set.
    status_raw: Arc<Mutex<Option<String>>>,
    status_failures: Failures,
    episodes_body: Arc<Mutex<Value>>,
    episodes_failures: Failures,
    episode_queries: Queries,
    events_body: Arc<Mutex<Value>>,
    config_failures: Failures,
    config_posts: Arc<Mutex<Vec<CapturedPost>>>,
    stream_failures: Failures,
    stream_queries: Queries,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            status_body: Arc::new(Mutex::new(json!({
                "camera_active": true,
                "motion_detected": false,
                "fps": 14.96,
                "total_episodes": 3,
                "total_events": 9,
                "uptime_seconds": 3725.4
            }))),
            status_raw: Arc::default(),
            status_failures: Arc::default(),
            episodes_body: Arc::new(Mutex::new(json!([]))),
            episodes_failures: Arc::default(),
            episode_queries: Arc::default(),
            events_body: Arc::new(Mutex::new(json!([]))),
            config_failures: Arc::default(),
            config_posts: Arc::default(),
            stream_failures: Arc::default(),
            stream_queries: Arc::default(),
        }
    }
}

pub struct MockBackend {
    pub base_url: String,
    state: MockState,
    handle: JoinHandle<()>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new()
            .route("/api/status", get(get_status))
            .route("/api/episodes", get(get_episodes))
            .route("/api/events", get(get_events))
            .route("/api/config", post(post_config))
            .route("/video_feed", get(video_feed))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("mock backend should bind");
        let addr = listener.local_addr().expect("mock backend address");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
            handle,
        }
    }

    // ── Scripted failures ─────────────────────────────────────────────────────

    pub fn fail_status_once(&self, code: u16) {
        self.state.status_failures.lock().unwrap().push_back(code);
    }

    pub fn fail_episodes_once(&self, code: u16) {
        self.state.episodes_failures.lock().unwrap().push_back(code);
    }

    pub fn fail_config_once(&self, code: u16) {
        self.state.config_failures.lock().unwrap().push_back(code);
    }

    pub fn fail_stream_once(&self, code: u16) {
        self.state.stream_failures.lock().unwrap().push_back(code);
    }

    // ── Canned bodies ─────────────────────────────────────────────────────────

    pub fn set_episodes(&self, body: Value) {
        *self.state.episodes_body.lock().unwrap() = body;
    }

    pub fn set_events(&self, body: Value) {
        *self.state.events_body.lock().unwrap() = body;
    }

    pub fn set_status_raw(&self, raw: &str) {
        *self.state.status_raw.lock().unwrap() = Some(raw.to_string());
    }

    // ── Recorded requests ─────────────────────────────────────────────────────

    pub fn config_posts(&self) -> Vec<CapturedPost> {
        self.state.config_posts.lock().unwrap().clone()
    }

    pub fn episode_queries(&self) -> Vec<HashMap<String, String>> {
        self.state.episode_queries.lock().unwrap().clone()
    }

    pub fn stream_queries(&self) -> Vec<HashMap<String, String>> {
        self.state.stream_queries.lock().unwrap().clone()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn scripted_failure(queue: &Mutex<VecDeque<u16>>) -> Option<Response> {
    let code = queue.lock().unwrap().pop_front()?;
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Some((status, Json(json!({ "detail": "scripted failure" }))).into_response())
}

async fn get_status(State(state): State<MockState>) -> Response {
    if let Some(failure) = scripted_failure(&state.status_failures) {
        return failure;
    }
    if let Some(raw) = state.status_raw.lock().unwrap().clone() {
        return (StatusCode::OK, raw).into_response();
    }
    Json(state.status_body.lock().unwrap().clone()).into_response()
}

async fn get_episodes(
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state.episode_queries.lock().unwrap().push(query);
    if let Some(failure) = scripted_failure(&state.episodes_failures) {
        return failure;
    }
    Json(state.episodes_body.lock().unwrap().clone()).into_response()
}

async fn get_events(State(state): State<MockState>) -> Response {
    Json(state.events_body.lock().unwrap().clone()).into_response()
}

async fn post_config(State(state): State<MockState>, headers: HeaderMap, body: Bytes) -> Response {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.config_posts.lock().unwrap().push(CapturedPost {
        content_type,
        body: body.to_vec(),
    });
    if let Some(failure) = scripted_failure(&state.config_failures) {
        return failure;
    }
    let applied: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    Json(json!({
        "status": "success",
        "message": "Configuración actualizada",
        "config": applied
    }))
    .into_response()
}

async fn video_feed(
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state.stream_queries.lock().unwrap().push(query);
    if let Some(failure) = scripted_failure(&state.stream_failures) {
        return failure;
    }

    let frames = futures_util::stream::unfold(0u64, |n| async move {
        if n > 0 {
            tokio::time::sleep(FRAME_INTERVAL).await;
        }
        let mut part = b"--frame\r\nContent-Type: image/jpeg\r\n\r\n".to_vec();
        part.extend_from_slice(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0xFF, 0xD9]);
        part.extend_from_slice(b"\r\n");
        Some((Ok::<_, std::io::Error>(Bytes::from(part)), n + 1))
    });

    Response::builder()
        .header(CONTENT_TYPE, "multipart/x-mixed-replace; boundary=frame")
        .body(Body::from_stream(frames))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
