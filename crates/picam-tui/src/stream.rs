//! Stream monitor — keeps one HTTP connection to the MJPEG feed open and
//! reports what happens to it.
//!
//! A monitor is started for one source URL.  It emits `Loaded` once the first
//! bytes arrive, `Progress` about once a second while data keeps flowing, and
//! exactly one `Error` when the connection fails or the feed ends.  The
//! monitor never retries; reconnection is the controller's job.

use std::time::{Duration, Instant};

use futures_util::StreamExt;
use picam_proto::client::ApiError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::app::AppMessage;

const PROGRESS_INTERVAL: Duration = Duration::from_secs(1);
const JPEG_SOI: [u8; 3] = [0xFF, 0xD8, 0xFF];

#[derive(Debug, Clone)]
pub struct StreamEvent {
    /// Generation of the source this event belongs to.  Events from a source
    /// that has since been replaced are ignored.
    pub source: u64,
    pub kind: StreamEventKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StreamEventKind {
    Loaded,
    Progress { bytes: u64, frames: u64 },
    Error(String),
}

/// Counts JPEG frames in an MJPEG byte stream by their start-of-image marker.
/// Markers split across chunk boundaries are counted once.
#[derive(Debug, Default)]
pub struct FrameCounter {
    pub bytes: u64,
    pub frames: u64,
    tail: Vec<u8>,
}

impl FrameCounter {
    pub fn feed(&mut self, chunk: &[u8]) {
        self.bytes += chunk.len() as u64;

        let mut window = std::mem::take(&mut self.tail);
        window.extend_from_slice(chunk);
        self.frames += window.windows(JPEG_SOI.len()).filter(|w| *w == JPEG_SOI).count() as u64;

        let keep = window.len().min(JPEG_SOI.len() - 1);
        self.tail = window.split_off(window.len() - keep);
    }
}

pub fn spawn_monitor(
    http: reqwest::Client,
    url: String,
    source: u64,
    tx: mpsc::Sender<AppMessage>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let reason = match watch(&http, &url, source, &tx).await {
            Ok(()) => "stream ended".to_string(),
            Err(e) => e.to_string(),
        };
        debug!("[stream] source {} closed: {}", source, reason);
        let _ = tx
            .send(AppMessage::Stream(StreamEvent {
                source,
                kind: StreamEventKind::Error(reason),
            }))
            .await;
    })
}

async fn watch(
    http: &reqwest::Client,
    url: &str,
    source: u64,
    tx: &mpsc::Sender<AppMessage>,
) -> Result<(), ApiError> {
    let response = http.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::HttpStatus(status.as_u16()));
    }

    let mut body = response.bytes_stream();
    let mut counter = FrameCounter::default();
    let mut loaded = false;
    let mut last_report = Instant::now();

    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        counter.feed(&chunk);

        if !loaded {
            loaded = true;
            let _ = tx
                .send(AppMessage::Stream(StreamEvent {
                    source,
                    kind: StreamEventKind::Loaded,
                }))
                .await;
        }

        if last_report.elapsed() >= PROGRESS_INTERVAL {
            last_report = Instant::now();
            let _ = tx
                .send(AppMessage::Stream(StreamEvent {
                    source,
                    kind: StreamEventKind::Progress {
                        bytes: counter.bytes,
                        frames: counter.frames,
                    },
                }))
                .await;
        }
    }
    Ok(())
}
