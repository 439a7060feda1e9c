use serde::{Deserialize, Deserializer, Serialize};

/// Snapshot returned by `GET /api/status`.  Replaced wholesale on every poll.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusSnapshot {
    /// Missing or null on the wire counts as false / zero; only `fps` is
    /// required.
    #[serde(default, deserialize_with = "null_as_default")]
    pub motion_detected: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_episodes: u64,
    pub fps: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub uptime_seconds: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub camera_active: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_events: u64,
}

/// A recorded motion episode as listed by `GET /api/episodes`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Episode {
    pub episode_id: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    /// `None` while the episode is still being recorded.
    #[serde(default)]
    pub duration_seconds: Option<f64>,
    #[serde(default)]
    pub object_detected: Option<Vec<String>>,
}

impl Episode {
    pub fn in_progress(&self) -> bool {
        self.duration_seconds.is_none()
    }
}

/// Body of `POST /api/config`.
///
/// Field order is the wire order; `background_update_rate` is left out of the
/// body entirely when unset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigUpdate {
    pub motion_threshold: i64,
    pub min_area: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_update_rate: Option<f64>,
}

impl ConfigUpdate {
    pub fn new(motion_threshold: i64, min_area: i64) -> Self {
        Self {
            motion_threshold,
            min_area,
            background_update_rate: None,
        }
    }
}

/// Acknowledgement returned by `POST /api/config`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigAck {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub config: Option<serde_json::Value>,
}

/// Entry from `GET /api/events`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemEvent {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub episode_id: Option<i64>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub severity: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
