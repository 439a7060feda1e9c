use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::{EpisodeQuery, STREAM_PATH};
use crate::platform;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub stream: StreamConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Root of the camera backend, e.g. `http://raspberrypi.local:8000`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_status_interval_ms")]
    pub status_interval_ms: u64,
    #[serde(default = "default_episodes_interval_ms")]
    pub episodes_interval_ms: u64,
    #[serde(default = "default_episodes_limit")]
    pub episodes_limit: u32,
    #[serde(default = "default_motion_only")]
    pub motion_only: bool,
    #[serde(default = "default_events_enabled")]
    pub events_enabled: bool,
    #[serde(default = "default_events_interval_ms")]
    pub events_interval_ms: u64,
    #[serde(default = "default_events_limit")]
    pub events_limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    #[serde(default = "default_stream_path")]
    pub path: String,
    /// Fixed delay before re-requesting the feed after an error.
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            status_interval_ms: default_status_interval_ms(),
            episodes_interval_ms: default_episodes_interval_ms(),
            episodes_limit: default_episodes_limit(),
            motion_only: default_motion_only(),
            events_enabled: default_events_enabled(),
            events_interval_ms: default_events_interval_ms(),
            events_limit: default_events_limit(),
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            path: default_stream_path(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
        }
    }
}

impl PollingConfig {
    pub fn status_interval(&self) -> Duration {
        Duration::from_millis(self.status_interval_ms.max(1))
    }

    pub fn episodes_interval(&self) -> Duration {
        Duration::from_millis(self.episodes_interval_ms.max(1))
    }

    pub fn events_interval(&self) -> Duration {
        Duration::from_millis(self.events_interval_ms.max(1))
    }

    pub fn episode_query(&self) -> EpisodeQuery {
        EpisodeQuery {
            limit: self.episodes_limit,
            motion_only: self.motion_only,
        }
    }
}

impl StreamConfig {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_status_interval_ms() -> u64 {
    1000
}

fn default_episodes_interval_ms() -> u64 {
    5000
}

fn default_episodes_limit() -> u32 {
    5
}

fn default_motion_only() -> bool {
    true
}

fn default_events_enabled() -> bool {
    true
}

fn default_events_interval_ms() -> u64 {
    5000
}

fn default_events_limit() -> u32 {
    10
}

fn default_stream_path() -> String {
    STREAM_PATH.to_string()
}

fn default_reconnect_delay_ms() -> u64 {
    2000
}

impl Config {
    /// Load the default config file, writing one with defaults on first run.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.polling.status_interval(), Duration::from_millis(1000));
        assert_eq!(config.polling.episodes_interval(), Duration::from_millis(5000));
        assert_eq!(config.polling.episode_query(), EpisodeQuery::default());
        assert_eq!(config.stream.path, "/video_feed");
        assert_eq!(config.stream.reconnect_delay(), Duration::from_millis(2000));
        assert!(Config::config_path().ends_with("picam/config.toml"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            base_url = "http://pi.local:8000"

            [polling]
            episodes_limit = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.server.base_url, "http://pi.local:8000");
        assert_eq!(config.polling.episodes_limit, 3);
        assert_eq!(config.polling.status_interval_ms, 1000);
        assert!(config.polling.events_enabled);
        assert_eq!(config.stream.reconnect_delay_ms, 2000);
    }

    #[test]
    fn test_load_from_creates_file() {
        let dir = std::env::temp_dir().join(format!("picam-config-test-{}", std::process::id()));
        let path = dir.join("config.toml");
        let _ = std::fs::remove_file(&path);

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.polling.episodes_interval_ms, 5000);

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.server.base_url, config.server.base_url);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
