//! Where picam keeps its files: `{config_dir}/picam/config.toml` and
//! `{data_local_dir}/picam/picam.log`.

use std::path::PathBuf;

const APP_DIR: &str = "picam";

pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

pub fn log_path() -> PathBuf {
    data_dir().join("picam.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_end_in_app_dir() {
        assert!(data_dir().ends_with("picam"));
        assert!(config_dir().ends_with("picam"));
        assert!(log_path().ends_with("picam/picam.log"));
    }

    #[test]
    fn test_log_lives_under_data_dir() {
        assert!(log_path().starts_with(data_dir()));
    }
}
