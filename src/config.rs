use crate::error::{Result, ScrubberError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Pipeline configuration: where to read the raw dataset and where the
/// cleaned table and rejection log end up.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_source_path")]
    pub source_path: PathBuf,
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,
}

fn default_source_path() -> PathBuf {
    PathBuf::from("data/train.csv")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("data/cleaned_taxi_data.csv")
}

fn default_log_path() -> PathBuf {
    PathBuf::from("logs/removed_records.csv")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_path: default_source_path(),
            output_path: default_output_path(),
            log_path: default_log_path(),
        }
    }
}

impl Config {
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            ScrubberError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }
}
