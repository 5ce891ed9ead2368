use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrubberError {
    #[error("source file not found: {0:?}")]
    SourceNotFound(PathBuf),

    #[error("failed to parse source data: {0}")]
    Parse(#[from] csv::Error),

    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ScrubberError>;
