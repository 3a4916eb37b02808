// Error types for Daily Dock
// Library code returns DockError; the command layer flattens it to String

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DockError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// A required file or directory does not exist.
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("no task ids left in the file for {0}")]
    IdsExhausted(chrono::NaiveDate),
}

pub type Result<T> = std::result::Result<T, DockError>;
