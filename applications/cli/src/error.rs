/// CLI error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Lecture not found: {0}")]
    NotFound(String),

    #[error("Bad argument: {0}")]
    BadArgument(String),

    #[error("Catalog load failed: {0}")]
    Load(#[from] lectern_core::LoadError),

    #[error("Catalog edit failed: {0}")]
    Catalog(#[from] lectern_library::CatalogError),

    #[error("Storage error: {0}")]
    Storage(#[from] lectern_storage::StorageError),

    #[error("Playback error: {0}")]
    Playback(#[from] lectern_core::PlaybackError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}
