//! Error types for catalog editing

use thiserror::Error;

/// Result type for catalog edit operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors from the catalog edit workflow
#[derive(Debug, Error)]
pub enum CatalogError {
    /// New lectures need a title
    #[error("Lecture title is required")]
    MissingTitle,

    /// Document could not be parsed as a catalog
    #[error("Invalid catalog document: {0}")]
    InvalidDocument(String),

    /// Reading or writing the catalog file failed
    #[error("Catalog I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidDocument(err.to_string())
    }
}
