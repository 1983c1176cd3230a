//! Error types for playback control

pub use lectern_core::PlaybackError;

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
