/// Core error types for Lectern
use crate::types::LectureId;
use thiserror::Error;

/// Result type alias using `LecternError`
pub type Result<T> = std::result::Result<T, LecternError>;

/// Result type alias for persistence operations
pub type PersistenceResult<T> = std::result::Result<T, PersistenceError>;

/// Core error type for Lectern
#[derive(Error, Debug)]
pub enum LecternError {
    /// Catalog could not be obtained or parsed
    #[error(transparent)]
    Load(#[from] LoadError),

    /// A playback request failed
    #[error(transparent)]
    Playback(#[from] PlaybackError),

    /// Local state could not be read or written
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Lecture not found
    #[error("Lecture not found: {0}")]
    LectureNotFound(LectureId),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl LecternError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Failure to obtain the lecture catalog
#[derive(Error, Debug)]
pub enum LoadError {
    /// Source could not be reached (missing file, network failure, bad status)
    #[error("Catalog unreachable: {0}")]
    Unreachable(String),

    /// Source was reached but did not contain a valid catalog document
    #[error("Catalog malformed: {0}")]
    Malformed(String),
}

impl LoadError {
    /// Create an unreachable-source error
    pub fn unreachable(msg: impl Into<String>) -> Self {
        Self::Unreachable(msg.into())
    }

    /// Create a malformed-catalog error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        Self::Unreachable(err.to_string())
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// Failure to start or continue playback
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    /// Requested lecture is not in the library
    #[error("Lecture not found: {0}")]
    UnknownLecture(LectureId),

    /// Lecture has neither a filename nor an audio URL
    #[error("No audio resource for lecture {0}")]
    NoResource(LectureId),

    /// The audio output rejected or failed to play the resource
    #[error("Audio output error: {0}")]
    Output(String),
}

impl PlaybackError {
    /// Create an audio output error
    pub fn output(msg: impl Into<String>) -> Self {
        Self::Output(msg.into())
    }
}

/// Failure of the local state store
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Store could not be opened or written
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Stored data could not be decoded
    #[error("Stored state corrupt: {0}")]
    Corrupt(String),
}

impl PersistenceError {
    /// Create an unavailable-store error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a corrupt-data error
    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::Corrupt(msg.into())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Corrupt(err.to_string())
    }
}
