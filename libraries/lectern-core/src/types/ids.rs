/// ID types for Lectern entities
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lecture identifier
///
/// Opaque and stable across sessions. Catalog ids look like
/// `lecture_20250828_001`, but nothing relies on that shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LectureId(String);

impl LectureId {
    /// Create a new lecture ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh id for a lecture brought in from another catalog
    pub fn imported() -> Self {
        Self(format!("imported-{}", Uuid::new_v4()))
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LectureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LectureId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for LectureId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
