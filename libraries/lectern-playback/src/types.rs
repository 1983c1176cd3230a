//! Core types for playback control

use lectern_library::DEFAULT_AUDIO_BASE;
use serde::{Deserialize, Serialize};

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// Nothing loaded, or the last load failed
    #[default]
    Idle,

    /// Waiting for the output to start the requested lecture
    Loading,

    /// Currently playing
    Playing,

    /// Paused mid-lecture
    Paused,

    /// Reached the end; resolves immediately to a replay, the next lecture or Idle
    Ended,
}

impl PlaybackState {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Ended => "ended",
        }
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What `resume` did with the last saved session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeOutcome {
    /// Playback of the saved lecture was started
    Started,

    /// The session is older than the resume window
    Stale,

    /// The saved lecture is no longer in the catalog
    MissingLecture,
}

/// Configuration for the playback controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Directory or URL prefix lecture filenames are resolved against (default: "audio")
    pub audio_base: String,

    /// Initial volume (0.0-1.0, default: 0.7)
    pub volume: f64,

    /// Maximum recent-history size (default: 50)
    pub history_size: usize,

    /// Seconds of media movement between persisted position ticks
    /// (default: 0, persist every tick)
    pub progress_persist_step: f64,

    /// How long a saved session stays resumable, in hours (default: 24)
    pub resume_window_hours: u32,
}

impl PlaybackConfig {
    pub fn resume_window(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.resume_window_hours))
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            audio_base: DEFAULT_AUDIO_BASE.to_string(),
            volume: 0.7,
            history_size: 50,
            progress_persist_step: 0.0,
            resume_window_hours: 24,
        }
    }
}

/// Slowest allowed playback rate
pub const MIN_RATE: f64 = 0.25;

/// Fastest allowed playback rate
pub const MAX_RATE: f64 = 4.0;
