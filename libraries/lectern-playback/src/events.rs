//! Playback Events
//!
//! Event-based communication for presentation sync. The controller queues
//! events as state changes and callers drain them after each call.

use crate::types::PlaybackState;
use lectern_core::{LectureId, RepeatMode};
use serde::{Deserialize, Serialize};

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Playback state changed
    StateChanged { state: PlaybackState },

    /// A different lecture became current
    LectureChanged {
        lecture_id: LectureId,
        previous_lecture_id: Option<LectureId>,
    },

    /// Position or duration of the current lecture changed
    PositionChanged { position: f64, duration: f64 },

    /// A lecture's favorite flag flipped
    FavoriteChanged {
        lecture_id: LectureId,
        is_favorite: bool,
    },

    /// The current position was saved on request
    Bookmarked { lecture_id: LectureId, position: f64 },

    VolumeChanged { volume: f64 },

    RateChanged { rate: f64 },

    ShuffleChanged { enabled: bool },

    RepeatChanged { mode: RepeatMode },

    /// A lecture could not be played
    Error { message: String },
}
