/// Persisted per-lecture state and the last-session slot
use super::ids::LectureId;
use super::lecture::lenient_timestamp;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// User state stored for one lecture
///
/// Any field missing from a stored record reads as its zero value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LectureState {
    pub is_favorite: bool,
    pub play_count: u32,
    pub last_position: f64,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub last_played: Option<DateTime<Utc>>,
}

impl LectureState {
    /// Merge a partial update; `None` fields keep their current value
    pub fn apply(&mut self, update: &LectureStateUpdate) {
        if let Some(is_favorite) = update.is_favorite {
            self.is_favorite = is_favorite;
        }
        if let Some(play_count) = update.play_count {
            self.play_count = play_count;
        }
        if let Some(last_position) = update.last_position {
            self.last_position = last_position;
        }
        if let Some(last_played) = update.last_played {
            self.last_played = Some(last_played);
        }
    }
}

/// Partial update to a lecture's stored state
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureStateUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_position: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_played: Option<DateTime<Utc>>,
}

impl LectureStateUpdate {
    pub fn favorite(is_favorite: bool) -> Self {
        Self {
            is_favorite: Some(is_favorite),
            ..Self::default()
        }
    }

    pub fn position(last_position: f64) -> Self {
        Self {
            last_position: Some(last_position),
            ..Self::default()
        }
    }

    /// Counters written when playback of a lecture starts
    pub fn play_started(play_count: u32, last_played: DateTime<Utc>) -> Self {
        Self {
            play_count: Some(play_count),
            last_played: Some(last_played),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// What was playing when the app last saved, and where
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastSession {
    pub lecture_id: LectureId,
    pub position: f64,
    /// Milliseconds since the Unix epoch on the wire
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl LastSession {
    pub fn new(lecture_id: LectureId, position: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            lecture_id,
            position,
            timestamp,
        }
    }

    /// Whether the session is recent enough to resume
    pub fn is_fresh(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now.signed_duration_since(self.timestamp) < window
    }
}
