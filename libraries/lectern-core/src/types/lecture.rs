/// Lecture type: catalog metadata plus per-user playback state
use super::ids::LectureId;
use super::lecture_state::LectureState;
use crate::date;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One catalog entry and the user's state for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lecture {
    pub id: LectureId,

    /// Audio file name relative to the audio base
    #[serde(default)]
    pub filename: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub instructor: String,

    #[serde(default)]
    pub course: String,

    /// Human-readable original date, e.g. "28th Aug 2025"
    #[serde(default)]
    pub date: String,

    /// Seconds; replaced by the real value once audio metadata loads
    #[serde(default)]
    pub duration: f64,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub is_favorite: bool,

    #[serde(default)]
    pub play_count: u32,

    #[serde(default)]
    pub last_position: f64,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub last_played: Option<DateTime<Utc>>,

    /// Remote location used when no local filename is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,

    #[serde(
        rename = "based_on",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub based_on: Option<String>,

    /// Topic line shown under the title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(
        rename = "video_link",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub video_link: Option<String>,
}

impl Lecture {
    /// Create a lecture with the given id and title and everything else empty
    pub fn new(id: impl Into<LectureId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            filename: String::new(),
            title: title.into(),
            instructor: String::new(),
            course: String::new(),
            date: String::new(),
            duration: 0.0,
            tags: Vec::new(),
            description: String::new(),
            is_favorite: false,
            play_count: 0,
            last_position: 0.0,
            last_played: None,
            audio_url: None,
            based_on: None,
            key: None,
            video_link: None,
        }
    }

    /// Whether the duration is known
    pub fn has_duration(&self) -> bool {
        self.duration.is_finite() && self.duration > 0.0
    }

    /// Clamp a position into `[0, duration]`, or `[0, inf)` while the
    /// duration is unknown
    pub fn clamp_position(&self, position: f64) -> f64 {
        if !position.is_finite() || position <= 0.0 {
            return 0.0;
        }
        if self.has_duration() {
            position.min(self.duration)
        } else {
            position
        }
    }

    /// Partially played and more than 30 seconds from the end
    pub fn is_in_progress(&self) -> bool {
        self.last_position > 0.0 && self.last_position < self.duration - 30.0
    }

    /// Case-insensitive substring match over the searchable text fields
    ///
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        [&self.title, &self.instructor, &self.course, &self.description]
            .into_iter()
            .chain(self.tags.iter())
            .any(|field| field.to_lowercase().contains(needle))
    }

    /// Overwrite the user-state fields from a persisted record
    pub fn apply_state(&mut self, state: &LectureState) {
        self.is_favorite = state.is_favorite;
        self.play_count = state.play_count;
        self.last_played = state.last_played;
        self.last_position = self.clamp_position(state.last_position);
    }
}

/// Accept RFC 3339, `YYYY-MM-DD`, null, or anything else as absent
pub(crate) fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(date::parse_timestamp))
}
