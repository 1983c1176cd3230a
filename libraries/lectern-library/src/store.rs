//! The lecture library: catalog entries merged with persisted user state
//!
//! `Library` owns every `Lecture`, keeps the favorites set in step with each
//! lecture's flag, and tracks recently played lectures. It is populated once
//! at startup and mutated in place by playback.

use crate::catalog::CatalogSource;
use crate::history::{RecentHistory, DEFAULT_HISTORY_SIZE};
use chrono::{DateTime, Utc};
use lectern_core::{Lecture, LectureId, LectureState, LectureStateUpdate, LoadError, StateStore};
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

/// In-memory lecture collection in catalog order
#[derive(Debug, Clone, Default)]
pub struct Library {
    lectures: Vec<Lecture>,
    index: HashMap<LectureId, usize>,
    favorites: HashSet<LectureId>,
    history: RecentHistory,
    duplicates_dropped: usize,
}

impl Library {
    /// Library with no lectures, used when the catalog cannot be loaded
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fetch the catalog and merge persisted user state into it
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the catalog is unreachable or malformed.
    /// Persisted state problems are not errors; unreadable state is skipped.
    pub async fn load(source: &CatalogSource, store: &dyn StateStore) -> Result<Self, LoadError> {
        let document = source.fetch().await?;
        let persisted = store.load_all().await;
        let library = Self::with_state(document.lectures, &persisted);

        info!(
            source = %source,
            lectures = library.len(),
            persisted = persisted.len(),
            favorites = library.favorites.len(),
            "Library loaded"
        );
        Ok(library)
    }

    /// Build from catalog lectures as-is
    pub fn from_lectures(lectures: Vec<Lecture>) -> Self {
        Self::with_state(lectures, &HashMap::new())
    }

    /// Build from catalog lectures, overwriting user-state fields from
    /// `persisted` where a record exists
    pub fn with_state(lectures: Vec<Lecture>, persisted: &HashMap<LectureId, LectureState>) -> Self {
        let mut kept = Vec::with_capacity(lectures.len());
        let mut index = HashMap::with_capacity(lectures.len());
        let mut duplicates_dropped = 0;

        for mut lecture in lectures {
            if index.contains_key(&lecture.id) {
                warn!(lecture_id = %lecture.id, "Dropping duplicate lecture id");
                duplicates_dropped += 1;
                continue;
            }

            match persisted.get(&lecture.id) {
                Some(state) => lecture.apply_state(state),
                None => lecture.last_position = lecture.clamp_position(lecture.last_position),
            }

            index.insert(lecture.id.clone(), kept.len());
            kept.push(lecture);
        }

        let favorites = kept
            .iter()
            .filter(|l| l.is_favorite)
            .map(|l| l.id.clone())
            .collect();
        let history = RecentHistory::from_lectures(&kept, DEFAULT_HISTORY_SIZE);

        Self {
            lectures: kept,
            index,
            favorites,
            history,
            duplicates_dropped,
        }
    }

    // ===== Read access =====

    /// All lectures in catalog order
    pub fn lectures(&self) -> &[Lecture] {
        &self.lectures
    }

    pub fn len(&self) -> usize {
        self.lectures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lectures.is_empty()
    }

    pub fn get(&self, id: &LectureId) -> Option<&Lecture> {
        self.index.get(id).map(|&i| &self.lectures[i])
    }

    /// Position in catalog order
    pub fn index_of(&self, id: &LectureId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Lecture at a catalog position
    pub fn at(&self, index: usize) -> Option<&Lecture> {
        self.lectures.get(index)
    }

    pub fn favorites(&self) -> &HashSet<LectureId> {
        &self.favorites
    }

    pub fn is_favorite(&self, id: &LectureId) -> bool {
        self.favorites.contains(id)
    }

    pub fn history(&self) -> &RecentHistory {
        &self.history
    }

    /// Recently played lectures, most recent first
    pub fn recent(&self) -> impl Iterator<Item = &Lecture> {
        self.history.iter().filter_map(|id| self.get(id))
    }

    /// How many catalog entries were dropped for reusing an earlier id
    pub fn duplicates_dropped(&self) -> usize {
        self.duplicates_dropped
    }

    // ===== Mutation =====

    /// Change how many lectures the recent history keeps
    pub fn set_history_size(&mut self, size: usize) {
        self.history.set_max_size(size);
    }

    /// Flip a lecture's favorite flag and set membership together
    ///
    /// Returns the new flag, or `None` for an unknown id.
    pub fn toggle_favorite(&mut self, id: &LectureId) -> Option<bool> {
        let i = *self.index.get(id)?;
        let lecture = &mut self.lectures[i];
        lecture.is_favorite = !lecture.is_favorite;

        if lecture.is_favorite {
            self.favorites.insert(id.clone());
        } else {
            self.favorites.remove(id);
        }
        Some(lecture.is_favorite)
    }

    /// Count a play, stamp `last_played` and move the lecture to the front of
    /// the history
    ///
    /// Returns the fields to persist, or `None` for an unknown id.
    pub fn record_play_start(
        &mut self,
        id: &LectureId,
        now: DateTime<Utc>,
    ) -> Option<LectureStateUpdate> {
        let i = *self.index.get(id)?;
        let lecture = &mut self.lectures[i];
        lecture.play_count = lecture.play_count.saturating_add(1);
        lecture.last_played = Some(now);
        let update = LectureStateUpdate::play_started(lecture.play_count, now);

        self.history.record(id);
        Some(update)
    }

    /// Store a playback position, clamped to the lecture's duration
    ///
    /// Returns the stored value, or `None` for an unknown id.
    pub fn set_position(&mut self, id: &LectureId, position: f64) -> Option<f64> {
        let i = *self.index.get(id)?;
        let lecture = &mut self.lectures[i];
        lecture.last_position = lecture.clamp_position(position);
        Some(lecture.last_position)
    }

    /// Replace the catalog duration with the real one and re-clamp the position
    pub fn set_duration(&mut self, id: &LectureId, duration: f64) -> bool {
        if !duration.is_finite() || duration <= 0.0 {
            return false;
        }
        let Some(&i) = self.index.get(id) else {
            return false;
        };
        let lecture = &mut self.lectures[i];
        lecture.duration = duration;
        lecture.last_position = lecture.clamp_position(lecture.last_position);
        true
    }
}
