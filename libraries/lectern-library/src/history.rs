//! Recently played lectures
//!
//! Bounded, most-recent-first list of lecture ids backing the "recent"
//! section.

use lectern_core::{Lecture, LectureId};
use std::collections::VecDeque;

/// Default number of lectures remembered
pub const DEFAULT_HISTORY_SIZE: usize = 50;

/// Playback history with bounded size
///
/// An id appears at most once; playing it again moves it to the front.
#[derive(Debug, Clone)]
pub struct RecentHistory {
    /// Most recent = front
    ids: VecDeque<LectureId>,
    max_size: usize,
}

impl RecentHistory {
    /// Create an empty history holding at most `max_size` ids
    pub fn new(max_size: usize) -> Self {
        Self {
            ids: VecDeque::with_capacity(max_size.min(DEFAULT_HISTORY_SIZE)),
            max_size,
        }
    }

    /// Seed from each lecture's `last_played`, most recent first
    pub fn from_lectures<'a>(lectures: impl IntoIterator<Item = &'a Lecture>, max_size: usize) -> Self {
        let mut played: Vec<&Lecture> = lectures
            .into_iter()
            .filter(|l| l.last_played.is_some())
            .collect();
        played.sort_by(|a, b| b.last_played.cmp(&a.last_played));

        Self {
            ids: played
                .into_iter()
                .take(max_size)
                .map(|l| l.id.clone())
                .collect(),
            max_size,
        }
    }

    /// Move `id` to the front, dropping the oldest entry if full
    pub fn record(&mut self, id: &LectureId) {
        self.ids.retain(|existing| existing != id);
        self.ids.push_front(id.clone());
        self.ids.truncate(self.max_size);
    }

    /// Ids, most recent first
    pub fn iter(&self) -> impl Iterator<Item = &LectureId> {
        self.ids.iter()
    }

    pub fn contains(&self, id: &LectureId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Set maximum history size
    ///
    /// If new size is smaller than current, oldest entries are discarded
    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;
        self.ids.truncate(max_size);
    }
}

impl Default for RecentHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_SIZE)
    }
}
