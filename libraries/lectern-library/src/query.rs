//! Library views: section filter, then search, then a stable sort
//!
//! `view` is a pure function of the library and the query. It borrows
//! lectures and never mutates anything, so callers recompute it whenever
//! the library or the query changes.

use lectern_core::date::normalize_date;
use lectern_core::{Lecture, QueryState, Section, SortKey};
use std::cmp::{Ordering, Reverse};

/// Lectures visible for `query`, in display order
pub fn view<'a>(library: &'a crate::Library, query: &QueryState) -> Vec<&'a Lecture> {
    let mut lectures: Vec<&Lecture> = match query.section {
        Section::All => library.lectures().iter().collect(),
        Section::Recent => library.recent().collect(),
        Section::Favorites => library
            .lectures()
            .iter()
            .filter(|l| library.is_favorite(&l.id))
            .collect(),
        Section::Continue => library
            .lectures()
            .iter()
            .filter(|l| l.is_in_progress())
            .collect(),
    };

    let needle = query.needle();
    if !needle.is_empty() {
        lectures.retain(|l| l.matches(&needle));
    }

    sort_lectures(&mut lectures, query.sort);
    lectures
}

/// Stable sort; equal keys keep their incoming order
pub fn sort_lectures(lectures: &mut [&Lecture], key: SortKey) {
    match key {
        SortKey::Title => lectures.sort_by(|a, b| collate(&a.title, &b.title)),
        SortKey::Instructor => lectures.sort_by(|a, b| collate(&a.instructor, &b.instructor)),
        SortKey::Duration => lectures.sort_by(|a, b| b.duration.total_cmp(&a.duration)),
        SortKey::Date => lectures.sort_by_cached_key(|l| Reverse(normalize_date(&l.date))),
    }
}

/// Case-insensitive text order, falling back to code points
fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
