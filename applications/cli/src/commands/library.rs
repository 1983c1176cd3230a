//! Browsing commands: list, history, favorite

use super::{flush, Context};
use crate::error::{CliError, Result};
use lectern_core::date::format_time;
use lectern_core::{Lecture, LectureId, QueryState, Section};
use lectern_library::{query, Library};
use std::fmt::Write as _;

/// Print the lectures visible for `query`
pub async fn list(ctx: &Context, query: &QueryState) -> Result<()> {
    let library = ctx.library().await;
    let lectures = query::view(&library, query);

    if lectures.is_empty() {
        println!("{}", empty_message(query));
        return Ok(());
    }

    for lecture in &lectures {
        println!("{}", format_row(lecture));
    }
    println!("\n{} of {} lectures", lectures.len(), library.len());
    Ok(())
}

/// Print recently played lectures, most recent first
pub async fn history(ctx: &Context, limit: Option<usize>) -> Result<()> {
    let library = ctx.library().await;
    let limit = limit.unwrap_or(usize::MAX);

    let mut printed = 0;
    for lecture in library.recent().take(limit) {
        let played = lecture
            .last_played
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!("{played:<16}  {}", format_row(lecture));
        printed += 1;
    }

    if printed == 0 {
        println!("No lectures played yet.");
    }
    Ok(())
}

/// Flip a lecture's favorite flag
pub async fn favorite(ctx: &Context, id: &str) -> Result<()> {
    let library = ctx.library().await;
    let id = LectureId::new(id);
    let title = lecture_title(&library, &id)?;

    let (mut controller, handle) = ctx.controller(library);
    let is_favorite = controller.toggle_favorite(&id)?;
    flush(controller, handle).await;

    if is_favorite {
        println!("Added \"{title}\" to favorites");
    } else {
        println!("Removed \"{title}\" from favorites");
    }
    Ok(())
}

fn lecture_title(library: &Library, id: &LectureId) -> Result<String> {
    library
        .get(id)
        .map(|l| l.title.clone())
        .ok_or_else(|| CliError::NotFound(id.to_string()))
}

/// One line per lecture: favorite marker, title, instructor, length, progress
pub fn format_row(lecture: &Lecture) -> String {
    let mut row = String::new();
    row.push(if lecture.is_favorite { '*' } else { ' ' });
    let _ = write!(row, " {}", lecture.title);
    if !lecture.instructor.is_empty() {
        let _ = write!(row, " | {}", lecture.instructor);
    }
    if !lecture.course.is_empty() {
        let _ = write!(row, " | {}", lecture.course);
    }
    let _ = write!(row, " | {}", format_time(lecture.duration));
    if lecture.last_position > 0.0 {
        let _ = write!(row, " (at {})", format_time(lecture.last_position));
    }
    let _ = write!(row, "  [{}]", lecture.id);
    row
}

/// What to show when a view is empty
pub fn empty_message(query: &QueryState) -> String {
    if !query.needle().is_empty() {
        return format!("No lectures match \"{}\".", query.search.trim());
    }
    match query.section {
        Section::All => "The catalog is empty.".to_string(),
        Section::Recent => "No lectures played yet.".to_string(),
        Section::Favorites => "No favorite lectures yet.".to_string(),
        Section::Continue => "Nothing in progress.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_core::SortKey;

    fn create_test_lecture() -> Lecture {
        let mut lecture = Lecture::new("lecture_1", "Foundations");
        lecture.instructor = "Dr. Rao".to_string();
        lecture.duration = 3240.0;
        lecture
    }

    #[test]
    fn row_shows_core_fields() {
        let row = format_row(&create_test_lecture());
        assert!(row.starts_with("  Foundations | Dr. Rao | 54:00"));
        assert!(row.ends_with("[lecture_1]"));
    }

    #[test]
    fn row_marks_favorites_and_progress() {
        let mut lecture = create_test_lecture();
        lecture.is_favorite = true;
        lecture.last_position = 90.0;

        let row = format_row(&lecture);
        assert!(row.starts_with('*'));
        assert!(row.contains("(at 1:30)"));
    }

    #[test]
    fn empty_messages() {
        let search = QueryState::new(Section::All, "  quantum ", SortKey::Date);
        assert_eq!(empty_message(&search), "No lectures match \"quantum\".");

        let favorites = QueryState::new(Section::Favorites, "", SortKey::Date);
        assert_eq!(empty_message(&favorites), "No favorite lectures yet.");
    }
}
