mod ids;
mod lecture;
mod lecture_state;
mod playback;
mod query;
mod theme;

pub use ids::LectureId;
pub use lecture::Lecture;
pub use lecture_state::{LastSession, LectureState, LectureStateUpdate};
pub use playback::RepeatMode;
pub use query::{QueryState, Section, SortKey};
pub use theme::Theme;
