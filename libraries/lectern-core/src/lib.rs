//! Lectern Core
//!
//! Shared domain types, errors and the storage contract for the Lectern
//! lecture library and player.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Lecture`, `LectureState`, `QueryState`, `RepeatMode`, `Theme`
//! - **Storage Contract**: `StateStore`, implemented by `lectern-storage`
//! - **Error Handling**: `LecternError` plus the per-concern `LoadError`,
//!   `PlaybackError` and `PersistenceError`
//! - **Dates**: catalog date normalization and clock formatting
//!
//! # Example
//!
//! ```rust
//! use lectern_core::{Lecture, LectureState};
//!
//! let mut lecture = Lecture::new("lecture_20250828_001", "Introduction");
//! lecture.duration = 3240.0;
//! lecture.apply_state(&LectureState {
//!     is_favorite: true,
//!     play_count: 2,
//!     last_position: 5000.0,
//!     last_played: None,
//! });
//! assert_eq!(lecture.last_position, 3240.0);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod date;
pub mod error;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{
    LecternError, LoadError, PersistenceError, PersistenceResult, PlaybackError, Result,
};
pub use storage::StateStore;

pub use types::{
    LastSession, Lecture, LectureId, LectureState, LectureStateUpdate, QueryState, RepeatMode,
    Section, SortKey, Theme,
};
