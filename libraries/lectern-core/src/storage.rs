//! Storage contract for locally persisted user state

use crate::error::PersistenceResult;
use crate::types::{LastSession, LectureId, LectureState, LectureStateUpdate, Theme};
use async_trait::async_trait;
use std::collections::HashMap;

/// Client-local store for per-lecture state, the last session and the theme
///
/// Writes merge into what is already stored. Reads never fail: a missing or
/// unreadable store looks empty, and individual unreadable records are
/// skipped.
#[async_trait]
pub trait StateStore: Send + Sync {
    // ========================================================================
    // Lecture state
    // ========================================================================

    /// Merge a partial update into the stored record for `id`
    ///
    /// Fields left as `None` keep their stored value. A corrupt stored record
    /// is treated as empty and overwritten.
    async fn save(&self, id: &LectureId, update: LectureStateUpdate) -> PersistenceResult<()>;

    /// Load every persisted lecture record
    async fn load_all(&self) -> HashMap<LectureId, LectureState>;

    // ========================================================================
    // Session and settings
    // ========================================================================

    /// Overwrite the last-session slot
    async fn save_last_session(&self, session: &LastSession) -> PersistenceResult<()>;

    /// Read the last-session slot, if present and readable
    async fn load_last_session(&self) -> Option<LastSession>;

    /// Persist the color theme
    async fn save_theme(&self, theme: Theme) -> PersistenceResult<()>;

    /// Read the color theme, if one was saved
    async fn load_theme(&self) -> Option<Theme>;
}
