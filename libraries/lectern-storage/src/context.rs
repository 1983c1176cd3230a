use crate::{lecture_state, session};
use async_trait::async_trait;
use lectern_core::{
    LastSession, LectureId, LectureState, LectureStateUpdate, PersistenceResult, StateStore, Theme,
};
use sqlx::SqlitePool;
use std::collections::HashMap;

/// `StateStore` backed by a local `SQLite` database
pub struct SqliteStateStore {
    pool: SqlitePool,
}

impl SqliteStateStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl StateStore for SqliteStateStore {
    async fn save(&self, id: &LectureId, update: LectureStateUpdate) -> PersistenceResult<()> {
        lecture_state::merge(&self.pool, id, &update).await?;
        Ok(())
    }

    async fn load_all(&self) -> HashMap<LectureId, LectureState> {
        match lecture_state::get_all(&self.pool).await {
            Ok(states) => states.into_iter().collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Lecture state unavailable, starting empty");
                HashMap::new()
            }
        }
    }

    async fn save_last_session(&self, last: &LastSession) -> PersistenceResult<()> {
        session::set_last_session(&self.pool, last).await?;
        Ok(())
    }

    async fn load_last_session(&self) -> Option<LastSession> {
        session::get_last_session(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Ignoring unreadable last session");
                None
            })
    }

    async fn save_theme(&self, theme: Theme) -> PersistenceResult<()> {
        session::set_theme(&self.pool, theme).await?;
        Ok(())
    }

    async fn load_theme(&self) -> Option<Theme> {
        session::get_theme(&self.pool).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Ignoring unreadable theme");
            None
        })
    }
}
