//! In-memory `StateStore` for tests and throwaway sessions

use async_trait::async_trait;
use lectern_core::{
    LastSession, LectureId, LectureState, LectureStateUpdate, PersistenceResult, StateStore, Theme,
};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Slots {
    lectures: HashMap<LectureId, LectureState>,
    last_session: Option<LastSession>,
    theme: Option<Theme>,
}

/// Volatile store with the same merge semantics as the `SQLite` store
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    slots: RwLock<Slots>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing lecture records
    pub fn with_states(states: impl IntoIterator<Item = (LectureId, LectureState)>) -> Self {
        Self {
            slots: RwLock::new(Slots {
                lectures: states.into_iter().collect(),
                ..Slots::default()
            }),
        }
    }

    /// Current record for one lecture
    pub async fn get(&self, id: &LectureId) -> Option<LectureState> {
        self.slots.read().await.lectures.get(id).cloned()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn save(&self, id: &LectureId, update: LectureStateUpdate) -> PersistenceResult<()> {
        let mut slots = self.slots.write().await;
        slots.lectures.entry(id.clone()).or_default().apply(&update);
        Ok(())
    }

    async fn load_all(&self) -> HashMap<LectureId, LectureState> {
        self.slots.read().await.lectures.clone()
    }

    async fn save_last_session(&self, session: &LastSession) -> PersistenceResult<()> {
        self.slots.write().await.last_session = Some(session.clone());
        Ok(())
    }

    async fn load_last_session(&self) -> Option<LastSession> {
        self.slots.read().await.last_session.clone()
    }

    async fn save_theme(&self, theme: Theme) -> PersistenceResult<()> {
        self.slots.write().await.theme = Some(theme);
        Ok(())
    }

    async fn load_theme(&self) -> Option<Theme> {
        self.slots.read().await.theme
    }
}
