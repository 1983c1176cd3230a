//! Fire-and-forget persistence
//!
//! The playback controller never awaits a write. It pushes `StateWrite`s
//! into an unbounded channel and a background task applies them to a
//! `StateStore` in order. Failed writes are logged and dropped.

use lectern_core::{LastSession, LectureId, LectureStateUpdate, StateStore, Theme};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// One queued write
#[derive(Debug, Clone, PartialEq)]
pub enum StateWrite {
    Lecture {
        id: LectureId,
        update: LectureStateUpdate,
    },
    LastSession(LastSession),
    Theme(Theme),
}

/// Sending half of the persistence queue
#[derive(Debug, Clone)]
pub struct StateWriter {
    tx: mpsc::UnboundedSender<StateWrite>,
}

impl StateWriter {
    /// Create a writer and the receiver it feeds, without spawning anything
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<StateWrite>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Create a writer whose writes are applied to `store` by a spawned task
    ///
    /// The task ends once every `StateWriter` clone has been dropped and the
    /// queue is drained; await the handle to flush on shutdown.
    pub fn spawn(store: Arc<dyn StateStore>) -> (Self, JoinHandle<()>) {
        let (writer, rx) = Self::channel();
        let handle = tokio::spawn(run(store, rx));
        (writer, handle)
    }

    pub fn save(&self, id: &LectureId, update: LectureStateUpdate) {
        if update.is_empty() {
            return;
        }
        self.send(StateWrite::Lecture {
            id: id.clone(),
            update,
        });
    }

    pub fn save_last_session(&self, session: LastSession) {
        self.send(StateWrite::LastSession(session));
    }

    pub fn save_theme(&self, theme: Theme) {
        self.send(StateWrite::Theme(theme));
    }

    fn send(&self, write: StateWrite) {
        if self.tx.send(write).is_err() {
            warn!("State writer closed, dropping write");
        }
    }
}

/// Apply queued writes until the channel closes
pub async fn run(store: Arc<dyn StateStore>, mut rx: mpsc::UnboundedReceiver<StateWrite>) {
    while let Some(write) = rx.recv().await {
        let result = match &write {
            StateWrite::Lecture { id, update } => store.save(id, update.clone()).await,
            StateWrite::LastSession(session) => store.save_last_session(session).await,
            StateWrite::Theme(theme) => store.save_theme(*theme).await,
        };

        if let Err(e) = result {
            warn!(error = %e, write = ?write, "Failed to persist state");
        }
    }
    debug!("State writer stopped");
}
