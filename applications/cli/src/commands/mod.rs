//! Subcommand implementations
//!
//! Every command works against a `Context`: the validated config plus the
//! opened state store. Output goes to stdout; diagnostics go through tracing.

pub mod catalog;
pub mod library;
pub mod session;

use crate::config::AppConfig;
use crate::error::Result;
use lectern_core::StateStore;
use lectern_library::Library;
use lectern_playback::{PlaybackController, RecordingOutput};
use lectern_storage::{SqliteStateStore, StateWriter};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub struct Context {
    pub config: AppConfig,
    pub store: Arc<SqliteStateStore>,
}

impl Context {
    /// Open the state database named by the config
    pub async fn open(config: AppConfig) -> Result<Self> {
        if let Some(path) = sqlite_file_path(&config.storage.database_url) {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let store = lectern_storage::open(&config.storage.database_url).await?;
        info!(database_url = %config.storage.database_url, "State store opened");
        Ok(Self {
            config,
            store: Arc::new(store),
        })
    }

    /// Load the library, falling back to an empty one when the catalog is unavailable
    pub async fn library(&self) -> Library {
        let source = self.config.catalog_source();
        match Library::load(&source, self.store.as_ref()).await {
            Ok(library) => {
                if library.duplicates_dropped() > 0 {
                    warn!(
                        dropped = library.duplicates_dropped(),
                        "Catalog contains duplicate lecture ids"
                    );
                }
                library
            }
            Err(e) => {
                warn!(source = %source, error = %e, "Catalog unavailable");
                eprintln!("Could not load catalog from {source}: {e}");
                Library::empty()
            }
        }
    }

    /// Controller over `library` whose writes land in the state store
    ///
    /// Drop the controller and await the handle to flush pending writes.
    pub fn controller(&self, library: Library) -> (PlaybackController<RecordingOutput>, JoinHandle<()>) {
        let store: Arc<dyn StateStore> = self.store.clone();
        let (writer, handle) = StateWriter::spawn(store);
        let controller = PlaybackController::new(
            library,
            RecordingOutput::new(),
            writer,
            self.config.playback_config(),
        );
        (controller, handle)
    }
}

/// Wait for the writer task once the controller is gone
pub async fn flush(controller: PlaybackController<RecordingOutput>, handle: JoinHandle<()>) {
    drop(controller);
    if let Err(e) = handle.await {
        warn!(error = %e, "State writer task failed");
    }
}

/// Filesystem path of a `sqlite://` URL, if it names a file
fn sqlite_file_path(url: &str) -> Option<std::path::PathBuf> {
    let rest = url.strip_prefix("sqlite://").or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Some(std::path::PathBuf::from(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn sqlite_paths() {
        assert_eq!(
            sqlite_file_path("sqlite://./data/lectern.db"),
            Some(PathBuf::from("./data/lectern.db"))
        );
        assert_eq!(
            sqlite_file_path("sqlite:state.db?mode=rwc"),
            Some(PathBuf::from("state.db"))
        );
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("postgres://db"), None);
    }
}
