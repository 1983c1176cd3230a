//! Lectern Storage
//!
//! Local `SQLite` persistence for per-lecture user state, the last playback
//! session and the color theme.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: each slot owns its queries (`lecture_state`,
//!   `session`, `settings`)
//! - **Merge Writes**: lecture records are JSON documents updated field by field
//! - **Forgiving Reads**: unreadable records are skipped, never fatal
//! - **Fire-and-Forget**: `StateWriter` queues writes for a background task
//!
//! # Example
//!
//! ```rust,no_run
//! use lectern_core::{LectureId, LectureStateUpdate, StateStore};
//! use lectern_storage::{create_pool, run_migrations, SqliteStateStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://lectern.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = SqliteStateStore::new(pool);
//! store
//!     .save(&LectureId::new("lecture_20250828_001"), LectureStateUpdate::favorite(true))
//!     .await?;
//! let states = store.load_all().await;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;
mod memory;
mod writer;

// Vertical slices
pub mod lecture_state;
pub mod session;
pub mod settings;

pub use context::SqliteStateStore;
pub use error::{Result, StorageError};
pub use memory::MemoryStateStore;
pub use writer::{StateWrite, StateWriter};

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// Call once at startup before using the pool.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `sqlite://lectern.db`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Create a pool and bring its schema up to date
///
/// # Errors
///
/// Returns an error if the connection or migrations fail
pub async fn open(database_url: &str) -> Result<SqliteStateStore> {
    let pool = create_pool(database_url).await?;
    run_migrations(&pool).await?;
    Ok(SqliteStateStore::new(pool))
}
