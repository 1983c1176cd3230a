//! Key-value settings slots
//!
//! Values are stored as JSON text so each slot can hold any serde type.
//!
//! # Example
//!
//! ```rust,no_run
//! use lectern_storage::settings;
//! # async fn example(pool: &sqlx::SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
//! settings::set_setting(pool, settings::SETTING_THEME, &serde_json::json!("dark")).await?;
//! let theme = settings::get_setting(pool, settings::SETTING_THEME).await?;
//! # Ok(())
//! # }
//! ```

use crate::error::Result;
use sqlx::{Row, SqlitePool};

/// Color theme ("light" or "dark")
pub const SETTING_THEME: &str = "ui.theme";

/// Last playback session
pub const SETTING_LAST_SESSION: &str = "playback.last_session";

/// Get a single setting value
///
/// Returns `Ok(None)` if the key was never written.
///
/// # Errors
///
/// Returns an error if the query fails or the stored value is not JSON
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<serde_json::Value>> {
    let row = sqlx::query("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => {
            let raw: String = row.try_get("value")?;
            Ok(Some(serde_json::from_str(&raw)?))
        }
        None => Ok(None),
    }
}

/// Set a setting value, replacing any previous one
///
/// # Errors
///
/// Returns an error if the query fails
pub async fn set_setting(pool: &SqlitePool, key: &str, value: &serde_json::Value) -> Result<()> {
    let value_str = serde_json::to_string(value)?;
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO settings (key, value, updated_at)
         VALUES (?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
    )
    .bind(key)
    .bind(value_str)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete a setting
///
/// # Errors
///
/// Returns an error if the query fails
pub async fn delete_setting(pool: &SqlitePool, key: &str) -> Result<()> {
    sqlx::query("DELETE FROM settings WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;
    Ok(())
}
