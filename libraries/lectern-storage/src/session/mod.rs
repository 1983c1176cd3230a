//! Last-session slot and theme, both stored as settings

use crate::error::Result;
use crate::settings::{self, SETTING_LAST_SESSION, SETTING_THEME};
use lectern_core::{LastSession, Theme};
use sqlx::SqlitePool;

/// Read the last session
///
/// # Errors
///
/// Returns an error if the query fails or the stored value does not decode
pub async fn get_last_session(pool: &SqlitePool) -> Result<Option<LastSession>> {
    match settings::get_setting(pool, SETTING_LAST_SESSION).await? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Overwrite the last session
///
/// # Errors
///
/// Returns an error if the query fails
pub async fn set_last_session(pool: &SqlitePool, session: &LastSession) -> Result<()> {
    let value = serde_json::to_value(session)?;
    settings::set_setting(pool, SETTING_LAST_SESSION, &value).await
}

/// Read the theme; unknown values read as unset
///
/// # Errors
///
/// Returns an error if the query fails
pub async fn get_theme(pool: &SqlitePool) -> Result<Option<Theme>> {
    let value = settings::get_setting(pool, SETTING_THEME).await?;
    Ok(value
        .as_ref()
        .and_then(|v| v.as_str())
        .and_then(Theme::from_str))
}

/// Persist the theme
///
/// # Errors
///
/// Returns an error if the query fails
pub async fn set_theme(pool: &SqlitePool, theme: Theme) -> Result<()> {
    settings::set_setting(pool, SETTING_THEME, &serde_json::json!(theme.as_str())).await
}
