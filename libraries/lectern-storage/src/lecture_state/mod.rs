//! Per-lecture user state
//!
//! Each lecture's state is one JSON document keyed by lecture id. Writes are
//! merges: only the fields present in a `LectureStateUpdate` change.

use crate::error::Result;
use lectern_core::{LectureId, LectureState, LectureStateUpdate};
use sqlx::{Row, SqlitePool};

/// Get the stored state for one lecture
///
/// # Errors
///
/// Returns an error if the query fails or the stored document does not decode
pub async fn get(pool: &SqlitePool, id: &LectureId) -> Result<Option<LectureState>> {
    let row = sqlx::query("SELECT state FROM lecture_state WHERE lecture_id = ?")
        .bind(id.as_str())
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => {
            let raw: String = row.try_get("state")?;
            Ok(Some(serde_json::from_str(&raw)?))
        }
        None => Ok(None),
    }
}

/// Get every stored record, skipping documents that do not decode
///
/// # Errors
///
/// Returns an error only if the query itself fails
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<(LectureId, LectureState)>> {
    let rows = sqlx::query("SELECT lecture_id, state FROM lecture_state ORDER BY lecture_id")
        .fetch_all(pool)
        .await?;

    let mut states = Vec::with_capacity(rows.len());
    for row in rows {
        let id: String = row.try_get("lecture_id")?;
        let raw: String = row.try_get("state")?;
        match serde_json::from_str::<LectureState>(&raw) {
            Ok(state) => states.push((LectureId::new(id), state)),
            Err(e) => {
                tracing::warn!(lecture_id = %id, error = %e, "Skipping unreadable lecture state");
            }
        }
    }

    Ok(states)
}

/// Merge a partial update into the stored record and return the result
///
/// A stored document that does not decode is treated as empty and replaced.
///
/// # Errors
///
/// Returns an error if the database is unavailable
pub async fn merge(
    pool: &SqlitePool,
    id: &LectureId,
    update: &LectureStateUpdate,
) -> Result<LectureState> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query("SELECT state FROM lecture_state WHERE lecture_id = ?")
        .bind(id.as_str())
        .fetch_optional(&mut *tx)
        .await?;

    let mut state = match row {
        Some(row) => {
            let raw: String = row.try_get("state")?;
            serde_json::from_str::<LectureState>(&raw).unwrap_or_else(|e| {
                tracing::warn!(lecture_id = %id, error = %e, "Overwriting unreadable lecture state");
                LectureState::default()
            })
        }
        None => LectureState::default(),
    };
    state.apply(update);

    let state_json = serde_json::to_string(&state)?;
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO lecture_state (lecture_id, state, updated_at)
         VALUES (?, ?, ?)
         ON CONFLICT(lecture_id) DO UPDATE SET
            state = excluded.state,
            updated_at = excluded.updated_at",
    )
    .bind(id.as_str())
    .bind(state_json)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(state)
}

/// Remove the stored record for one lecture
///
/// # Errors
///
/// Returns an error if the query fails
pub async fn delete(pool: &SqlitePool, id: &LectureId) -> Result<()> {
    sqlx::query("DELETE FROM lecture_state WHERE lecture_id = ?")
        .bind(id.as_str())
        .execute(pool)
        .await?;
    Ok(())
}
