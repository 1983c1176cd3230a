
use chrono::{Duration, TimeZone, Utc};
use lectern_core::{LastSession, LectureId, LectureStateUpdate, PersistenceError, StateStore, Theme};
use lectern_storage::{lecture_state, settings, StateWriter};
use std::sync::Arc;
use test_helpers::{insert_raw_setting, insert_raw_state, TestDb};

// ===== Lecture state =====

#[tokio::test]
async fn test_save_merges_into_existing_record() {
    let db = TestDb::new().await;
    let store = db.store();
    let id = LectureId::new("lecture_20250828_001");
    let played = Utc.with_ymd_and_hms(2025, 8, 28, 9, 0, 0).unwrap();

    store
        .save(&id, LectureStateUpdate::play_started(3, played))
        .await
        .unwrap();
    store
        .save(&id, LectureStateUpdate::position(120.5))
        .await
        .unwrap();
    store
        .save(&id, LectureStateUpdate::favorite(true))
        .await
        .unwrap();

    let state = lecture_state::get(db.pool(), &id).await.unwrap().unwrap();
    assert!(state.is_favorite);
    assert_eq!(state.play_count, 3);
    assert_eq!(state.last_position, 120.5);
    assert_eq!(state.last_played, Some(played));
}

#[tokio::test]
async fn test_load_all_returns_every_record() {
    let db = TestDb::new().await;
    let store = db.store();

    for i in 0..5 {
        let id = LectureId::new(format!("lecture_{i}"));
        store
            .save(&id, LectureStateUpdate::position(f64::from(i) * 10.0))
            .await
            .unwrap();
    }

    let all = store.load_all().await;
    assert_eq!(all.len(), 5);
    assert_eq!(all[&LectureId::new("lecture_3")].last_position, 30.0);
}

#[tokio::test]
async fn test_load_all_skips_corrupt_rows() {
    let db = TestDb::new().await;
    insert_raw_state(db.pool(), "good", r#"{"isFavorite": true}"#).await;
    insert_raw_state(db.pool(), "bad", "{not json").await;

    let all = db.store().load_all().await;
    assert_eq!(all.len(), 1);
    assert!(all[&LectureId::new("good")].is_favorite);
}

#[tokio::test]
async fn test_partial_record_reads_missing_fields_as_zero() {
    let db = TestDb::new().await;
    insert_raw_state(db.pool(), "partial", r#"{"playCount": 7}"#).await;

    let all = db.store().load_all().await;
    let state = &all[&LectureId::new("partial")];
    assert_eq!(state.play_count, 7);
    assert!(!state.is_favorite);
    assert_eq!(state.last_position, 0.0);
}

#[tokio::test]
async fn test_save_overwrites_corrupt_record() {
    let db = TestDb::new().await;
    insert_raw_state(db.pool(), "broken", "[[[").await;
    let id = LectureId::new("broken");

    db.store()
        .save(&id, LectureStateUpdate::favorite(true))
        .await
        .unwrap();

    let state = lecture_state::get(db.pool(), &id).await.unwrap().unwrap();
    assert!(state.is_favorite);
    assert_eq!(state.play_count, 0);
}

#[tokio::test]
async fn test_delete_removes_record() {
    let db = TestDb::new().await;
    let id = LectureId::new("gone");
    db.store()
        .save(&id, LectureStateUpdate::favorite(true))
        .await
        .unwrap();

    lecture_state::delete(db.pool(), &id).await.unwrap();

    assert!(lecture_state::get(db.pool(), &id).await.unwrap().is_none());
}

// ===== Last session and theme =====

#[tokio::test]
async fn test_last_session_round_trip() {
    let db = TestDb::new().await;
    let store = db.store();
    let now = Utc.with_ymd_and_hms(2025, 8, 28, 12, 0, 0).unwrap();
    let session = LastSession::new(LectureId::new("a"), 321.0, now);

    store.save_last_session(&session).await.unwrap();

    let loaded = store.load_last_session().await.unwrap();
    assert_eq!(loaded, session);
    assert!(loaded.is_fresh(now + Duration::hours(1), Duration::hours(24)));
}

#[tokio::test]
async fn test_last_session_overwrites_slot() {
    let db = TestDb::new().await;
    let store = db.store();
    let now = Utc::now();

    store
        .save_last_session(&LastSession::new(LectureId::new("a"), 1.0, now))
        .await
        .unwrap();
    store
        .save_last_session(&LastSession::new(LectureId::new("b"), 2.0, now))
        .await
        .unwrap();

    let loaded = store.load_last_session().await.unwrap();
    assert_eq!(loaded.lecture_id, LectureId::new("b"));
}

#[tokio::test]
async fn test_corrupt_last_session_reads_as_none() {
    let db = TestDb::new().await;
    insert_raw_setting(db.pool(), settings::SETTING_LAST_SESSION, r#"{"lectureId": 5}"#).await;

    assert!(db.store().load_last_session().await.is_none());
}

#[tokio::test]
async fn test_theme_round_trip() {
    let db = TestDb::new().await;
    let store = db.store();

    assert!(store.load_theme().await.is_none());
    store.save_theme(Theme::Dark).await.unwrap();
    assert_eq!(store.load_theme().await, Some(Theme::Dark));
    store.save_theme(Theme::Light).await.unwrap();
    assert_eq!(store.load_theme().await, Some(Theme::Light));
}

#[tokio::test]
async fn test_unknown_theme_reads_as_none() {
    let db = TestDb::new().await;
    insert_raw_setting(db.pool(), settings::SETTING_THEME, r#""ocean""#).await;

    assert!(db.store().load_theme().await.is_none());
}

// ===== Durability and failure =====

#[tokio::test]
async fn test_state_survives_reopen() {
    let db = TestDb::new().await;
    let id = LectureId::new("durable");
    db.store()
        .save(&id, LectureStateUpdate::position(77.0))
        .await
        .unwrap();

    let reopened = lectern_storage::open(&db.url).await.unwrap();
    let all = reopened.load_all().await;
    assert_eq!(all[&id].last_position, 77.0);
}

#[tokio::test]
async fn test_closed_pool_reports_unavailable() {
    let db = TestDb::new().await;
    let store = db.store();
    db.pool().close().await;

    let err = store
        .save(&LectureId::new("a"), LectureStateUpdate::favorite(true))
        .await
        .unwrap_err();
    assert!(matches!(err, PersistenceError::Unavailable(_)));

    assert!(store.load_all().await.is_empty());
    assert!(store.load_last_session().await.is_none());
}

#[tokio::test]
async fn test_writer_persists_to_sqlite() {
    let db = TestDb::new().await;
    let store = Arc::new(db.store());
    let (writer, handle) = StateWriter::spawn(store.clone());
    let id = LectureId::new("queued");

    writer.save(&id, LectureStateUpdate::position(5.0));
    writer.save(&id, LectureStateUpdate::position(15.0));
    writer.save_last_session(LastSession::new(id.clone(), 15.0, Utc::now()));
    drop(writer);
    handle.await.unwrap();

    assert_eq!(store.load_all().await[&id].last_position, 15.0);
    assert_eq!(store.load_last_session().await.unwrap().position, 15.0);
}
