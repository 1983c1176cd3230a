//! Library loading from every catalog source, merged with persisted state.
//!
//! URL sources run against a wiremock server.

use lectern_core::{LectureId, LectureState, LectureStateUpdate, LoadError, StateStore};
use lectern_library::{CatalogSource, Library};
use lectern_storage::MemoryStateStore;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CATALOG: &str = r#"{
    "lectures": [
        {"id": "a", "filename": "a.mp3", "title": "Alpha", "date": "28th Aug 2025", "duration": 600,
         "isFavorite": true, "playCount": 4, "lastPosition": 100},
        {"id": "b", "filename": "b.mp3", "title": "Beta", "date": "27th Aug 2025", "duration": 300},
        {"id": "a", "filename": "dup.mp3", "title": "Duplicate", "duration": 1}
    ]
}"#;

// =============================================================================
// Bundled and file sources
// =============================================================================

#[tokio::test]
async fn test_bundled_catalog_loads() {
    let store = MemoryStateStore::new();
    let library = Library::load(&CatalogSource::Bundled, &store).await.unwrap();

    assert_eq!(library.len(), 5);
    // Two sample lectures ship as favorites
    assert_eq!(library.favorites().len(), 2);
    let recent: Vec<_> = library.recent().map(|l| l.id.as_str()).collect();
    assert_eq!(recent[0], "lecture_20250825_001");
}

#[tokio::test]
async fn test_file_catalog_with_persisted_state() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("lectures.json");
    tokio::fs::write(&file, CATALOG).await.unwrap();

    let store = MemoryStateStore::with_states([(
        LectureId::new("a"),
        LectureState {
            is_favorite: false,
            play_count: 9,
            last_position: 250.0,
            last_played: None,
        },
    )]);

    let library = Library::load(&CatalogSource::File(file), &store).await.unwrap();

    assert_eq!(library.len(), 2);
    assert_eq!(library.duplicates_dropped(), 1);
    let a = library.get(&LectureId::new("a")).unwrap();
    assert_eq!(a.title, "Alpha");
    assert!(!a.is_favorite);
    assert_eq!(a.play_count, 9);
    assert_eq!(a.last_position, 250.0);
    assert!(library.favorites().is_empty());
}

#[tokio::test]
async fn test_missing_file_is_unreachable() {
    let store = MemoryStateStore::new();
    let source = CatalogSource::File("/definitely/not/here.json".into());

    let err = Library::load(&source, &store).await.unwrap_err();
    assert!(matches!(err, LoadError::Unreachable(_)));
}

#[tokio::test]
async fn test_state_written_then_reloaded() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("lectures.json");
    tokio::fs::write(&file, CATALOG).await.unwrap();
    let store = MemoryStateStore::new();
    store
        .save(&LectureId::new("b"), LectureStateUpdate::favorite(true))
        .await
        .unwrap();

    let library = Library::load(&CatalogSource::File(file), &store).await.unwrap();

    assert!(library.is_favorite(&LectureId::new("b")));
    // "a" has no stored record so its catalog values stand
    assert!(library.is_favorite(&LectureId::new("a")));
}

// =============================================================================
// URL source
// =============================================================================

#[tokio::test]
async fn test_url_catalog_loads() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lectures.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CATALOG))
        .mount(&server)
        .await;

    let source = CatalogSource::Url(format!("{}/lectures.json", server.uri()));
    let library = Library::load(&source, &MemoryStateStore::new()).await.unwrap();

    assert_eq!(library.len(), 2);
}

#[tokio::test]
async fn test_url_error_status_is_unreachable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lectures.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let source = CatalogSource::Url(format!("{}/lectures.json", server.uri()));
    let err = Library::load(&source, &MemoryStateStore::new()).await.unwrap_err();

    match err {
        LoadError::Unreachable(msg) => assert!(msg.contains("404")),
        other => panic!("Expected Unreachable, got {other:?}"),
    }
}

#[tokio::test]
async fn test_url_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lectures.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let source = CatalogSource::Url(format!("{}/lectures.json", server.uri()));
    let err = Library::load(&source, &MemoryStateStore::new()).await.unwrap_err();

    assert!(matches!(err, LoadError::Malformed(_)));
}

#[tokio::test]
async fn test_unreachable_host() {
    // Port 9 (discard) on localhost is not expected to serve HTTP
    let source = CatalogSource::Url("http://127.0.0.1:9/lectures.json".to_string());
    let err = Library::load(&source, &MemoryStateStore::new()).await.unwrap_err();

    assert!(matches!(err, LoadError::Unreachable(_)));
}
