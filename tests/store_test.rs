//! Tests for the SQLite key-value store.

use gamerzo::{KeyValueStore, SqliteStore, StatsSnapshot, StoreErrorKind};
use tempfile::NamedTempFile;

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready store.
fn setup_test_store() -> (NamedTempFile, SqliteStore) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let store = SqliteStore::open(db_path).expect("Failed to open store");
    (db_file, store)
}

#[test]
fn test_get_missing_key() {
    let (_db, store) = setup_test_store();
    assert_eq!(store.get("nothing").expect("Get failed"), None);
}

#[test]
fn test_put_then_get() {
    let (_db, store) = setup_test_store();
    store.put("greeting", "hello".to_string()).expect("Put failed");
    assert_eq!(
        store.get("greeting").expect("Get failed").as_deref(),
        Some("hello")
    );
}

#[test]
fn test_put_replaces_value() {
    let (_db, store) = setup_test_store();
    store.put("k", "first".to_string()).expect("Put failed");
    store.put("k", "second".to_string()).expect("Put failed");

    assert_eq!(store.get("k").expect("Get failed").as_deref(), Some("second"));
    assert_eq!(store.keys().expect("Keys failed"), vec!["k".to_string()]);
}

#[test]
fn test_remove() {
    let (_db, store) = setup_test_store();
    store.put("k", "v".to_string()).expect("Put failed");

    assert!(store.remove("k").expect("Remove failed"));
    assert!(!store.remove("k").expect("Remove failed"));
    assert_eq!(store.get("k").expect("Get failed"), None);
}

#[test]
fn test_keys_sorted() {
    let (_db, store) = setup_test_store();
    for key in ["users", "gameStats:games", "gameStats"] {
        store.put(key, "[]".to_string()).expect("Put failed");
    }

    assert_eq!(
        store.keys().expect("Keys failed"),
        vec!["gameStats", "gameStats:games", "users"]
    );
}

#[test]
fn test_entry_has_timestamp() {
    let (_db, store) = setup_test_store();
    store.put("k", "v".to_string()).expect("Put failed");

    let entry = store.entry("k").expect("Entry failed").expect("Entry missing");
    assert_eq!(entry.key(), "k");
    assert_eq!(entry.value(), "v");
    assert!(store.entry("other").expect("Entry failed").is_none());
}

#[test]
fn test_json_helpers() {
    let (_db, store) = setup_test_store();
    let snapshot = StatsSnapshot::new(3, 1, 1, 1);
    store.put_json("gameStats", &snapshot).expect("Put failed");

    let raw = store.get("gameStats").expect("Get failed").expect("Missing");
    assert_eq!(raw, r#"{"totalGames":3,"xWins":1,"oWins":1,"draws":1}"#);

    let back: Option<StatsSnapshot> = store.get_json("gameStats").expect("Get failed");
    assert_eq!(back, Some(snapshot));
}

#[test]
fn test_malformed_json_is_error() {
    let (_db, store) = setup_test_store();
    store.put("gameStats", "not json".to_string()).expect("Put failed");

    let result: Result<Option<StatsSnapshot>, _> = store.get_json("gameStats");
    let err = result.expect_err("Malformed blob should fail");
    assert_eq!(err.kind, StoreErrorKind::Malformed);
}

#[test]
fn test_reopen_keeps_data() {
    let (db, store) = setup_test_store();
    store.put("k", "v".to_string()).expect("Put failed");

    let path = db.path().to_str().expect("Invalid path").to_string();
    let reopened = SqliteStore::open(path).expect("Reopen failed");
    assert_eq!(reopened.get("k").expect("Get failed").as_deref(), Some("v"));
}
