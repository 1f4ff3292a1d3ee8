//! Tests for TableEngine
//!
//! These tests verify:
//! - Opening existing, missing and corrupt table files
//! - Select with loose matching
//! - Insert/update/delete semantics on the in-memory array
//! - Write-back on close and on drop

use std::fs;
use std::path::PathBuf;

use jsontable::{Record, TableEngine, TableError};
use serde_json::{json, Value};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn rec(value: Value) -> Record {
    value.as_object().unwrap().clone()
}

fn setup_table(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("people.json");
    fs::write(&path, content).unwrap();
    (temp_dir, path)
}

fn people() -> (TempDir, PathBuf) {
    setup_table(
        r#"[
            {"ID": "0", "Name": "Hans", "Age": "12"},
            {"ID": "1", "Name": "Karl", "Age": "15"},
            {"ID": "2", "Name": "Poidl", "Age": "14"}
        ]"#,
    )
}

// =============================================================================
// Open / Create Tests
// =============================================================================

#[test]
fn test_open_missing_without_create_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing.json");

    let err = TableEngine::open(&path, false).unwrap_err();

    assert!(matches!(err, TableError::NotFound(p) if p == path));
    assert!(!path.exists());
}

#[test]
fn test_open_missing_with_create_gives_empty_table() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("fresh.json");

    let engine = TableEngine::open(&path, true).unwrap();

    assert!(path.exists());
    assert!(engine.is_empty());
    assert!(engine.select_all().is_empty());

    engine.close().unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
}

#[test]
fn test_open_empty_file_is_empty_table() {
    let (_temp, path) = setup_table("");

    let engine = TableEngine::open(&path, false).unwrap();

    assert_eq!(engine.len(), 0);
}

#[test]
fn test_open_reads_all_records() {
    let (_temp, path) = people();

    let engine = TableEngine::open(&path, false).unwrap();

    assert_eq!(engine.len(), 3);
    assert_eq!(engine.path(), path.as_path());
    assert_eq!(engine.records()[1]["Name"], json!("Karl"));
}

#[test]
fn test_open_invalid_json_is_corrupt() {
    let (_temp, path) = setup_table("this is not json");

    let err = TableEngine::open(&path, false).unwrap_err();

    assert!(matches!(err, TableError::CorruptData { .. }));
}

#[test]
fn test_open_non_array_is_corrupt() {
    let (_temp, path) = setup_table(r#"{"ID": "0"}"#);

    let err = TableEngine::open(&path, false).unwrap_err();

    assert!(matches!(err, TableError::CorruptData { .. }));
}

#[test]
fn test_open_non_utf8_is_corrupt() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("binary.json");
    fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

    let err = TableEngine::open(&path, false).unwrap_err();

    assert!(matches!(err, TableError::CorruptData { .. }));
}

#[test]
fn test_failed_open_leaves_file_untouched() {
    let (_temp, path) = setup_table("[1, 2, 3]");

    assert!(TableEngine::open(&path, false).is_err());

    assert_eq!(fs::read_to_string(&path).unwrap(), "[1, 2, 3]");
}

#[test]
fn test_create_table() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("new.json");

    TableEngine::create_table(&path).unwrap();

    assert!(path.exists());
    assert_eq!(fs::metadata(&path).unwrap().len(), 0);
}

#[test]
fn test_create_table_existing_fails() {
    let (_temp, path) = people();

    let err = TableEngine::create_table(&path).unwrap_err();

    assert!(matches!(err, TableError::AlreadyExists(_)));
}

#[test]
fn test_create_table_in_missing_directory_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("no_such_dir").join("t.json");

    let err = TableEngine::create_table(&path).unwrap_err();

    assert!(matches!(err, TableError::Io(_)));
}

// =============================================================================
// Select Tests
// =============================================================================

#[test]
fn test_select_single_match() {
    let (_temp, path) = people();
    let engine = TableEngine::open(&path, false).unwrap();

    let result = engine.select("ID", &json!("1"));

    assert_eq!(result, vec![rec(json!({"ID": "1", "Name": "Karl", "Age": "15"}))]);
}

#[test]
fn test_select_numeric_value_matches_numeric_string() {
    let (_temp, path) = people();
    let engine = TableEngine::open(&path, false).unwrap();

    let result = engine.select("ID", &json!(0));

    assert_eq!(result.len(), 1);
    assert_eq!(result[0]["Name"], json!("Hans"));
}

#[test]
fn test_select_multiple_matches_in_table_order() {
    let (_temp, path) = setup_table(
        r#"[{"k": 1, "n": "a"}, {"k": 2, "n": "b"}, {"k": "1", "n": "c"}, {"k": 1.0, "n": "d"}]"#,
    );
    let engine = TableEngine::open(&path, false).unwrap();

    let names: Vec<Value> = engine
        .select("k", &json!("1"))
        .into_iter()
        .map(|r| r["n"].clone())
        .collect();

    assert_eq!(names, vec![json!("a"), json!("c"), json!("d")]);
}

#[test]
fn test_select_no_match_is_empty() {
    let (_temp, path) = people();
    let engine = TableEngine::open(&path, false).unwrap();

    assert!(engine.select("ID", &json!("42")).is_empty());
    assert!(engine.select("Missing", &json!("0")).is_empty());
}

#[test]
fn test_select_null_field_never_matches() {
    let (_temp, path) = setup_table(r#"[{"ID": null}, {"ID": ""}]"#);
    let engine = TableEngine::open(&path, false).unwrap();

    let result = engine.select("ID", &json!(null));

    assert_eq!(result, vec![rec(json!({"ID": ""}))]);
}

#[test]
fn test_select_all_is_a_snapshot() {
    let (_temp, path) = people();
    let mut engine = TableEngine::open(&path, false).unwrap();

    let snapshot = engine.select_all();
    engine.delete_all();

    assert_eq!(snapshot.len(), 3);
    assert!(engine.select_all().is_empty());
}

// =============================================================================
// Insert / Update Tests
// =============================================================================

#[test]
fn test_insert_appends_and_allows_duplicates() {
    let (_temp, path) = people();
    let mut engine = TableEngine::open(&path, false).unwrap();
    let record = rec(json!({"ID": "3", "Name": "Sepp"}));

    assert!(engine.insert(record.clone()));
    assert!(engine.insert(record.clone()));

    assert_eq!(engine.len(), 5);
    assert_eq!(engine.select("ID", &json!("3")), vec![record.clone(), record]);
}

#[test]
fn test_update_replaces_only_first_match() {
    let (_temp, path) = setup_table(r#"[{"g": "x", "n": 1}, {"g": "x", "n": 2}]"#);
    let mut engine = TableEngine::open(&path, false).unwrap();

    let matched = engine.update("g", &json!("x"), rec(json!({"g": "y", "n": 9})));

    assert!(matched);
    assert_eq!(
        engine.select_all(),
        vec![rec(json!({"g": "y", "n": 9})), rec(json!({"g": "x", "n": 2}))]
    );
}

#[test]
fn test_update_replaces_record_wholesale() {
    let (_temp, path) = people();
    let mut engine = TableEngine::open(&path, false).unwrap();

    engine.update("ID", &json!(1), rec(json!({"ID": "1"})));

    assert_eq!(engine.select("ID", &json!("1")), vec![rec(json!({"ID": "1"}))]);
}

#[test]
fn test_update_second_call_with_stale_value_does_nothing() {
    let (_temp, path) = people();
    let mut engine = TableEngine::open(&path, false).unwrap();

    assert!(engine.update("Name", &json!("Hans"), rec(json!({"ID": "0", "Name": "Franz"}))));
    let before = engine.select_all();

    assert!(!engine.update("Name", &json!("Hans"), rec(json!({"ID": "0", "Name": "Other"}))));
    assert_eq!(engine.select_all(), before);
}

// =============================================================================
// Delete Tests
// =============================================================================

#[test]
fn test_delete_removes_all_matches_and_keeps_order() {
    let (_temp, path) = setup_table(
        r#"[{"k": "a", "n": 1}, {"k": "b", "n": 2}, {"k": "a", "n": 3}, {"k": "c", "n": 4}]"#,
    );
    let mut engine = TableEngine::open(&path, false).unwrap();
    let before = engine.len();

    let removed = engine.delete("k", &json!("a"));

    assert_eq!(removed, 2);
    assert_eq!(engine.len(), before - removed);
    assert!(engine.select("k", &json!("a")).is_empty());
    assert_eq!(
        engine.select_all(),
        vec![rec(json!({"k": "b", "n": 2})), rec(json!({"k": "c", "n": 4}))]
    );
}

#[test]
fn test_delete_no_match_returns_zero() {
    let (_temp, path) = people();
    let mut engine = TableEngine::open(&path, false).unwrap();

    assert_eq!(engine.delete("ID", &json!("99")), 0);
    assert_eq!(engine.len(), 3);
}

#[test]
fn test_update_all_and_delete_all() {
    let (_temp, path) = people();
    let mut engine = TableEngine::open(&path, false).unwrap();
    let replacement = vec![rec(json!({"ID": "x"}))];

    assert_eq!(engine.update_all(replacement.clone()), replacement);
    assert_eq!(engine.select_all(), replacement);

    assert!(engine.delete_all());
    assert!(engine.is_empty());
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_close_and_reopen_preserves_selection() {
    let (_temp, path) = people();

    let mut engine = TableEngine::open(&path, false).unwrap();
    engine.insert(rec(json!({"ID": "3", "Name": "Sepp", "Age": 40})));
    engine.delete("ID", &json!("0"));
    let before = engine.select("Age", &json!("40"));
    let all_before = engine.select_all();
    engine.close().unwrap();

    let engine = TableEngine::open(&path, false).unwrap();
    assert_eq!(engine.select("Age", &json!("40")), before);
    assert_eq!(engine.select_all(), all_before);
}

#[test]
fn test_field_order_survives_round_trip() {
    let (_temp, path) = setup_table(r#"[{"z": 1, "a": 2, "m": 3}]"#);

    TableEngine::open(&path, false).unwrap().close().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), r#"[{"z":1,"a":2,"m":3}]"#);
}

#[test]
fn test_drop_persists_records() {
    let (_temp, path) = people();

    {
        let mut engine = TableEngine::open(&path, false).unwrap();
        engine.insert(rec(json!({"ID": "3"})));
    }

    let engine = TableEngine::open(&path, false).unwrap();
    assert_eq!(engine.len(), 4);
}

#[test]
fn test_close_shrinks_file() {
    let (_temp, path) = people();

    let mut engine = TableEngine::open(&path, false).unwrap();
    engine.delete_all();
    engine.close().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
}

#[test]
fn test_close_without_sync_still_writes() {
    let (_temp, path) = people();
    let config = jsontable::Config::builder().sync_on_close(false).build();

    let mut engine = TableEngine::open_with(&path, false, &config).unwrap();
    engine.delete("ID", &json!("2"));
    engine.close().unwrap();

    let engine = TableEngine::open(&path, false).unwrap();
    assert_eq!(engine.len(), 2);
}

// flock is advisory on Unix, so the file can be read while locked
#[cfg(unix)]
#[test]
fn test_file_not_truncated_while_open() {
    let (_temp, path) = people();
    let original = fs::read_to_string(&path).unwrap();

    let mut engine = TableEngine::open(&path, false).unwrap();
    engine.delete_all();

    assert_eq!(fs::read_to_string(&path).unwrap(), original);

    engine.close().unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
}
