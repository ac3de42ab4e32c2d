//! Tests for Engine
//!
//! These tests verify:
//! - Opening (including graceful degradation on a bad file)
//! - Paginated listing and search
//! - Update/delete semantics and persistence
//! - Rollback when persisting fails
//! - Concurrent writers do not lose updates

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use castbase::config::Config;
use castbase::engine::Engine;
use castbase::protocol::{Command, PageRequest, Response, SearchQuery};
use castbase::storage::load_table;
use castbase::{CastError, ErrorKind};
use serde_json::{json, Map, Value};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

const FRIENDS_CSV: &str = "\
id,first_name,last_name,age
1,Ross,Geller,30
2,Rachel,Green,29
3,Monica,Geller,29
4,Chandler,Bing,30
5,Joey,Tribbiani,31
6,Phoebe,Buffay,31
";

fn setup_engine_with(contents: &str) -> (TempDir, PathBuf, Engine) {
    let temp_dir = TempDir::new().unwrap();
    let data_file = temp_dir.path().join("friends_data.csv");
    fs::write(&data_file, contents).unwrap();

    let config = Config::builder().data_file(&data_file).build();
    let engine = Engine::open(config);
    (temp_dir, data_file, engine)
}

fn setup_temp_engine() -> (TempDir, PathBuf, Engine) {
    setup_engine_with(FRIENDS_CSV)
}

fn page(page: i64, per_page: i64) -> PageRequest {
    PageRequest::new(page, per_page).unwrap()
}

fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected an object"),
    }
}

fn listed_ids(engine: &Engine) -> Vec<i64> {
    engine
        .list(page(1, 1000))
        .unwrap()
        .data
        .iter()
        .map(|row| row["id"].as_i64().unwrap())
        .collect()
}

// =============================================================================
// Open Tests
// =============================================================================

#[test]
fn test_open_loads_file() {
    let (_temp, _path, engine) = setup_temp_engine();

    assert_eq!(engine.len(), 6);
    assert_eq!(engine.columns(), vec!["id", "first_name", "last_name", "age"]);
}

#[test]
fn test_open_missing_file_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_file(temp_dir.path().join("missing.csv"))
        .build();

    let engine = Engine::open(config);

    assert!(engine.is_empty());
    let listing = engine.list(page(1, 10)).unwrap();
    assert_eq!(listing.meta.total_records, 0);
    assert_eq!(listing.meta.total_pages, 0);
    assert!(listing.data.is_empty());
}

#[test]
fn test_open_malformed_file_is_empty() {
    let (_temp, _path, engine) = setup_engine_with("id,name\nnot-a-number,Ross\n");

    assert!(engine.is_empty());
}

// =============================================================================
// Listing Tests
// =============================================================================

#[test]
fn test_list_first_page() {
    let (_temp, _path, engine) = setup_temp_engine();

    let listing = engine.list(page(1, 4)).unwrap();

    assert_eq!(listing.data.len(), 4);
    assert_eq!(listing.data[0]["first_name"], json!("Ross"));
    assert_eq!(listing.meta.page, 1);
    assert_eq!(listing.meta.per_page, 4);
    assert_eq!(listing.meta.total_records, 6);
    assert_eq!(listing.meta.total_pages, 2);
}

#[test]
fn test_list_last_partial_page() {
    let (_temp, _path, engine) = setup_temp_engine();

    let listing = engine.list(page(2, 4)).unwrap();

    let ids: Vec<i64> = listing.data.iter().map(|r| r["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![5, 6]);
}

#[test]
fn test_list_past_end_is_empty_not_error() {
    let (_temp, _path, engine) = setup_temp_engine();

    let listing = engine.list(page(50, 10)).unwrap();

    assert!(listing.data.is_empty());
    assert_eq!(listing.meta.total_pages, 1);
}

#[test]
fn test_list_huge_page_does_not_overflow() {
    let (_temp, _path, engine) = setup_temp_engine();

    let listing = engine.list(page(i64::MAX, i64::MAX)).unwrap();

    assert!(listing.data.is_empty());
    assert_eq!(listing.meta.total_pages, 1);
}

#[test]
fn test_list_page_size_properties() {
    let (_temp, _path, engine) = setup_temp_engine();

    for per_page in 1..=8 {
        for p in 1..=8 {
            let listing = engine.list(page(p, per_page)).unwrap();
            assert!(listing.data.len() <= per_page as usize);
            assert_eq!(listing.meta.total_pages, (6 + per_page as u64 - 1) / per_page as u64);
        }
    }
}

// =============================================================================
// Search Tests
// =============================================================================

#[test]
fn test_search_first_name_case_insensitive() {
    let (_temp, _path, engine) = setup_temp_engine();

    let result = engine
        .search(&SearchQuery::new(Some("ros"), None).unwrap())
        .unwrap();

    assert_eq!(result.total_matches, 1);
    assert_eq!(result.data[0]["first_name"], json!("Ross"));
}

#[test]
fn test_search_last_name_preserves_order() {
    let (_temp, _path, engine) = setup_temp_engine();

    let result = engine
        .search(&SearchQuery::new(None, Some("GELLER")).unwrap())
        .unwrap();

    let names: Vec<&Value> = result.data.iter().map(|r| &r["first_name"]).collect();
    assert_eq!(names, vec![&json!("Ross"), &json!("Monica")]);
    assert_eq!(result.total_matches, 2);
}

#[test]
fn test_search_both_names() {
    let (_temp, _path, engine) = setup_temp_engine();

    let result = engine
        .search(&SearchQuery::new(Some("r"), Some("gel")).unwrap())
        .unwrap();

    assert_eq!(result.total_matches, 1);
    assert_eq!(result.data[0]["id"], json!(1));
}

#[test]
fn test_search_missing_column_is_internal() {
    let (_temp, _path, engine) = setup_engine_with("id,name\n1,Ross\n");

    let err = engine
        .search(&SearchQuery::new(Some("ross"), None).unwrap())
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Internal);
}

// =============================================================================
// Update Tests
// =============================================================================

#[test]
fn test_update_applies_and_persists() {
    let (_temp, path, engine) = setup_temp_engine();

    let response = engine
        .update(2, &fields(json!({"first_name": "Rach", "age": 30})))
        .unwrap();

    assert_eq!(response.message, "Character 2 updated successfully");
    assert_eq!(response.updated_record["first_name"], json!("Rach"));
    assert_eq!(response.updated_record["age"], json!(30));

    let on_disk = load_table(&path).unwrap();
    assert_eq!(on_disk.render(on_disk.get(2).unwrap())["first_name"], json!("Rach"));
}

#[test]
fn test_update_unknown_field_is_ignored() {
    let (_temp, path, engine) = setup_temp_engine();

    let response = engine
        .update(5, &fields(json!({"catchphrase": "How you doin'?", "age": 32})))
        .unwrap();

    assert_eq!(response.updated_record["age"], json!(32));
    assert!(response.updated_record.get("catchphrase").is_none());

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("5,Joey,Tribbiani,32"));
    assert!(!contents.contains("catchphrase"));
}

#[test]
fn test_update_leaves_other_rows_untouched() {
    let contents = "\
id,first_name,last_name,phone,height
1,Ross,Geller,0123,1.50
2,Rachel,Green,+44,1e3
";
    let (_temp, path, engine) = setup_engine_with(contents);
    assert_eq!(engine.data_file(), path.as_path());

    engine.update(1, &fields(json!({"first_name": "R"}))).unwrap();

    let written = fs::read_to_string(engine.data_file()).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], "1,R,Geller,0123,1.50");
    assert_eq!(lines[2], "2,Rachel,Green,+44,1e3");
}

#[test]
fn test_update_strict_rejects_unknown_field() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("friends_data.csv");
    fs::write(&path, FRIENDS_CSV).unwrap();
    let config = Config::builder()
        .data_file(&path)
        .reject_unknown_fields(true)
        .build();
    let engine = Engine::open(config);

    let err = engine
        .update(5, &fields(json!({"catchphrase": "x", "age": 32})))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(engine.get(5).unwrap()["age"], json!(31));
    assert_eq!(fs::read_to_string(&path).unwrap(), FRIENDS_CSV);
}

#[test]
fn test_update_nonexistent_id() {
    let (_temp, path, engine) = setup_temp_engine();
    let before = engine.snapshot();

    let err = engine.update(99, &fields(json!({"age": 1}))).unwrap_err();

    assert!(matches!(err, CastError::CharacterNotFound(_)));
    assert_eq!(err.to_string(), "Character with id 99 not found");
    assert_eq!(engine.snapshot(), before);
    assert_eq!(fs::read_to_string(&path).unwrap(), FRIENDS_CSV);
}

#[test]
fn test_update_empty_fields_is_invalid() {
    let (_temp, _path, engine) = setup_temp_engine();

    let err = engine.update(1, &Map::new()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_update_rolls_back_when_persist_fails() {
    let temp_dir = TempDir::new().unwrap();
    let table = castbase::storage::read_table(FRIENDS_CSV.as_bytes()).unwrap();
    let config = Config::builder()
        .data_file(temp_dir.path().join("gone").join("friends_data.csv"))
        .build();
    let engine = Engine::with_table(config, table.clone());

    let err = engine.update(1, &fields(json!({"first_name": "Ross!"}))).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Internal);
    assert_eq!(engine.snapshot(), table);
}

// =============================================================================
// Delete Tests
// =============================================================================

#[test]
fn test_delete_removes_and_persists() {
    let (_temp, path, engine) = setup_temp_engine();

    let response = engine.delete(3).unwrap();

    assert_eq!(response.message, "Character 3 deleted successfully");
    assert_eq!(response.remaining_records, 5);
    assert_eq!(listed_ids(&engine), vec![1, 2, 4, 5, 6]);

    let on_disk = load_table(&path).unwrap();
    assert_eq!(on_disk.len(), 5);
    assert!(on_disk.get(3).is_none());
}

#[test]
fn test_delete_nonexistent_id() {
    let (_temp, _path, engine) = setup_temp_engine();

    let err = engine.delete(42).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(engine.len(), 6);
}

#[test]
fn test_delete_twice() {
    let (_temp, _path, engine) = setup_temp_engine();

    engine.delete(1).unwrap();
    let err = engine.delete(1).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_delete_rolls_back_when_persist_fails() {
    let temp_dir = TempDir::new().unwrap();
    let table = castbase::storage::read_table(FRIENDS_CSV.as_bytes()).unwrap();
    let config = Config::builder()
        .data_file(temp_dir.path().join("gone").join("friends_data.csv"))
        .build();
    let engine = Engine::with_table(config, table.clone());

    let err = engine.delete(4).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Internal);
    assert_eq!(engine.snapshot(), table);
}

#[test]
fn test_two_record_example() {
    let (_temp, _path, engine) =
        setup_engine_with("id,first_name\n1,Ross\n2,Rachel\n");

    let listing = engine.list(page(1, 1)).unwrap();
    assert_eq!(listing.data.len(), 1);
    assert_eq!(listing.data[0]["id"], json!(1));
    assert_eq!(listing.meta.total_pages, 2);

    let deleted = engine.delete(2).unwrap();
    assert_eq!(deleted.remaining_records, 1);
    assert_eq!(listed_ids(&engine), vec![1]);
}

// =============================================================================
// Command Execution Tests
// =============================================================================

#[test]
fn test_execute_routes_commands() {
    let (_temp, _path, engine) = setup_temp_engine();

    assert!(matches!(engine.execute(Command::Welcome).unwrap(), Response::Welcome(_)));
    assert!(matches!(
        engine.execute(Command::List(page(1, 2))).unwrap(),
        Response::Page(p) if p.data.len() == 2
    ));
    assert!(matches!(
        engine.execute(Command::Delete { id: 6 }).unwrap(),
        Response::Deleted(d) if d.remaining_records == 5
    ));
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_updates_are_not_lost() {
    let (_temp, path, engine) = setup_temp_engine();
    let engine = Arc::new(engine);

    let handles: Vec<_> = (1..=6)
        .map(|id| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                engine
                    .update(id, &fields(json!({"age": 100 + id})))
                    .unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let on_disk = load_table(&path).unwrap();
    for id in 1..=6 {
        assert_eq!(engine.get(id).unwrap()["age"], json!(100 + id));
        assert_eq!(on_disk.render(on_disk.get(id).unwrap())["age"], json!(100 + id));
    }
}

#[test]
fn test_concurrent_readers_and_deleter() {
    let (_temp, _path, engine) = setup_temp_engine();
    let engine = Arc::new(engine);

    let reader = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            for _ in 0..100 {
                let listing = engine.list(page(1, 10)).unwrap();
                assert_eq!(listing.data.len() as u64, listing.meta.total_records);
            }
        })
    };

    for id in [2, 4, 6] {
        engine.delete(id).unwrap();
    }
    reader.join().unwrap();

    assert_eq!(listed_ids(&engine), vec![1, 3, 5]);
}
