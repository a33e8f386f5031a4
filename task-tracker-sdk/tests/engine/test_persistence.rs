//! Tests for state persistence through the store adapters

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::anyhow;
use serde_json::{json, Value};

use super::common::*;
use task_tracker_sdk::{
    build_forest, JsonFileStore, MemoryStore, SqliteStore, StateStore, TreeState,
    TreeStateOptions,
};

/// Counts writes going through to the wrapped store.
#[derive(Clone)]
struct CountingStore {
    inner: MemoryStore,
    writes: Rc<RefCell<usize>>,
}

impl CountingStore {
    fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            writes: Rc::new(RefCell::new(0)),
        }
    }

    fn writes(&self) -> usize {
        *self.writes.borrow()
    }
}

impl StateStore for CountingStore {
    fn read(&self, key: &str) -> Option<Value> {
        self.inner.read(key)
    }

    fn write(&self, key: &str, value: &Value) -> anyhow::Result<()> {
        *self.writes.borrow_mut() += 1;
        self.inner.write(key, value)
    }
}

/// Always fails: reads produce nothing, writes error out.
struct FailingStore;

impl StateStore for FailingStore {
    fn read(&self, _key: &str) -> Option<Value> {
        None
    }

    fn write(&self, _key: &str, _value: &Value) -> anyhow::Result<()> {
        Err(anyhow!("store unavailable"))
    }
}

fn opts(namespace: &str) -> TreeStateOptions {
    TreeStateOptions {
        namespace: namespace.to_string(),
        ..Default::default()
    }
}

#[test]
fn test_checked_round_trips_through_memory_store() {
    let tasks = diamond_tasks();
    let store = MemoryStore::new();

    {
        let forest = build_forest(&tasks, None);
        let mut state = TreeState::new(forest, opts("X"), Box::new(store.clone()));
        state.check_node("D");
    }

    let forest = build_forest(&tasks, None);
    let state = TreeState::new(forest, opts("X"), Box::new(store.clone()));
    assert_eq!(state.checked(), &["D", "B", "A"]);
}

#[test]
fn test_engine_seeds_from_prepopulated_store() {
    let store = MemoryStore::new();
    store.write("X-checked", &json!(["a", "b"])).unwrap();
    store.write("X-expand", &json!({"A": true})).unwrap();

    let forest = build_forest(&diamond_tasks(), None);
    let state = TreeState::new(forest, opts("X"), Box::new(store));

    assert_eq!(state.checked(), &["a", "b"]);
    assert!(state.is_expanded("A"));
    assert!(!state.is_expanded("B"));
}

#[test]
fn test_namespaces_do_not_collide() {
    let tasks = diamond_tasks();
    let store = MemoryStore::new();

    {
        let forest = build_forest(&tasks, None);
        let mut state = TreeState::new(forest, opts("one"), Box::new(store.clone()));
        state.check_node("D");
    }

    let forest = build_forest(&tasks, None);
    let state = TreeState::new(forest, opts("two"), Box::new(store.clone()));
    assert!(state.checked().is_empty());
}

#[test]
fn test_expanded_round_trips_and_stale_keys_survive() {
    let tasks = diamond_tasks();
    let store = MemoryStore::new();
    store
        .write("X-expand", &json!({"A": true, "gone": true}))
        .unwrap();

    let forest = build_forest(&tasks, None);
    let mut state = TreeState::new(forest, opts("X"), Box::new(store.clone()));
    assert!(state.is_expanded("A"));

    state.expand("B");

    // The write keeps the stale persisted key alongside the live entries
    let written = store.read("X-expand").unwrap();
    assert_eq!(written.get("gone"), Some(&json!(true)));
    assert_eq!(written.get("B"), Some(&json!(true)));
}

#[test]
fn test_identical_state_changes_write_once() {
    let tasks = diamond_tasks();
    let store = CountingStore::new();

    let forest = build_forest(&tasks, None);
    let mut state = TreeState::new(forest, opts("X"), Box::new(store.clone()));
    assert_eq!(store.writes(), 0); // construction never writes

    state.check_node("D");
    let after_first = store.writes();
    assert_eq!(after_first, 1);

    // Checking the same node again changes nothing, so nothing is written
    state.check_node("D");
    assert_eq!(store.writes(), after_first);

    // Unchecking a value that was never checked is also a no-op
    state.uncheck_node("C");
    assert_eq!(store.writes(), after_first);
}

#[test]
fn test_engine_functions_in_memory_when_store_fails() {
    let tasks = diamond_tasks();
    let forest = build_forest(&tasks, None);
    let mut state = TreeState::new(forest, opts("X"), Box::new(FailingStore));

    state.check_node("D");
    state.expand("A");

    assert_eq!(state.checked(), &["D", "B", "A"]);
    assert!(state.is_expanded("A"));
    assert!(state.is_node_checked("A"));
}

#[test]
fn test_read_failure_falls_back_to_initial_values() {
    let forest = build_forest(&diamond_tasks(), None);
    let options = TreeStateOptions {
        namespace: "X".to_string(),
        initial_checked: vec!["D".to_string()],
        ..Default::default()
    };
    let state = TreeState::new(forest, options, Box::new(FailingStore));

    assert_eq!(state.checked(), &["D"]);
}

#[test]
fn test_round_trip_through_json_file_store() {
    let dir = std::env::temp_dir().join("task_tracker_persist_json");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("state.json");
    std::fs::remove_file(&path).ok();

    let tasks = diamond_tasks();
    {
        let forest = build_forest(&tasks, None);
        let mut state = TreeState::new(
            forest,
            opts("prapor"),
            Box::new(JsonFileStore::new(path.clone())),
        );
        state.check_node("D");
        state.expand("A");
    }

    let forest = build_forest(&tasks, None);
    let state = TreeState::new(
        forest,
        opts("prapor"),
        Box::new(JsonFileStore::new(path.clone())),
    );
    assert_eq!(state.checked(), &["D", "B", "A"]);
    assert!(state.is_expanded("A"));

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_round_trip_through_sqlite_store() {
    let dir = std::env::temp_dir().join("task_tracker_persist_sqlite");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("state.db");
    std::fs::remove_file(&path).ok();

    let tasks = diamond_tasks();
    {
        let forest = build_forest(&tasks, None);
        let store = SqliteStore::open(&path).unwrap();
        let mut state = TreeState::new(forest, opts("prapor"), Box::new(store));
        state.check_node("D");
        state.toggle_expanded("A");
    }

    let forest = build_forest(&tasks, None);
    let store = SqliteStore::open(&path).unwrap();
    let state = TreeState::new(forest, opts("prapor"), Box::new(store));
    assert_eq!(state.checked(), &["D", "B", "A"]);
    assert!(state.is_expanded("A"));

    std::fs::remove_file(&path).ok();
}
