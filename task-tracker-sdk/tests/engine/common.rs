//! Common fixtures for the engine tests

use task_tracker_sdk::{build_forest, MemoryStore, TaskRecord, TreeNode, TreeState, TreeStateOptions};

/// Build a task record with the given prerequisites.
pub fn task(id: &str, name: &str, trader: &str, prereqs: &[&str]) -> TaskRecord {
    TaskRecord {
        id: id.to_string(),
        name: name.to_string(),
        trader: trader.to_string(),
        wiki_link: None,
        prerequisites: prereqs.iter().map(|p| p.to_string()).collect(),
    }
}

/// The diamond dataset: A unlocks B and C, both of which unlock D.
pub fn diamond_tasks() -> Vec<TaskRecord> {
    vec![
        task("A", "Debut", "Prapor", &[]),
        task("B", "Search Mission", "Prapor", &["A"]),
        task("C", "Background Check", "Prapor", &["A"]),
        task("D", "Shootout Picnic", "Prapor", &["B", "C"]),
    ]
}

/// A two-level branch with three leaves: root R, branch B under it,
/// leaves L1/L2 under B and leaf L3 under R.
pub fn branch_tasks() -> Vec<TaskRecord> {
    vec![
        task("R", "Root", "Prapor", &[]),
        task("B", "Branch", "Prapor", &["R"]),
        task("L1", "Leaf One", "Prapor", &["B"]),
        task("L2", "Leaf Two", "Prapor", &["B"]),
        task("L3", "Leaf Three", "Prapor", &["R"]),
    ]
}

/// Engine over the given tasks with an in-memory store. Returns the store
/// handle alongside so tests can inspect or reuse it.
pub fn engine(tasks: &[TaskRecord], opts: TreeStateOptions) -> (TreeState, MemoryStore) {
    let store = MemoryStore::new();
    let forest = build_forest(tasks, None);
    let state = TreeState::new(forest, opts, Box::new(store.clone()));
    (state, store)
}

/// Collect every value in the forest, in document order.
pub fn all_values(nodes: &[TreeNode]) -> Vec<String> {
    let mut acc = Vec::new();
    walk(nodes, &mut acc);
    acc
}

fn walk(nodes: &[TreeNode], acc: &mut Vec<String>) {
    for node in nodes {
        acc.push(node.value.clone());
        walk(node.child_nodes(), acc);
    }
}
