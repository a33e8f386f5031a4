//! Task dataset loading and queries

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Canonical trader display order. Traders not listed here sort after the
/// known ones, alphabetically.
const TRADER_ORDER: [&str; 7] = [
    "Prapor",
    "Therapist",
    "Skier",
    "Peacekeeper",
    "Mechanic",
    "Ragman",
    "Jaeger",
];

/// A single task from the source dataset.
///
/// `prerequisites` holds the ids of tasks that must be completed before this
/// one unlocks. The prerequisite graph is trusted to be acyclic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub name: String,
    pub trader: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki_link: Option<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

/// Read-only index over the task dataset, loaded once per session.
#[derive(Debug, Clone, Default)]
pub struct TaskRepository {
    tasks: Vec<TaskRecord>,
    by_id: HashMap<String, usize>,
}

impl TaskRepository {
    /// Load the dataset from a JSON file (an array of task records, in
    /// display order).
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read task dataset: {}", path.display()))?;
        let tasks: Vec<TaskRecord> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse task dataset: {}", path.display()))?;
        tracing::debug!(count = tasks.len(), path = %path.display(), "task dataset loaded");
        Ok(Self::from_records(tasks))
    }

    /// Build a repository from in-memory records, preserving their order.
    pub fn from_records(tasks: Vec<TaskRecord>) -> Self {
        let mut by_id = HashMap::with_capacity(tasks.len());
        for (idx, task) in tasks.iter().enumerate() {
            // First record wins on duplicate ids
            by_id.entry(task.id.clone()).or_insert(idx);
        }
        Self { tasks, by_id }
    }

    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&TaskRecord> {
        self.by_id.get(id).map(|&idx| &self.tasks[idx])
    }

    /// All tasks owned by the given trader, in dataset order.
    pub fn by_trader(&self, trader: &str) -> Vec<&TaskRecord> {
        self.tasks.iter().filter(|t| t.trader == trader).collect()
    }

    /// Distinct trader names in canonical display order.
    pub fn traders(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for task in &self.tasks {
            if !seen.contains(&task.trader) {
                seen.push(task.trader.clone());
            }
        }
        trader_order(seen)
    }
}

fn trader_rank(name: &str) -> Option<usize> {
    TRADER_ORDER.iter().position(|&t| t == name)
}

/// Sort trader names into canonical display order: known traders first in
/// their fixed order, unknown traders after them alphabetically.
pub fn trader_order(mut names: Vec<String>) -> Vec<String> {
    names.sort_by(|a, b| match (trader_rank(a), trader_rank(b)) {
        (Some(ra), Some(rb)) => ra.cmp(&rb),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.cmp(b),
    });
    names
}
