//! Dependency forest construction
//!
//! Turns the flat task list into a forest of tree nodes. Prerequisite edges
//! are encoded parent -> child ("prerequisite unlocks dependent"), so a
//! task's node hangs under each of its prerequisites in the intermediate
//! graph, and deduplication then keeps only the first occurrence of every
//! value in depth-first document order.

use std::collections::{HashMap, HashSet};

use crate::task::TaskRecord;

/// Metadata carried from the task record onto its node for the
/// presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeMeta {
    pub trader: String,
    pub wiki_link: Option<String>,
}

/// One node of the built forest.
///
/// `children` is `None` for leaves, never `Some` of an empty vec; downstream
/// consumers rely on absence to mean "leaf".
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub value: String,
    pub label: String,
    pub children: Option<Vec<TreeNode>>,
    pub meta: NodeMeta,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// The node's children, or an empty slice for leaves.
    pub fn child_nodes(&self) -> &[TreeNode] {
        self.children.as_deref().unwrap_or(&[])
    }
}

/// Build the dependency forest for the given tasks.
///
/// With a trader filter, every task of that trader becomes a root candidate
/// (cross-trader prerequisite chains are not displayed together, so a task
/// whose prerequisite belongs to another trader still surfaces under its own
/// tab). Without a filter, roots are the tasks no surviving edge lists as a
/// child — re-derived from the link table rather than from "has zero
/// prerequisites", since an edge whose prerequisite id is missing from the
/// dataset is dropped.
pub fn build_forest(tasks: &[TaskRecord], trader_filter: Option<&str>) -> Vec<TreeNode> {
    // Index: task id -> slot, one per task regardless of filter.
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(tasks.len());
    for (idx, task) in tasks.iter().enumerate() {
        index.entry(task.id.as_str()).or_insert(idx);
    }

    // Link: dependent hangs under each of its prerequisites.
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); tasks.len()];
    let mut has_parent = vec![false; tasks.len()];
    for (idx, task) in tasks.iter().enumerate() {
        for prereq in &task.prerequisites {
            match index.get(prereq.as_str()) {
                Some(&parent) => {
                    children[parent].push(idx);
                    has_parent[idx] = true;
                }
                None => {
                    tracing::debug!(task = %task.id, prereq = %prereq, "prerequisite not in dataset, edge dropped");
                }
            }
        }
    }

    let roots: Vec<usize> = match trader_filter {
        Some(trader) => tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.trader == trader)
            .map(|(idx, _)| idx)
            .collect(),
        None => (0..tasks.len()).filter(|&idx| !has_parent[idx]).collect(),
    };

    // Depth-first emit with first-visit-wins dedup: a value already seen is
    // dropped together with any branch of it that only that path reaches.
    let mut visited: HashSet<&str> = HashSet::with_capacity(tasks.len());
    roots
        .into_iter()
        .filter_map(|idx| emit(tasks, &children, idx, &mut visited))
        .collect()
}

fn emit<'a>(
    tasks: &'a [TaskRecord],
    children: &[Vec<usize>],
    idx: usize,
    visited: &mut HashSet<&'a str>,
) -> Option<TreeNode> {
    let task = &tasks[idx];
    if !visited.insert(task.id.as_str()) {
        return None;
    }
    let kids: Vec<TreeNode> = children[idx]
        .iter()
        .filter_map(|&child| emit(tasks, children, child, visited))
        .collect();
    Some(TreeNode {
        value: task.id.clone(),
        label: task.name.clone(),
        // Empty child lists are pruned to None so leaves read as absent
        children: if kids.is_empty() { None } else { Some(kids) },
        meta: NodeMeta {
            trader: task.trader.clone(),
            wiki_link: task.wiki_link.clone(),
        },
    })
}

/// Find a node by value anywhere in the forest.
pub fn find_node<'a>(nodes: &'a [TreeNode], value: &str) -> Option<&'a TreeNode> {
    for node in nodes {
        if node.value == value {
            return Some(node);
        }
        if let Some(found) = find_node(node.child_nodes(), value) {
            return Some(found);
        }
    }
    None
}

/// Value of the node that lists `value` among its children, if any.
pub fn parent_value<'a>(nodes: &'a [TreeNode], value: &str) -> Option<&'a str> {
    for node in nodes {
        if node.child_nodes().iter().any(|child| child.value == value) {
            return Some(&node.value);
        }
        if let Some(found) = parent_value(node.child_nodes(), value) {
            return Some(found);
        }
    }
    None
}
