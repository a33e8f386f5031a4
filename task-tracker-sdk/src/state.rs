//! Tree interaction state engine
//!
//! Holds expand/collapse, checked, selection and hover state for one built
//! forest. Checking a node marks its whole ancestor chain; unchecking a node
//! clears the node and its leaf descendants. Whether a branch counts as
//! checked or indeterminate is derived from the checked set on demand and
//! never stored.
//!
//! Checked and expanded state round-trip through a [`StateStore`] under
//! `{namespace}-checked` / `{namespace}-expand`; a store that fails keeps
//! the engine running purely in memory for the session.

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::debug;

use crate::store::StateStore;
use crate::tree::{self, TreeNode};

/// Derived check status of a single node, computed from the checked set.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckedStatus {
    pub value: String,
    pub checked: bool,
    pub indeterminate: bool,
    pub has_children: bool,
}

/// Construction options for [`TreeState`].
#[derive(Debug, Clone)]
pub struct TreeStateOptions {
    /// Key prefix for persisted state.
    pub namespace: String,
    /// Multi-select mode for `selected`.
    pub multiple: bool,
    /// Node value that starts expanded when no persisted entry exists.
    pub default_open: Option<String>,
    /// Fallback checked values when the store has none.
    pub initial_checked: Vec<String>,
    /// Fallback expanded entries when the store has none.
    pub initial_expanded: HashMap<String, bool>,
    pub initial_selected: Vec<String>,
}

impl Default for TreeStateOptions {
    fn default() -> Self {
        Self {
            namespace: "tree".to_string(),
            multiple: false,
            default_open: None,
            initial_checked: Vec::new(),
            initial_expanded: HashMap::new(),
            initial_selected: Vec::new(),
        }
    }
}

#[derive(Default)]
struct DerivedCache {
    version: u64,
    statuses: Option<Vec<CheckedStatus>>,
}

/// State engine over one forest instance.
pub struct TreeState {
    forest: Vec<TreeNode>,
    expanded: HashMap<String, bool>,
    checked: Vec<String>,
    selected: Vec<String>,
    anchor: Option<String>,
    hovered: Option<String>,
    multiple: bool,
    namespace: String,
    default_open: Option<String>,
    store: Box<dyn StateStore>,
    // Last values read from or successfully written to the store, compared
    // before every write to skip redundant ones.
    saved_expanded: HashMap<String, bool>,
    saved_checked: Vec<String>,
    // Bumped on every checked-set mutation and rebuild; keys the derived
    // cache. Correctness never depends on the cache, only recomputation
    // cost does.
    version: u64,
    cache: RefCell<DerivedCache>,
}

impl TreeState {
    pub fn new(forest: Vec<TreeNode>, opts: TreeStateOptions, store: Box<dyn StateStore>) -> Self {
        let expand_key = format!("{}-expand", opts.namespace);
        let checked_key = format!("{}-checked", opts.namespace);

        let persisted_expanded: HashMap<String, bool> = store
            .read(&expand_key)
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or(opts.initial_expanded);
        let checked: Vec<String> = store
            .read(&checked_key)
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or(opts.initial_checked);

        // Stale persisted keys stay in the map (tolerated, ignored by
        // reads, rewritten on the next write); forest nodes get their
        // persisted-or-default entries on top.
        let mut expanded = persisted_expanded.clone();
        expanded.extend(initial_expanded_state(
            &persisted_expanded,
            &forest,
            opts.default_open.as_deref(),
        ));

        Self {
            forest,
            expanded,
            saved_expanded: persisted_expanded,
            saved_checked: checked.clone(),
            checked,
            selected: opts.initial_selected,
            anchor: None,
            hovered: None,
            multiple: opts.multiple,
            namespace: opts.namespace,
            default_open: opts.default_open,
            store,
            version: 0,
            cache: RefCell::new(DerivedCache::default()),
        }
    }

    /// Replace the forest after a rebuild. Existing state entries are kept
    /// (stale values stay in the maps, ignored by reads); nodes new to this
    /// forest receive default expanded entries.
    pub fn initialize(&mut self, forest: Vec<TreeNode>) {
        let defaults =
            initial_expanded_state(&self.expanded, &forest, self.default_open.as_deref());
        self.expanded.extend(defaults);
        self.forest = forest;
        self.bump();
    }

    pub fn forest(&self) -> &[TreeNode] {
        &self.forest
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn multiple(&self) -> bool {
        self.multiple
    }

    pub fn find_node(&self, value: &str) -> Option<&TreeNode> {
        tree::find_node(&self.forest, value)
    }

    /// Ancestor chain of `value`, nearest parent first.
    pub fn ancestors(&self, value: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut current = tree::parent_value(&self.forest, value).map(str::to_string);
        while let Some(parent) = current {
            current = tree::parent_value(&self.forest, &parent).map(str::to_string);
            chain.push(parent);
        }
        chain
    }

    // --- expand/collapse ---

    pub fn expanded(&self) -> &HashMap<String, bool> {
        &self.expanded
    }

    pub fn is_expanded(&self, value: &str) -> bool {
        self.expanded.get(value).copied().unwrap_or(false)
    }

    pub fn toggle_expanded(&mut self, value: &str) {
        let entry = self.expanded.entry(value.to_string()).or_insert(false);
        *entry = !*entry;
        self.persist_expanded();
    }

    pub fn expand(&mut self, value: &str) {
        self.expanded.insert(value.to_string(), true);
        self.persist_expanded();
    }

    pub fn collapse(&mut self, value: &str) {
        self.expanded.insert(value.to_string(), false);
        self.persist_expanded();
    }

    /// Rewrite every existing entry to true. Values without an entry yet
    /// (nodes added by a later rebuild) are unaffected until they receive a
    /// default.
    pub fn expand_all(&mut self) {
        for open in self.expanded.values_mut() {
            *open = true;
        }
        self.persist_expanded();
    }

    pub fn collapse_all(&mut self) {
        for open in self.expanded.values_mut() {
            *open = false;
        }
        self.persist_expanded();
    }

    // --- checked ---

    /// Directly checked values, in insertion order.
    pub fn checked(&self) -> &[String] {
        &self.checked
    }

    /// Mark `value` checked together with its whole ancestor chain.
    ///
    /// Ancestors are added unconditionally, not only once all of their
    /// children are checked; callers needing "fully checked" semantics must
    /// go through [`TreeState::is_fully_checked`].
    pub fn check_node(&mut self, value: &str) {
        let mut to_add = vec![value.to_string()];
        to_add.extend(self.ancestors(value));

        let mut changed = false;
        for v in to_add {
            if !self.checked.contains(&v) {
                self.checked.push(v);
                changed = true;
            }
        }
        if changed {
            self.bump();
        }
        self.persist_checked();
    }

    /// Remove `value` and every leaf descendant of it from the checked set.
    /// Ancestors keep their markers; only the derived queries reflect the
    /// subtree change.
    pub fn uncheck_node(&mut self, value: &str) {
        let mut remove = vec![value.to_string()];
        if let Some(node) = tree::find_node(&self.forest, value) {
            collect_leaf_values(node, &mut remove);
        }

        let before = self.checked.len();
        self.checked.retain(|v| !remove.contains(v));
        if self.checked.len() != before {
            self.bump();
        }
        self.persist_checked();
    }

    /// Direct membership in the checked set, or derived fully-checked
    /// status for branches.
    pub fn is_node_checked(&self, value: &str) -> bool {
        if self.checked.is_empty() {
            return false;
        }
        if self.checked.iter().any(|v| v == value) {
            return true;
        }
        self.with_statuses(|statuses| statuses.iter().any(|s| s.value == value && s.checked))
    }

    /// True when some but not all of the node's subtree is checked.
    pub fn is_node_indeterminate(&self, value: &str) -> bool {
        if self.checked.is_empty() {
            return false;
        }
        self.with_statuses(|statuses| {
            statuses
                .iter()
                .any(|s| s.value == value && s.indeterminate)
        })
    }

    /// Derived fully-checked status: every leaf of the subtree checked (for
    /// a leaf, direct membership). Ignores the unconditional ancestor
    /// markers [`TreeState::check_node`] leaves behind.
    pub fn is_fully_checked(&self, value: &str) -> bool {
        self.with_statuses(|statuses| statuses.iter().any(|s| s.value == value && s.checked))
    }

    /// Derived status entries for every checked leaf and every branch with a
    /// checked descendant, in document order.
    pub fn checked_nodes(&self) -> Vec<CheckedStatus> {
        self.with_statuses(|statuses| statuses.to_vec())
    }

    // --- selection ---

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    pub fn is_selected(&self, value: &str) -> bool {
        self.selected.iter().any(|v| v == value)
    }

    pub fn toggle_selected(&mut self, value: &str) {
        if !self.multiple {
            if self.is_selected(value) {
                self.selected.clear();
                self.anchor = None;
            } else {
                self.selected = vec![value.to_string()];
                self.anchor = Some(value.to_string());
            }
            return;
        }

        if let Some(pos) = self.selected.iter().position(|v| v == value) {
            self.selected.remove(pos);
            if self.anchor.as_deref() == Some(value) {
                self.anchor = None;
            }
        } else {
            self.selected.push(value.to_string());
            self.anchor = Some(value.to_string());
        }
    }

    pub fn select(&mut self, value: &str) {
        self.anchor = Some(value.to_string());
        if self.multiple {
            if !self.is_selected(value) {
                self.selected.push(value.to_string());
            }
        } else {
            self.selected = vec![value.to_string()];
        }
    }

    pub fn deselect(&mut self, value: &str) {
        if self.anchor.as_deref() == Some(value) {
            self.anchor = None;
        }
        self.selected.retain(|v| v != value);
    }

    pub fn clear_selected(&mut self) {
        self.selected.clear();
        self.anchor = None;
    }

    // --- hover ---

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn set_hovered(&mut self, value: Option<String>) {
        self.hovered = value;
    }

    // --- internals ---

    fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    fn with_statuses<R>(&self, f: impl FnOnce(&[CheckedStatus]) -> R) -> R {
        let mut cache = self.cache.borrow_mut();
        if cache.statuses.is_none() || cache.version != self.version {
            let mut acc = Vec::new();
            derive_statuses(&self.forest, &self.checked, &mut acc);
            cache.statuses = Some(acc);
            cache.version = self.version;
        }
        f(cache.statuses.as_deref().unwrap_or(&[]))
    }

    fn persist_expanded(&mut self) {
        if self.expanded == self.saved_expanded {
            return;
        }
        let key = format!("{}-expand", self.namespace);
        match serde_json::to_value(&self.expanded) {
            Ok(value) => match self.store.write(&key, &value) {
                Ok(()) => self.saved_expanded = self.expanded.clone(),
                Err(err) => {
                    debug!(key = %key, %err, "expand state write failed, continuing in memory")
                }
            },
            Err(err) => debug!(key = %key, %err, "expand state not serializable"),
        }
    }

    fn persist_checked(&mut self) {
        if self.checked == self.saved_checked {
            return;
        }
        let key = format!("{}-checked", self.namespace);
        match serde_json::to_value(&self.checked) {
            Ok(value) => match self.store.write(&key, &value) {
                Ok(()) => self.saved_checked = self.checked.clone(),
                Err(err) => {
                    debug!(key = %key, %err, "checked state write failed, continuing in memory")
                }
            },
            Err(err) => debug!(key = %key, %err, "checked state not serializable"),
        }
    }
}

/// Expanded entries for every node of the forest, visited in document
/// order: the persisted value when one exists, otherwise open only for
/// `default_open`.
pub fn initial_expanded_state(
    persisted: &HashMap<String, bool>,
    forest: &[TreeNode],
    default_open: Option<&str>,
) -> HashMap<String, bool> {
    let mut acc = HashMap::new();
    fill_expanded(forest, persisted, default_open, &mut acc);
    acc
}

fn fill_expanded(
    nodes: &[TreeNode],
    persisted: &HashMap<String, bool>,
    default_open: Option<&str>,
    acc: &mut HashMap<String, bool>,
) {
    for node in nodes {
        let open = persisted
            .get(&node.value)
            .copied()
            .unwrap_or_else(|| Some(node.value.as_str()) == default_open);
        acc.insert(node.value.clone(), open);
        fill_expanded(node.child_nodes(), persisted, default_open, acc);
    }
}

/// Leaf values of the subtree under `node` (branch descendants are recursed
/// through, not collected).
fn collect_leaf_values(node: &TreeNode, acc: &mut Vec<String>) {
    for child in node.child_nodes() {
        if child.is_leaf() {
            acc.push(child.value.clone());
        } else {
            collect_leaf_values(child, acc);
        }
    }
}

/// One recursion level of the derived-status computation. Returns the
/// statuses produced for `nodes` themselves and appends every status to
/// `acc`.
///
/// A leaf yields an entry only when directly checked. A branch yields a
/// fully-checked or indeterminate entry when every child produced an entry,
/// an indeterminate entry when only some did, and nothing when none did.
fn derive_statuses(
    nodes: &[TreeNode],
    checked: &[String],
    acc: &mut Vec<CheckedStatus>,
) -> Vec<CheckedStatus> {
    let mut level = Vec::new();
    for node in nodes {
        match &node.children {
            Some(kids) => {
                let inner = derive_statuses(kids, checked, acc);
                if inner.len() == kids.len() {
                    let all_checked = inner.iter().all(|s| s.checked);
                    let status = CheckedStatus {
                        value: node.value.clone(),
                        checked: all_checked,
                        indeterminate: !all_checked,
                        has_children: true,
                    };
                    acc.push(status.clone());
                    level.push(status);
                } else if !inner.is_empty() {
                    let status = CheckedStatus {
                        value: node.value.clone(),
                        checked: false,
                        indeterminate: true,
                        has_children: true,
                    };
                    acc.push(status.clone());
                    level.push(status);
                }
            }
            None => {
                if checked.iter().any(|v| v == &node.value) {
                    let status = CheckedStatus {
                        value: node.value.clone(),
                        checked: true,
                        indeterminate: false,
                        has_children: false,
                    };
                    acc.push(status.clone());
                    level.push(status);
                }
            }
        }
    }
    level
}
