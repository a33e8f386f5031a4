//! Core library for the task tracker: the task dataset repository, the
//! dependency forest builder, the tree state engine, and the persistence
//! adapters behind it. The presentation layer consumes only plain data
//! structures from here.

pub mod state;
pub mod store;
pub mod task;
pub mod tree;

pub use state::{initial_expanded_state, CheckedStatus, TreeState, TreeStateOptions};
pub use store::{JsonFileStore, MemoryStore, SqliteStore, StateStore};
pub use task::{trader_order, TaskRecord, TaskRepository};
pub use tree::{build_forest, find_node, parent_value, NodeMeta, TreeNode};
