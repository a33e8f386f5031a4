//! Cursor movement over the visible tree and check/expand actions

use task_tracker_sdk::{TreeNode, TreeState};

use super::{App, TraderTab};

/// One rendered line of the tree: a node that is currently visible given
/// the expanded state.
#[derive(Debug, Clone)]
pub struct VisibleRow {
    pub value: String,
    pub label: String,
    pub depth: usize,
    pub is_leaf: bool,
}

impl TraderTab {
    /// Flatten the forest into its currently visible rows, in document
    /// order, descending only into expanded branches.
    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        fn walk(nodes: &[TreeNode], depth: usize, tree: &TreeState, rows: &mut Vec<VisibleRow>) {
            for node in nodes {
                rows.push(VisibleRow {
                    value: node.value.clone(),
                    label: node.label.clone(),
                    depth,
                    is_leaf: node.is_leaf(),
                });
                if !node.is_leaf() && tree.is_expanded(&node.value) {
                    walk(node.child_nodes(), depth + 1, tree, rows);
                }
            }
        }

        let mut rows = Vec::new();
        walk(self.tree.forest(), 0, &self.tree, &mut rows);
        rows
    }

    pub fn cursor_value(&self) -> Option<String> {
        self.visible_rows().get(self.cursor).map(|row| row.value.clone())
    }

    /// Keep the cursor on a row after a collapse shrank the visible list.
    pub fn clamp_cursor(&mut self) {
        let len = self.visible_rows().len();
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }
}

impl App {
    pub fn next_row(&mut self) {
        let tab = self.active_tab_mut();
        let len = tab.visible_rows().len();
        if tab.cursor + 1 < len {
            tab.cursor += 1;
        }
        self.sync_hover();
    }

    pub fn previous_row(&mut self) {
        let tab = self.active_tab_mut();
        if tab.cursor > 0 {
            tab.cursor -= 1;
        }
        self.sync_hover();
    }

    /// Mirror the cursor into the engine's hover state.
    pub(crate) fn sync_hover(&mut self) {
        let tab = self.active_tab_mut();
        let value = tab.cursor_value();
        tab.tree.set_hovered(value);
    }

    pub fn toggle_expand_at_cursor(&mut self) {
        let tab = self.active_tab_mut();
        if let Some(row) = tab.visible_rows().get(tab.cursor).cloned() {
            if !row.is_leaf {
                tab.tree.toggle_expanded(&row.value);
                tab.clamp_cursor();
                self.sync_hover();
                self.mark_saved();
            }
        }
    }

    pub fn toggle_check_at_cursor(&mut self) {
        let tab = self.active_tab_mut();
        if let Some(value) = tab.cursor_value() {
            if tab.tree.is_node_checked(&value) {
                tab.tree.uncheck_node(&value);
            } else {
                tab.tree.check_node(&value);
            }
            self.mark_saved();
        }
    }

    pub fn expand_all_current(&mut self) {
        self.active_tab_mut().tree.expand_all();
        self.mark_saved();
    }

    pub fn collapse_all_current(&mut self) {
        let tab = self.active_tab_mut();
        tab.tree.collapse_all();
        tab.clamp_cursor();
        self.sync_hover();
        self.mark_saved();
    }

    pub fn toggle_select_at_cursor(&mut self) {
        let tab = self.active_tab_mut();
        if let Some(value) = tab.cursor_value() {
            tab.tree.toggle_selected(&value);
        }
    }

    pub fn clear_selection_current(&mut self) {
        self.active_tab_mut().tree.clear_selected();
    }

    pub fn update_scroll(&mut self, viewport_height: usize) {
        // Keep the cursor line visible with some padding at top and bottom
        let tab = self.active_tab_mut();
        let padding = 2;
        let visible_lines = viewport_height.saturating_sub(2); // Account for borders

        if tab.cursor < tab.scroll_offset + padding {
            tab.scroll_offset = tab.cursor.saturating_sub(padding);
        } else if tab.cursor >= tab.scroll_offset + visible_lines.saturating_sub(padding) {
            tab.scroll_offset = tab
                .cursor
                .saturating_sub(visible_lines.saturating_sub(padding).saturating_sub(1));
        }
    }
}
