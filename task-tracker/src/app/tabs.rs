//! Tab state, trader tab switching and session restore

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use task_tracker_sdk::TreeState;

use super::App;

/// Per-trader tab: its own forest, engine and cursor.
pub struct TraderTab {
    pub title: String,
    /// None for the unfiltered "All" tab.
    pub trader: Option<String>,
    pub tree: TreeState,

    // UI state (per tab)
    pub cursor: usize,
    pub scroll_offset: usize,
}

impl App {
    pub fn next_tab(&mut self) {
        if !self.tabs.is_empty() {
            self.active_tab_idx = (self.active_tab_idx + 1) % self.tabs.len();
            self.sync_hover();
        }
    }

    pub fn previous_tab(&mut self) {
        if !self.tabs.is_empty() {
            self.active_tab_idx = if self.active_tab_idx == 0 {
                self.tabs.len() - 1
            } else {
                self.active_tab_idx - 1
            };
            self.sync_hover();
        }
    }

    // Session persistence: which tab and rows were active. Checked and
    // expanded state go through the engines' own stores.
    pub fn save_session(&self) {
        let saved = SavedSession {
            active_tab: self.active_tab().title.clone(),
            cursors: self
                .tabs
                .iter()
                .map(|tab| (tab.title.clone(), tab.cursor))
                .collect(),
        };

        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "task-tracker") {
            let session_path = proj_dirs.data_dir().join("session.json");
            if let Some(parent) = session_path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Ok(json) = serde_json::to_string_pretty(&saved) {
                let _ = std::fs::write(session_path, json);
            }
        }
    }

    pub fn restore_session(&mut self) {
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "task-tracker") {
            let session_path = proj_dirs.data_dir().join("session.json");
            if let Ok(json) = std::fs::read_to_string(session_path) {
                if let Ok(saved) = serde_json::from_str::<SavedSession>(&json) {
                    if let Some(idx) = self.tabs.iter().position(|t| t.title == saved.active_tab) {
                        self.active_tab_idx = idx;
                    }
                    for tab in &mut self.tabs {
                        if let Some(&cursor) = saved.cursors.get(&tab.title) {
                            tab.cursor = cursor;
                            tab.clamp_cursor();
                        }
                    }
                    self.sync_hover();
                }
            }
        }
    }
}

#[derive(Serialize, Deserialize)]
struct SavedSession {
    active_tab: String,
    cursors: HashMap<String, usize>,
}
