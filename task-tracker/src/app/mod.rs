//! Application state and module organization
//!
//! One tab per trader (plus the unfiltered "All" tab), each owning its own
//! built forest and state engine. The engines persist their checked and
//! expanded state per tab namespace through whatever store the CLI picked.

use task_tracker_sdk::{build_forest, StateStore, TaskRepository, TreeState, TreeStateOptions};

mod navigation;
mod search;
mod tabs;

pub use navigation::VisibleRow;
pub use search::SearchHit;
pub use tabs::TraderTab;

/// Main application state
pub struct App {
    pub repo: TaskRepository,

    // Tab management
    pub tabs: Vec<TraderTab>,
    pub active_tab_idx: usize,

    pub should_quit: bool,

    // Search overlay state
    pub show_search: bool,
    pub search_input: String,
    pub search_matches: Vec<SearchHit>,
    pub search_selected: usize,

    // Persistence feedback for the footer
    pub last_saved: Option<chrono::DateTime<chrono::Local>>,
}

impl App {
    pub fn new(
        repo: TaskRepository,
        namespace_prefix: &str,
        multiple: bool,
        initial_trader: Option<&str>,
        make_store: impl Fn() -> Box<dyn StateStore>,
    ) -> Self {
        let mut tabs = Vec::new();
        for trader in repo.traders() {
            tabs.push(TraderTab::new(
                trader.clone(),
                Some(trader),
                &repo,
                namespace_prefix,
                multiple,
                make_store(),
            ));
        }
        tabs.push(TraderTab::new(
            "All".to_string(),
            None,
            &repo,
            namespace_prefix,
            multiple,
            make_store(),
        ));

        let active_tab_idx = initial_trader
            .and_then(|name| tabs.iter().position(|tab| tab.title == name))
            .unwrap_or(0);

        let mut app = Self {
            repo,
            tabs,
            active_tab_idx,
            should_quit: false,
            show_search: false,
            search_input: String::new(),
            search_matches: Vec::new(),
            search_selected: 0,
            last_saved: None,
        };
        app.sync_hover();
        app
    }

    pub fn active_tab(&self) -> &TraderTab {
        &self.tabs[self.active_tab_idx]
    }

    pub fn active_tab_mut(&mut self) -> &mut TraderTab {
        &mut self.tabs[self.active_tab_idx]
    }

    pub(crate) fn mark_saved(&mut self) {
        self.last_saved = Some(chrono::Local::now());
    }
}

impl TraderTab {
    pub fn new(
        title: String,
        trader: Option<String>,
        repo: &TaskRepository,
        namespace_prefix: &str,
        multiple: bool,
        store: Box<dyn StateStore>,
    ) -> Self {
        let forest = build_forest(repo.tasks(), trader.as_deref());
        let namespace = match &trader {
            Some(name) => format!("{}-{}", namespace_prefix, sanitize(name)),
            None => format!("{}-all", namespace_prefix),
        };
        let opts = TreeStateOptions {
            namespace,
            multiple,
            ..Default::default()
        };
        Self {
            title,
            trader,
            tree: TreeState::new(forest, opts, store),
            cursor: 0,
            scroll_offset: 0,
        }
    }
}

fn sanitize(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}
