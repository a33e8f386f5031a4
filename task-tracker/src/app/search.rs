//! Fuzzy task search overlay

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use task_tracker_sdk::TreeNode;

use super::App;

const MAX_MATCHES: usize = 20;

/// One search result over the active tab's forest.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub value: String,
    pub label: String,
    pub score: i64,
}

impl App {
    pub fn open_search(&mut self) {
        self.show_search = true;
        self.search_input.clear();
        self.search_matches.clear();
        self.search_selected = 0;
    }

    pub fn close_search(&mut self) {
        self.show_search = false;
        self.search_input.clear();
        self.search_matches.clear();
        self.search_selected = 0;
    }

    /// Re-match the whole forest (not only visible rows) against the
    /// current input.
    pub fn update_search_matches(&mut self) {
        self.search_selected = 0;
        if self.search_input.is_empty() {
            self.search_matches.clear();
            return;
        }

        let matcher = SkimMatcherV2::default();
        let mut hits = Vec::new();
        collect_hits(
            self.active_tab().tree.forest(),
            &matcher,
            &self.search_input,
            &mut hits,
        );
        hits.sort_by(|a, b| b.score.cmp(&a.score));
        hits.truncate(MAX_MATCHES);
        self.search_matches = hits;
    }

    pub fn search_next(&mut self) {
        if self.search_selected + 1 < self.search_matches.len() {
            self.search_selected += 1;
        }
    }

    pub fn search_previous(&mut self) {
        if self.search_selected > 0 {
            self.search_selected -= 1;
        }
    }

    /// Jump the cursor to the selected match and close the overlay.
    pub fn confirm_search(&mut self) {
        if let Some(hit) = self.search_matches.get(self.search_selected).cloned() {
            self.jump_to_value(&hit.value);
        }
        self.close_search();
    }

    /// Expand every ancestor of `value` so it becomes visible, then put the
    /// cursor on it.
    pub fn jump_to_value(&mut self, value: &str) {
        let tab = self.active_tab_mut();
        for ancestor in tab.tree.ancestors(value) {
            tab.tree.expand(&ancestor);
        }
        if let Some(pos) = tab
            .visible_rows()
            .iter()
            .position(|row| row.value == value)
        {
            tab.cursor = pos;
        }
        self.sync_hover();
        self.mark_saved();
    }
}

fn collect_hits(
    nodes: &[TreeNode],
    matcher: &SkimMatcherV2,
    input: &str,
    acc: &mut Vec<SearchHit>,
) {
    for node in nodes {
        if let Some(score) = matcher.fuzzy_match(&node.label, input) {
            acc.push(SearchHit {
                value: node.value.clone(),
                label: node.label.clone(),
                score,
            });
        }
        collect_hits(node.child_nodes(), matcher, input, acc);
    }
}
