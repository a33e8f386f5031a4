//! UI rendering functions for the task tracker TUI

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::app::App;

mod components;
mod header_footer;
mod tab_views;

pub use components::{centered_rect, render_search};
pub use header_footer::{render_footer, render_header};
pub use tab_views::{render_tab_bar, render_tree};

/// Main UI rendering function - orchestrates all view rendering
pub fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    // Header
    render_header(f, chunks[0], app);

    // Tab bar + tree content
    let tab_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Tab bar
            Constraint::Min(0),    // Content
        ])
        .split(chunks[1]);

    render_tab_bar(f, tab_chunks[0], app);
    render_tree(f, tab_chunks[1], app.active_tab());

    // Footer
    render_footer(f, chunks[2], app);

    // Search overlay
    if app.show_search {
        render_search(f, f.area(), app);
    }
}
