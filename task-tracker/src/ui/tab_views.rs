//! Trader tab bar and tree rendering functions

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use task_tracker_sdk::TreeNode;

use crate::app::{App, TraderTab};

pub fn render_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();

    for (i, tab) in app.tabs.iter().enumerate() {
        let is_active = i == app.active_tab_idx;

        let (done, total) = progress(tab);
        let title = format!("[ {} {}/{} ]", tab.title, done, total);

        let style = if is_active {
            Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        spans.push(Span::styled(title, style));
        spans.push(Span::raw(" ")); // Space between tabs
    }

    let tabs_line = Line::from(spans);
    let separator = Line::from("━".repeat(area.width as usize));

    let paragraph = Paragraph::new(vec![tabs_line, separator]);
    f.render_widget(paragraph, area);
}

/// Checked tasks out of all tasks in this tab's forest.
fn progress(tab: &TraderTab) -> (usize, usize) {
    fn count(nodes: &[TreeNode], tab: &TraderTab, done: &mut usize, total: &mut usize) {
        for node in nodes {
            *total += 1;
            if tab.tree.is_node_checked(&node.value) {
                *done += 1;
            }
            count(node.child_nodes(), tab, done, total);
        }
    }

    let mut done = 0;
    let mut total = 0;
    count(tab.tree.forest(), tab, &mut done, &mut total);
    (done, total)
}

pub fn render_tree(f: &mut Frame, area: Rect, tab: &TraderTab) {
    let title = format!(" {} ", tab.title);

    let mut lines: Vec<Line> = Vec::new();
    let rows = tab.visible_rows();

    if rows.is_empty() {
        lines.push(Line::from(Span::styled(
            "No tasks for this trader",
            Style::default().fg(Color::Gray),
        )));
    }

    for (i, row) in rows.iter().enumerate() {
        let is_cursor = i == tab.cursor;
        let is_selected = tab.tree.is_selected(&row.value);

        let checked = tab.tree.is_node_checked(&row.value);
        let indeterminate = !checked && tab.tree.is_node_indeterminate(&row.value);

        let check_icon = if checked {
            "☑"
        } else if indeterminate {
            "◪"
        } else {
            "☐"
        };
        let check_color = if checked {
            Color::Green
        } else if indeterminate {
            Color::Yellow
        } else {
            Color::Gray
        };

        let mut spans = vec![Span::raw("  ".repeat(row.depth))];

        if row.is_leaf {
            spans.push(Span::raw("  "));
        } else {
            let expand_icon = if tab.tree.is_expanded(&row.value) {
                "▼"
            } else {
                "▶"
            };
            spans.push(Span::styled(
                format!("{} ", expand_icon),
                Style::default().fg(Color::Cyan),
            ));
        }

        spans.push(Span::styled(
            format!("{} ", check_icon),
            Style::default().fg(check_color),
        ));

        let mut label_style = if is_selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else if checked {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::White)
        };
        if is_cursor {
            label_style = label_style.add_modifier(Modifier::REVERSED);
        }
        spans.push(Span::styled(row.label.clone(), label_style));

        // Trader and wiki link as a dimmed suffix
        if let Some(node) = tab.tree.find_node(&row.value) {
            if tab.trader.is_none() {
                spans.push(Span::styled(
                    format!("  [{}]", node.meta.trader),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            if let Some(link) = &node.meta.wiki_link {
                spans.push(Span::styled(
                    format!("  {}", link),
                    Style::default().fg(Color::DarkGray),
                ));
            }
        }

        lines.push(Line::from(spans));
    }

    let content = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .style(Style::default().fg(Color::White)),
        )
        .scroll((tab.scroll_offset as u16, 0));

    f.render_widget(content, area);
}
