//! Header and footer rendering functions

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

pub fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "Task Tracker - Trader Quest Lines",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  ({} tasks)", app.repo.tasks().len()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("      "),
        Span::styled("[Q]", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("uit"),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

pub fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled("[↑↓]", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" Navigate  "),
        Span::styled("[←→]", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" Trader  "),
        Span::styled("[Enter]", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" Expand  "),
        Span::styled("[Space]", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" Check  "),
        Span::styled("[A/Z]", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" Expand/Collapse All  "),
        Span::styled("[/]", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" Search  "),
        Span::styled("[Q]", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" Quit"),
    ];

    if let Some(saved) = app.last_saved {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("Saved {}", saved.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let footer = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}
