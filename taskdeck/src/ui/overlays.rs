//! Popups drawn above everything else: about, statistics and the delete
//! confirmation.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use taskdeck_proto::{Priority, TaskStats, TaskStatus};

use super::theme;
use crate::card::{PriorityCategory, StatusCategory};
use crate::controller::{Overlay, StatsView};

const KEY_BINDINGS: &[(&str, &str)] = &[
    ("j / k", "Move selection"),
    ("Enter / v", "View task and comments"),
    ("n", "New task"),
    ("e", "Edit task"),
    ("d", "Delete task"),
    ("Space", "Advance status"),
    ("f / p", "Cycle status / priority filter"),
    ("c", "Clear filters"),
    ("r", "Refresh"),
    ("s", "Statistics"),
    ("x / Ctrl+X", "Dismiss error"),
    ("q", "Quit"),
];

/// Render an informational overlay.
pub fn render(frame: &mut Frame, area: Rect, overlay: &Overlay) {
    let (title, lines) = match overlay {
        Overlay::About => (" About ", about_lines()),
        Overlay::Stats(view) => (" Statistics ", stats_lines(view)),
    };

    let block = Block::default()
        .title(Span::styled(title, theme::panel_title(theme::MODAL_TITLE)))
        .borders(Borders::ALL)
        .border_style(theme::highlighted());

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        area,
    );
}

/// Render the delete confirmation prompt.
pub fn render_confirm_delete(frame: &mut Frame, area: Rect, title: &str) {
    let lines = vec![
        Line::from(Span::styled(
            "Are you sure you want to delete this task?",
            theme::bold(),
        )),
        Line::from(Span::styled(title.to_string(), theme::normal())),
        Line::default(),
        Line::from(vec![
            Span::styled("[y] Delete", theme::inline_error()),
            Span::raw("   "),
            Span::styled("[n] Cancel", theme::dimmed()),
        ]),
    ];

    let block = Block::default()
        .title(Span::styled(" Delete Task ", theme::panel_title(theme::ERROR)))
        .borders(Borders::ALL)
        .border_style(theme::inline_error());

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}

fn about_lines() -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            concat!("Taskdeck v", env!("CARGO_PKG_VERSION")),
            theme::bold(),
        )),
        Line::from(Span::styled(
            "Terminal client for a remote task-tracking service.",
            theme::dimmed(),
        )),
        Line::default(),
    ];
    lines.extend(KEY_BINDINGS.iter().map(|(keys, action)| {
        Line::from(vec![
            Span::styled(format!("{keys:<12}"), theme::highlighted()),
            Span::styled(*action, theme::normal()),
        ])
    }));
    lines
}

fn stats_lines(view: &StatsView) -> Vec<Line<'static>> {
    match view {
        StatsView::Loading => vec![Line::from(Span::styled(
            "Loading statistics...",
            theme::loading(),
        ))],
        StatsView::Failed(message) => vec![Line::from(Span::styled(
            message.clone(),
            theme::inline_error(),
        ))],
        StatsView::Loaded(stats) => loaded_stats_lines(stats),
    }
}

fn loaded_stats_lines(stats: &TaskStats) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Total tasks: ", theme::dimmed()),
            Span::styled(stats.total_tasks.to_string(), theme::bold()),
        ]),
        Line::default(),
        Line::from(Span::styled("By status", theme::bold())),
    ];
    lines.extend(TaskStatus::ALL.iter().map(|status| {
        count_line(
            status.label(),
            stats.status_count(*status),
            theme::status_color(StatusCategory::from(*status)),
        )
    }));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("By priority", theme::bold())));
    lines.extend(Priority::ALL.iter().map(|priority| {
        count_line(
            priority.label(),
            stats.priority_count(*priority),
            theme::priority_color(PriorityCategory::from(*priority)),
        )
    }));
    lines
}

fn count_line(label: &'static str, count: u64, color: ratatui::style::Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {label:<12}"), theme::badge(color)),
        Span::styled(count.to_string(), theme::normal()),
    ])
}
