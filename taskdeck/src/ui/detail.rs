//! Task detail view: full task, comment thread and the add-comment form.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::editor::{field_line, input_text};
use super::theme;
use crate::app::DisplaySettings;
use crate::card::{PriorityCategory, StatusCategory};
use crate::detail::{DetailFocus, DetailView};

/// Render the detail popup.
pub fn render(frame: &mut Frame, area: Rect, view: &DetailView, display: &DisplaySettings) {
    frame.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9), // Task
            Constraint::Min(4),    // Comments
            Constraint::Length(6), // Add comment
        ])
        .split(area);

    render_task(frame, chunks[0], view, display);
    render_comments(frame, chunks[1], view, display);
    render_form(frame, chunks[2], view);
}

fn render_task(frame: &mut Frame, area: Rect, view: &DetailView, display: &DisplaySettings) {
    let task = view.task();
    let fmt = display.datetime_format.as_str();

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Status: ", theme::dimmed()),
            Span::styled(
                task.status.label(),
                theme::badge(theme::status_color(StatusCategory::from(task.status))),
            ),
            Span::raw("   "),
            Span::styled("Priority: ", theme::dimmed()),
            Span::styled(
                task.priority.label(),
                theme::badge(theme::priority_color(PriorityCategory::from(task.priority))),
            ),
        ]),
        Line::from(Span::styled(
            task.description_text().unwrap_or("No description").to_string(),
            theme::normal(),
        )),
    ];
    if let Some(due) = task.due_date {
        lines.push(Line::from(Span::styled(
            format!("Due: {}", due.format(fmt)),
            theme::normal(),
        )));
    }
    lines.push(Line::from(Span::styled(
        format!(
            "Created: {}   Updated: {}",
            task.created_at.format(fmt),
            task.updated_at.format(fmt)
        ),
        theme::dimmed(),
    )));

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", task.title),
            theme::panel_title(theme::MODAL_TITLE),
        ))
        .borders(Borders::ALL)
        .border_style(theme::highlighted());

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        area,
    );
}

fn render_comments(frame: &mut Frame, area: Rect, view: &DetailView, display: &DisplaySettings) {
    let comments = view.comments();
    let border = if view.focus() == DetailFocus::Thread {
        theme::highlighted()
    } else {
        theme::normal()
    };
    let block = Block::default()
        .title(Span::styled(
            format!(" Comments ({}) ", comments.len()),
            theme::bold(),
        ))
        .borders(Borders::ALL)
        .border_style(border);

    let lines: Vec<Line> = if view.is_loading() {
        vec![Line::from(Span::styled("Loading comments...", theme::loading()))]
    } else if comments.is_empty() {
        vec![Line::from(Span::styled(
            "No comments yet. Be the first to comment!",
            theme::dimmed(),
        ))]
    } else {
        comments
            .iter()
            .skip(view.scroll())
            .flat_map(|comment| {
                let edited = if comment.updated_at.is_some() {
                    " (edited)"
                } else {
                    ""
                };
                [
                    Line::from(vec![
                        Span::styled(comment.author.clone(), theme::bold()),
                        Span::styled(
                            format!(
                                "  {}{edited}",
                                comment.created_at.format(&display.datetime_format)
                            ),
                            theme::dimmed(),
                        ),
                    ]),
                    Line::from(Span::styled(comment.content.clone(), theme::normal())),
                ]
            })
            .collect()
    };

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        area,
    );
}

fn render_form(frame: &mut Frame, area: Rect, view: &DetailView) {
    let focus = view.focus();

    let mut lines = vec![
        field_line(
            "Comment",
            input_text(&view.content, focus == DetailFocus::Content),
            focus == DetailFocus::Content,
        ),
        field_line(
            "Author",
            input_text(&view.author, focus == DetailFocus::Author),
            focus == DetailFocus::Author,
        ),
    ];

    if let Some(error) = view.error() {
        lines.push(Line::from(Span::styled(error.to_string(), theme::inline_error())));
    }
    lines.push(Line::from(if view.is_submitting() {
        Span::styled("Adding...", theme::loading())
    } else {
        Span::styled("[Enter] Add Comment", theme::dimmed())
    }));

    let border = if focus == DetailFocus::Thread {
        theme::normal()
    } else {
        theme::highlighted()
    };
    let block = Block::default()
        .title(Span::styled(" Add Comment ", theme::bold()))
        .borders(Borders::ALL)
        .border_style(border);

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
