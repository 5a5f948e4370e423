//! Task list rendering: one card per task.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::theme;
use crate::app::App;
use crate::card::TaskCard;

/// Render the task list, or its loading/empty placeholder.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let tasks = app.controller.tasks();
    let title = if app.controller.is_loading() && !tasks.is_empty() {
        " Tasks (refreshing...) "
    } else {
        " Tasks "
    };
    let block = Block::default()
        .title(Span::styled(title, theme::panel_title(theme::TASKS_TITLE)))
        .borders(Borders::ALL)
        .border_style(theme::normal());

    if tasks.is_empty() {
        let lines = if app.controller.is_loading() {
            vec![Line::from(Span::styled("Loading tasks...", theme::loading()))]
        } else {
            vec![
                Line::from(Span::styled("No tasks found", theme::bold())),
                Line::from(Span::styled(
                    "Press n to create a task or change the filters",
                    theme::dimmed(),
                )),
            ]
        };
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = tasks
        .iter()
        .map(|task| {
            let card = TaskCard::new(task, app.display.preview_len, &app.display.date_format);
            card_item(&card)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(theme::selected())
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(app.controller.cursor()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn card_item(card: &TaskCard<'_>) -> ListItem<'static> {
    let status_color = theme::status_color(card.status);
    let priority_color = theme::priority_color(card.priority);

    let mut header = vec![
        Span::styled(card.task.title.clone(), theme::bold()),
        Span::raw("  "),
        Span::styled(
            format!("[{}]", card.task.status.label()),
            theme::badge(status_color),
        ),
        Span::raw(" "),
        Span::styled(
            format!("[{}]", card.task.priority.label()),
            theme::badge(priority_color),
        ),
    ];
    if let Some(comments) = &card.comments {
        header.push(Span::raw("  "));
        header.push(Span::styled(comments.clone(), theme::dimmed()));
    }

    let mut lines = vec![Line::from(header)];
    if let Some(description) = &card.description {
        lines.push(Line::from(Span::styled(
            format!("  {description}"),
            theme::normal(),
        )));
    }
    if let Some(due) = &card.due {
        lines.push(Line::from(Span::styled(format!("  {due}"), theme::dimmed())));
    }

    ListItem::new(lines)
}
