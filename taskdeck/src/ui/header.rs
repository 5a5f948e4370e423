//! Title line, filter selectors and the error banner.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::theme;
use crate::app::App;
use crate::filter::Filter;

/// Render the title and the two filter selectors.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let filters = app.controller.filters();
    let count = app.controller.tasks().len();

    let filter_style = |active: bool| {
        if active {
            theme::highlighted()
        } else {
            theme::dimmed()
        }
    };

    let line = Line::from(vec![
        Span::styled("Status: ", theme::dimmed()),
        Span::styled(
            format!("[{}]", filters.status.label()),
            filter_style(filters.status != Filter::All),
        ),
        Span::raw("  "),
        Span::styled("Priority: ", theme::dimmed()),
        Span::styled(
            format!("[{}]", filters.priority.label()),
            filter_style(filters.priority != Filter::All),
        ),
        Span::raw("  "),
        Span::styled(format!("{count} shown"), theme::dimmed()),
    ]);

    let block = Block::default()
        .title(Span::styled(
            " Task Manager ",
            theme::panel_title(theme::TASKS_TITLE),
        ))
        .borders(Borders::ALL)
        .border_style(theme::normal());

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Render the dismissible error banner.
pub fn render_banner(frame: &mut Frame, area: Rect, app: &App) {
    let Some(message) = app.controller.error() else {
        return;
    };

    let line = Line::from(vec![
        Span::styled(message.to_string(), theme::banner()),
        Span::styled("  (x or Ctrl+X to dismiss)", theme::banner()),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::inline_error());

    let paragraph = Paragraph::new(line)
        .style(theme::banner())
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(paragraph, area);
}
