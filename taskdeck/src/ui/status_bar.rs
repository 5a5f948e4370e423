//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::App;
use crate::controller::{LoadState, Modal};
use crate::detail::DetailFocus;

/// Render the status bar at the bottom of the screen.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let help_text = if app.controller.overlay().is_some() {
        "Esc: close"
    } else {
        match app.controller.modal() {
            Modal::None => {
                "jk: navigate | Enter: view | n: new | e: edit | d: delete | Space: status | f/p: filter | s: stats | ?: help | q: quit"
            }
            Modal::Create(_) | Modal::Edit(_) => {
                "Tab: next field | ←→: change choice | Enter: save | Esc: cancel"
            }
            Modal::Details(view) if view.focus() == DetailFocus::Thread => {
                "jk: scroll | c: comment | e: edit | d: delete | Esc: close"
            }
            Modal::Details(_) => "Tab: switch input | Enter: add comment | Esc: back",
            Modal::ConfirmDelete { .. } => "y: delete | n: cancel",
        }
    };

    let (dot_color, status_text) = match app.controller.load_state() {
        LoadState::Loading => (theme::WARNING, "Syncing"),
        LoadState::Ready => (theme::SUCCESS, "Synced"),
        LoadState::Error => (theme::ERROR, "Offline"),
    };

    let status_line = Line::from(vec![
        Span::styled(
            concat!("Taskdeck v", env!("CARGO_PKG_VERSION")),
            theme::bold(),
        ),
        Span::raw(" | "),
        Span::styled("●", theme::normal().fg(dot_color)),
        Span::raw(format!(" {status_text} {}", app.endpoint)),
        Span::raw(" | "),
        Span::styled(help_text, theme::dimmed()),
    ]);

    let paragraph = Paragraph::new(status_line).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}
