//! Terminal UI rendering.
//!
//! Renderers only read application state; they never mutate it.

pub mod detail;
pub mod editor;
pub mod header;
pub mod overlays;
pub mod status_bar;
pub mod task_list;
pub mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};

use crate::app::App;
use crate::controller::Modal;

/// Main draw function for the entire UI.
pub fn draw(frame: &mut Frame, app: &App) {
    let banner_height = if app.controller.error().is_some() { 3 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Title and filters
            Constraint::Length(banner_height), // Error banner
            Constraint::Min(3),                // Task list
            Constraint::Length(1),             // Status bar
        ])
        .split(frame.area());

    header::render(frame, chunks[0], app);
    if banner_height > 0 {
        header::render_banner(frame, chunks[1], app);
    }
    task_list::render(frame, chunks[2], app);
    status_bar::render(frame, chunks[3], app);

    match app.controller.modal() {
        Modal::None => {}
        Modal::Create(editor) | Modal::Edit(editor) => {
            editor::render(frame, centered_rect(70, 70, frame.area()), editor);
        }
        Modal::Details(view) => {
            detail::render(frame, centered_rect(80, 85, frame.area()), view, &app.display);
        }
        Modal::ConfirmDelete { title, .. } => {
            overlays::render_confirm_delete(frame, centered_rect(50, 25, frame.area()), title);
        }
    }

    if let Some(overlay) = app.controller.overlay() {
        overlays::render(frame, centered_rect(60, 60, frame.area()), overlay);
    }
}

/// A rectangle of `percent_x` by `percent_y` of `area`, centered in it.
#[must_use]
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
