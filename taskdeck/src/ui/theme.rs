//! Theme and styling constants for the TUI.

use ratatui::style::{Color, Modifier, Style};

use crate::card::{PriorityCategory, StatusCategory};

/// Primary foreground color.
pub const FG_PRIMARY: Color = Color::White;

/// Secondary foreground color (dimmed text).
pub const FG_SECONDARY: Color = Color::Gray;

/// Highlight color for focused elements.
pub const HIGHLIGHT: Color = Color::Cyan;

/// Success color.
pub const SUCCESS: Color = Color::Green;

/// Warning color.
pub const WARNING: Color = Color::Yellow;

/// Error color.
pub const ERROR: Color = Color::Red;

/// Panel title color for the task list.
pub const TASKS_TITLE: Color = Color::Green;

/// Panel title color for modal dialogs.
pub const MODAL_TITLE: Color = Color::Cyan;

/// Normal text style.
#[must_use]
pub fn normal() -> Style {
    Style::default().fg(FG_PRIMARY)
}

/// Dimmed text style (timestamps, metadata).
#[must_use]
pub fn dimmed() -> Style {
    Style::default().fg(FG_SECONDARY)
}

/// Bold text style.
#[must_use]
pub fn bold() -> Style {
    Style::default().fg(FG_PRIMARY).add_modifier(Modifier::BOLD)
}

/// Highlighted text style (focused borders, active filter).
#[must_use]
pub fn highlighted() -> Style {
    Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

/// Selected item style (in lists).
#[must_use]
pub fn selected() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Style for the error banner.
#[must_use]
pub fn banner() -> Style {
    Style::default().fg(Color::White).bg(Color::Rgb(114, 28, 36))
}

/// Style for inline validation or request errors.
#[must_use]
pub fn inline_error() -> Style {
    Style::default().fg(ERROR)
}

/// Style for "loading" placeholders (italic, dim blue).
#[must_use]
pub fn loading() -> Style {
    Style::default()
        .fg(Color::Rgb(100, 140, 180))
        .add_modifier(Modifier::ITALIC)
}

/// Style for the status bar background.
#[must_use]
pub fn status_bar_bg() -> Style {
    Style::default().fg(Color::White).bg(Color::Rgb(30, 30, 50))
}

/// Style for panel titles with a given color (bold).
#[must_use]
pub fn panel_title(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Color of a status badge.
#[must_use]
pub const fn status_color(category: StatusCategory) -> Color {
    match category {
        StatusCategory::Pending => WARNING,
        StatusCategory::InProgress => Color::LightBlue,
        StatusCategory::Completed => SUCCESS,
    }
}

/// Color of a priority badge.
#[must_use]
pub const fn priority_color(category: PriorityCategory) -> Color {
    match category {
        PriorityCategory::High => ERROR,
        PriorityCategory::Medium => Color::Rgb(255, 165, 0),
        PriorityCategory::Low => Color::LightGreen,
    }
}

/// Badge style: bold text in the category color.
#[must_use]
pub fn badge(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}
