//! Create/edit form rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::theme;
use crate::editor::{EditorField, EditorMode, TaskEditor, TextInput};

/// Render `input`'s text, with a block cursor when focused.
#[must_use]
pub fn input_text(input: &TextInput, focused: bool) -> String {
    if !focused {
        return input.value().to_string();
    }
    let mut text: String = input.value().chars().take(input.cursor()).collect();
    text.push('█');
    text.extend(input.value().chars().skip(input.cursor()));
    text
}

/// One labelled form row.
#[must_use]
pub fn field_line(label: &str, value: String, focused: bool) -> Line<'static> {
    let label_style = if focused {
        theme::highlighted()
    } else {
        theme::dimmed()
    };
    Line::from(vec![
        Span::styled(format!("{label:<12}"), label_style),
        Span::styled(value, theme::normal()),
    ])
}

/// Render the editor popup.
pub fn render(frame: &mut Frame, area: Rect, editor: &TaskEditor) {
    let title = match editor.mode() {
        EditorMode::Create => " Create New Task ",
        EditorMode::Edit(_) => " Edit Task ",
    };
    let focus = editor.focus();

    let mut lines = vec![
        field_line(
            EditorField::Title.label(),
            input_text(&editor.title, focus == EditorField::Title),
            focus == EditorField::Title,
        ),
        field_line(
            EditorField::Description.label(),
            input_text(&editor.description, focus == EditorField::Description),
            focus == EditorField::Description,
        ),
        field_line(
            EditorField::Status.label(),
            format!("< {} >", editor.status.label()),
            focus == EditorField::Status,
        ),
        field_line(
            EditorField::Priority.label(),
            format!("< {} >", editor.priority.label()),
            focus == EditorField::Priority,
        ),
        field_line(
            EditorField::DueDate.label(),
            input_text(&editor.due_date, focus == EditorField::DueDate),
            focus == EditorField::DueDate,
        ),
        Line::from(Span::styled(
            "            YYYY-MM-DD, blank for none",
            theme::dimmed(),
        )),
        Line::default(),
    ];

    if let Some(error) = editor.error() {
        lines.push(Line::from(Span::styled(error.to_string(), theme::inline_error())));
    }

    let action = match (editor.is_submitting(), editor.mode()) {
        (true, EditorMode::Create) => Span::styled("Creating...", theme::loading()),
        (true, EditorMode::Edit(_)) => Span::styled("Saving...", theme::loading()),
        (false, EditorMode::Create) => Span::styled("[Enter] Create Task", theme::bold()),
        (false, EditorMode::Edit(_)) => Span::styled("[Enter] Save Changes", theme::bold()),
    };
    lines.push(Line::from(vec![
        action,
        Span::raw("   "),
        Span::styled("[Esc] Cancel", theme::dimmed()),
    ]));

    let block = Block::default()
        .title(Span::styled(title, theme::panel_title(theme::MODAL_TITLE)))
        .borders(Borders::ALL)
        .border_style(theme::highlighted());

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(block),
        area,
    );
}
