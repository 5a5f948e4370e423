//! Application state and key handling.
//!
//! [`App`] wraps the [`Controller`] with the display settings and the quit
//! flag. Key events are translated into controller operations; any request
//! they produce is returned to the event loop for dispatch.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::ClientConfig;
use crate::controller::{Controller, Intent, Modal};
use crate::detail::DetailFocus;
use crate::editor::{EditorField, TextInput};
use crate::filter::FilterState;
use crate::net::ApiCommand;

/// Display settings taken from the resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySettings {
    /// Due-date format on task cards.
    pub date_format: String,
    /// Timestamp format in the detail view.
    pub datetime_format: String,
    /// Description characters shown on a card before truncation.
    pub preview_len: usize,
}

impl From<&ClientConfig> for DisplaySettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            date_format: config.date_format.clone(),
            datetime_format: config.datetime_format.clone(),
            preview_len: config.description_preview_len,
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self::from(&ClientConfig::default())
    }
}

/// Main application state.
#[derive(Debug, Default)]
pub struct App {
    pub controller: Controller,
    pub display: DisplaySettings,
    /// API root shown in the status bar.
    pub endpoint: String,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl App {
    /// Create the app from resolved configuration. Nothing is requested
    /// until [`App::mount`] is called.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            controller: Controller::new(config.initial_filters),
            display: DisplaySettings::from(config),
            endpoint: config.base_url.clone(),
            should_quit: false,
        }
    }

    /// Initial list request.
    pub fn mount(&mut self) -> ApiCommand {
        self.controller.refresh()
    }

    /// Handle a key event, returning the request to dispatch, if any.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<ApiCommand> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => {
                    self.should_quit = true;
                    return None;
                }
                // Works with a form open, where a plain `x` is text.
                KeyCode::Char('x') => {
                    self.controller.dismiss_error();
                    return None;
                }
                _ => {}
            }
        }

        if self.controller.overlay().is_some() {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q' | '?' | 's')
            ) {
                self.controller.close_overlay();
            }
            return None;
        }

        match self.controller.modal() {
            Modal::None => self.handle_list_key(key),
            Modal::Create(_) | Modal::Edit(_) => self.handle_editor_key(key),
            Modal::Details(_) => self.handle_detail_key(key),
            Modal::ConfirmDelete { .. } => self.handle_confirm_key(key),
        }
    }

    /// Keys on the task list.
    fn handle_list_key(&mut self, key: KeyEvent) -> Option<ApiCommand> {
        let selected = self.controller.selected_task().map(|t| (t.id, t.status));
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.controller.select_prev();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.controller.select_next();
                None
            }
            KeyCode::Enter | KeyCode::Char('v') => {
                let (id, _) = selected?;
                self.controller.dispatch(Intent::ViewTask(id))
            }
            KeyCode::Char('n' | 'a') => self.controller.dispatch(Intent::NewTask),
            KeyCode::Char('e') => {
                let (id, _) = selected?;
                self.controller.dispatch(Intent::EditTask(id))
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                let (id, _) = selected?;
                self.controller.dispatch(Intent::DeleteTask(id))
            }
            KeyCode::Char(' ') | KeyCode::Right => {
                let (id, status) = selected?;
                self.controller
                    .dispatch(Intent::StatusChange(id, status.next()))
            }
            KeyCode::Char('f') => self.controller.cycle_status_filter(),
            KeyCode::Char('p') => self.controller.cycle_priority_filter(),
            KeyCode::Char('c') => self.controller.set_filters(FilterState::default()),
            KeyCode::Char('r') => Some(self.controller.refresh()),
            KeyCode::Char('s') => Some(self.controller.open_stats()),
            KeyCode::Char('?') => {
                self.controller.toggle_about();
                None
            }
            KeyCode::Char('x') => {
                self.controller.dismiss_error();
                None
            }
            _ => None,
        }
    }

    /// Keys inside the create/edit form.
    fn handle_editor_key(&mut self, key: KeyEvent) -> Option<ApiCommand> {
        match key.code {
            KeyCode::Esc => {
                self.controller.close_modal();
                return None;
            }
            KeyCode::Enter => {
                // Validation errors are shown inline by the editor.
                return self.controller.submit_editor().ok();
            }
            _ => {}
        }

        let (Modal::Create(editor) | Modal::Edit(editor)) = self.controller.modal_mut() else {
            return None;
        };
        match key.code {
            KeyCode::Tab | KeyCode::Down => editor.focus_next(),
            KeyCode::BackTab | KeyCode::Up => editor.focus_prev(),
            _ if matches!(editor.focus(), EditorField::Status | EditorField::Priority) => {
                if matches!(key.code, KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')) {
                    editor.cycle_choice();
                }
            }
            _ => {
                if let Some(input) = editor.focused_input() {
                    edit_text(input, key);
                }
            }
        }
        None
    }

    /// Keys inside the detail view.
    fn handle_detail_key(&mut self, key: KeyEvent) -> Option<ApiCommand> {
        let Modal::Details(view) = self.controller.modal_mut() else {
            return None;
        };
        let task_id = view.task_id();

        if view.focus() == DetailFocus::Thread {
            match key.code {
                KeyCode::Esc | KeyCode::Char('q') => self.controller.close_modal(),
                KeyCode::Tab | KeyCode::Char('c' | 'i') => view.cycle_focus(),
                KeyCode::Up | KeyCode::Char('k') => view.scroll_up(),
                KeyCode::Down | KeyCode::Char('j') => view.scroll_down(),
                KeyCode::Char('e') => return self.controller.dispatch(Intent::EditTask(task_id)),
                KeyCode::Char('d') => {
                    return self.controller.dispatch(Intent::DeleteTask(task_id));
                }
                _ => {}
            }
            return None;
        }

        match key.code {
            KeyCode::Esc => view.set_focus(DetailFocus::Thread),
            KeyCode::Tab | KeyCode::BackTab => view.cycle_focus(),
            KeyCode::Enter => return self.controller.submit_comment().ok(),
            _ => {
                if let Some(input) = view.focused_input() {
                    edit_text(input, key);
                }
            }
        }
        None
    }

    /// Keys on the delete confirmation prompt.
    fn handle_confirm_key(&mut self, key: KeyEvent) -> Option<ApiCommand> {
        match key.code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => self.controller.confirm_delete(),
            KeyCode::Char('n' | 'N') | KeyCode::Esc => {
                self.controller.cancel_delete();
                None
            }
            _ => None,
        }
    }
}

/// Apply a text-editing key to `input`.
fn edit_text(input: &mut TextInput, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => input.insert(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        _ => {}
    }
}
