//! Task create/edit form state.
//!
//! The editor validates its fields locally and produces either a
//! [`NewTask`] or a [`TaskPatch`]. It never talks to the service itself; the
//! controller forwards the submission and reports failures back through
//! [`TaskEditor::fail`], leaving the user's input intact.

use taskdeck_proto::task::MAX_TITLE_LENGTH;
use taskdeck_proto::{NewTask, Priority, Task, TaskId, TaskPatch, TaskStatus, Timestamp, TimestampError};

/// Client-side validation failures. Nothing is sent when one occurs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Title is required")]
    EmptyTitle,

    #[error("Title must be at most {max} characters")]
    TitleTooLong { max: usize },

    #[error("Invalid due date: {0}")]
    InvalidDueDate(#[from] TimestampError),

    #[error("Comment cannot be empty")]
    EmptyComment,

    #[error("Comment must be at most {max} characters")]
    CommentTooLong { max: usize },

    #[error("Author must be at most {max} characters")]
    AuthorTooLong { max: usize },

    /// A previous submission has not completed yet.
    #[error("A submission is already in progress")]
    SubmitInFlight,

    /// No form is open.
    #[error("Nothing to submit")]
    NothingToSubmit,
}

/// Single-line text input with a character-indexed cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    /// An input prefilled with `value`, cursor at the end.
    #[must_use]
    pub fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Cursor position in characters.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(i, _)| i)
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = self.byte_index(self.cursor - 1);
        self.value.remove(at);
        self.cursor -= 1;
    }

    /// Delete the character under the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    pub const fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }

    pub const fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.value.chars().count();
    }
}

/// Whether the editor creates a new task or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(TaskId),
}

/// Editor fields in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    Title,
    Description,
    Status,
    Priority,
    DueDate,
}

impl EditorField {
    const ORDER: [Self; 5] = [
        Self::Title,
        Self::Description,
        Self::Status,
        Self::Priority,
        Self::DueDate,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    #[must_use]
    pub fn prev(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Description => "Description",
            Self::Status => "Status",
            Self::Priority => "Priority",
            Self::DueDate => "Due date",
        }
    }
}

/// A validated editor submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(NewTask),
    Update(TaskId, TaskPatch),
}

/// State of the create/edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEditor {
    mode: EditorMode,
    pub title: TextInput,
    pub description: TextInput,
    pub status: TaskStatus,
    pub priority: Priority,
    /// `YYYY-MM-DD` or a full ISO 8601 date-time; blank means none.
    pub due_date: TextInput,
    focus: EditorField,
    submitting: bool,
    error: Option<String>,
}

impl TaskEditor {
    /// An empty form for a new task.
    #[must_use]
    pub fn create() -> Self {
        Self {
            mode: EditorMode::Create,
            title: TextInput::default(),
            description: TextInput::default(),
            status: TaskStatus::default(),
            priority: Priority::default(),
            due_date: TextInput::default(),
            focus: EditorField::Title,
            submitting: false,
            error: None,
        }
    }

    /// A form prefilled from `task`.
    #[must_use]
    pub fn edit(task: &Task) -> Self {
        Self {
            mode: EditorMode::Edit(task.id),
            title: TextInput::with_value(task.title.clone()),
            description: TextInput::with_value(task.description.clone().unwrap_or_default()),
            status: task.status,
            priority: task.priority,
            due_date: TextInput::with_value(
                task.due_date
                    .map(|d| d.format("%Y-%m-%d"))
                    .unwrap_or_default(),
            ),
            focus: EditorField::Title,
            submitting: false,
            error: None,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> EditorMode {
        self.mode
    }

    /// The task being edited, if any.
    #[must_use]
    pub const fn target(&self) -> Option<TaskId> {
        match self.mode {
            EditorMode::Create => None,
            EditorMode::Edit(id) => Some(id),
        }
    }

    #[must_use]
    pub const fn focus(&self) -> EditorField {
        self.focus
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Inline error from the last failed validation or submission.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// The text input under focus, if the focused field is textual.
    pub const fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            EditorField::Title => Some(&mut self.title),
            EditorField::Description => Some(&mut self.description),
            EditorField::DueDate => Some(&mut self.due_date),
            EditorField::Status | EditorField::Priority => None,
        }
    }

    /// Cycle the focused choice field (status or priority).
    pub const fn cycle_choice(&mut self) {
        match self.focus {
            EditorField::Status => self.status = self.status.next(),
            EditorField::Priority => self.priority = self.priority.next(),
            _ => {}
        }
    }

    /// Validate the form and mark it as submitting.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] (also stored as the inline error) when
    /// a field is invalid or a submission is already in flight.
    pub fn submit(&mut self) -> Result<Submission, ValidationError> {
        if self.submitting {
            return Err(ValidationError::SubmitInFlight);
        }
        match self.build() {
            Ok(submission) => {
                self.submitting = true;
                self.error = None;
                Ok(submission)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Record a failed submission; the form stays editable.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.submitting = false;
        self.error = Some(message.into());
    }

    fn build(&self) -> Result<Submission, ValidationError> {
        let title = self.title.value().trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(ValidationError::TitleTooLong {
                max: MAX_TITLE_LENGTH,
            });
        }

        let due_date = if self.due_date.is_blank() {
            None
        } else {
            Some(self.due_date.value().parse::<Timestamp>()?)
        };
        let description = self.description.value().trim();

        Ok(match self.mode {
            EditorMode::Create => Submission::Create(NewTask {
                title: title.to_string(),
                description: (!description.is_empty()).then(|| description.to_string()),
                status: Some(self.status),
                priority: Some(self.priority),
                due_date,
            }),
            EditorMode::Edit(id) => Submission::Update(
                id,
                TaskPatch {
                    title: Some(title.to_string()),
                    description: Some(description.to_string()),
                    status: Some(self.status),
                    priority: Some(self.priority),
                    due_date: Some(due_date),
                },
            ),
        })
    }
}
