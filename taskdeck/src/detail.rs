//! Detail view of one task and its comment thread.
//!
//! The view owns the comment list of its task; the list is dropped when
//! the view closes. Comments are shown in the order the service returns
//! them, and new comments are prepended locally without re-fetching.

use taskdeck_proto::comment::{MAX_AUTHOR_LENGTH, MAX_COMMENT_LENGTH};
use taskdeck_proto::{Comment, NewComment, Task, TaskId};

use crate::api::RemoteError;
use crate::editor::{TextInput, ValidationError};
use crate::net::ApiCommand;

/// Which part of the detail view has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailFocus {
    /// Browsing: task shortcuts and comment scrolling.
    Thread,
    /// Typing the comment body.
    Content,
    /// Typing the author name.
    Author,
}

/// State of an open detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    task: Task,
    comments: Vec<Comment>,
    loading: bool,
    submitting: bool,
    error: Option<String>,
    pub content: TextInput,
    pub author: TextInput,
    focus: DetailFocus,
    scroll: usize,
}

impl DetailView {
    /// Open the view for `task` and return the command that loads its
    /// comments.
    #[must_use]
    pub fn open(task: Task) -> (Self, ApiCommand) {
        let command = ApiCommand::ListComments(task.id);
        let view = Self {
            task,
            comments: Vec::new(),
            loading: true,
            submitting: false,
            error: None,
            content: TextInput::default(),
            author: TextInput::default(),
            focus: DetailFocus::Thread,
            scroll: 0,
        };
        (view, command)
    }

    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.task
    }

    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task.id
    }

    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn focus(&self) -> DetailFocus {
        self.focus
    }

    #[must_use]
    pub const fn scroll(&self) -> usize {
        self.scroll
    }

    pub const fn set_focus(&mut self, focus: DetailFocus) {
        self.focus = focus;
    }

    /// Thread -> Content -> Author -> Content.
    pub const fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            DetailFocus::Thread | DetailFocus::Author => DetailFocus::Content,
            DetailFocus::Content => DetailFocus::Author,
        };
    }

    /// The text input under focus, if any.
    pub const fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            DetailFocus::Thread => None,
            DetailFocus::Content => Some(&mut self.content),
            DetailFocus::Author => Some(&mut self.author),
        }
    }

    pub const fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        if self.scroll + 1 < self.comments.len() {
            self.scroll += 1;
        }
    }

    /// Replace the shown task after it was updated elsewhere.
    pub fn refresh_task(&mut self, task: Task) {
        if task.id == self.task.id {
            self.task = task;
        }
    }

    /// Apply the result of the comment-list request.
    ///
    /// Results for another task are ignored.
    pub fn comments_loaded(&mut self, task_id: TaskId, result: Result<Vec<Comment>, RemoteError>) {
        if task_id != self.task.id {
            return;
        }
        self.loading = false;
        match result {
            Ok(comments) => {
                self.comments = comments;
                self.scroll = 0;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(%task_id, error = %e, "failed to load comments");
                self.comments.clear();
                self.error = Some(format!("Failed to load comments: {e}"));
            }
        }
    }

    /// Validate the comment inputs and return the command that posts the
    /// comment.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyComment`] for blank content,
    /// [`ValidationError::SubmitInFlight`] while a previous submission is
    /// pending, or a length error. Nothing is sent in any of these cases.
    pub fn submit(&mut self) -> Result<ApiCommand, ValidationError> {
        if self.submitting {
            return Err(ValidationError::SubmitInFlight);
        }
        let comment = NewComment::new(self.content.value(), self.author.value());
        let check = if comment.content.is_empty() {
            Err(ValidationError::EmptyComment)
        } else if comment.content.chars().count() > MAX_COMMENT_LENGTH {
            Err(ValidationError::CommentTooLong {
                max: MAX_COMMENT_LENGTH,
            })
        } else if comment.author.chars().count() > MAX_AUTHOR_LENGTH {
            Err(ValidationError::AuthorTooLong {
                max: MAX_AUTHOR_LENGTH,
            })
        } else {
            Ok(())
        };

        if let Err(e) = check {
            self.error = Some(e.to_string());
            return Err(e);
        }

        self.submitting = true;
        self.error = None;
        Ok(ApiCommand::CreateComment {
            task_id: self.task.id,
            comment,
        })
    }

    /// Apply the result of a comment submission.
    ///
    /// On success the canonical comment is prepended and both inputs are
    /// cleared; on failure the inputs are kept and an inline error is shown.
    pub fn comment_created(&mut self, task_id: TaskId, result: Result<Comment, RemoteError>) {
        if task_id != self.task.id {
            return;
        }
        self.submitting = false;
        match result {
            Ok(comment) => {
                self.comments.insert(0, comment);
                self.content.clear();
                self.author.clear();
                self.scroll = 0;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(%task_id, error = %e, "failed to add comment");
                self.error = Some(format!("Failed to add comment: {e}"));
            }
        }
    }
}
