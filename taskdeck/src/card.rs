//! Display model for one task in the list.
//!
//! Cards are derived on every frame from the controller's collection and
//! hold no state of their own.

use taskdeck_proto::{Priority, Task, TaskStatus};

/// Default number of description characters shown before truncation.
pub const DEFAULT_PREVIEW_LEN: usize = 100;

/// Default format for due dates on a card.
pub const DEFAULT_DATE_FORMAT: &str = "%b %-d, %Y";

/// Visual category of a task's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    Pending,
    InProgress,
    Completed,
}

impl From<TaskStatus> for StatusCategory {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Pending => Self::Pending,
            TaskStatus::InProgress => Self::InProgress,
            TaskStatus::Completed => Self::Completed,
        }
    }
}

/// Visual category of a task's priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityCategory {
    High,
    Medium,
    Low,
}

impl From<Priority> for PriorityCategory {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::High => Self::High,
            Priority::Medium => Self::Medium,
            Priority::Low => Self::Low,
        }
    }
}

/// Shorten `text` to at most `max_chars` characters, appending `"..."` when
/// anything was cut. Counts characters, not bytes.
#[must_use]
pub fn truncate_description(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// `"1 comment"`, `"3 comments"`, or `None` when there are none.
#[must_use]
pub fn comments_label(count: u32) -> Option<String> {
    match count {
        0 => None,
        1 => Some("1 comment".to_string()),
        n => Some(format!("{n} comments")),
    }
}

/// Everything a renderer needs to draw one task card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCard<'a> {
    pub task: &'a Task,
    pub status: StatusCategory,
    pub priority: PriorityCategory,
    pub description: Option<String>,
    pub due: Option<String>,
    pub comments: Option<String>,
}

impl<'a> TaskCard<'a> {
    /// Derive the card for `task`.
    #[must_use]
    pub fn new(task: &'a Task, preview_len: usize, date_format: &str) -> Self {
        Self {
            task,
            status: task.status.into(),
            priority: task.priority.into(),
            description: task
                .description_text()
                .map(|d| truncate_description(d, preview_len)),
            due: task.due_date.map(|d| format!("Due: {}", d.format(date_format))),
            comments: comments_label(task.comments_count),
        }
    }
}
