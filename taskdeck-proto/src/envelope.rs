//! Response envelopes wrapping every body the service returns.
//!
//! Successful responses carry `success: true` plus one payload field; error
//! responses carry `success: false`, a message and optional per-field
//! validation errors.

use serde::{Deserialize, Serialize};

use crate::comment::Comment;
use crate::task::{Task, TaskStats};

/// `GET /tasks` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub count: Option<usize>,
}

/// Body of any endpoint returning a single task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEnvelope {
    pub task: Task,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `GET /tasks/{id}/comments` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentList {
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub count: Option<usize>,
}

/// Body of any endpoint returning a single comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentEnvelope {
    pub comment: Comment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `GET /tasks/stats` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsEnvelope {
    pub stats: TaskStats,
}

/// Error body returned with any non-2xx status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorBody {
    pub error: Option<String>,
    pub validation_errors: Vec<String>,
}

impl ErrorBody {
    /// The message to surface to the user, if the body carried one.
    ///
    /// Validation errors are appended after the main message, separated by
    /// `"; "`.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(error) = self.error.as_deref().filter(|e| !e.trim().is_empty()) {
            parts.push(error);
        }
        parts.extend(
            self.validation_errors
                .iter()
                .map(String::as_str)
                .filter(|e| !e.trim().is_empty()),
        );
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("; "))
        }
    }
}
