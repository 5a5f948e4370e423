//! Comments attached to a task.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::task::TaskId;
use crate::time::Timestamp;

/// Maximum comment body length accepted by the service, in characters.
pub const MAX_COMMENT_LENGTH: usize = 1000;

/// Maximum author name length accepted by the service, in characters.
pub const MAX_AUTHOR_LENGTH: usize = 100;

/// Author shown when a comment has none.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Server-assigned comment identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(u64);

impl CommentId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A comment as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub task_id: TaskId,
    pub content: String,
    /// Never empty: blank or missing authors decode as [`ANONYMOUS_AUTHOR`].
    #[serde(default = "anonymous", deserialize_with = "author_or_anonymous")]
    pub author: String,
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

fn anonymous() -> String {
    ANONYMOUS_AUTHOR.to_string()
}

fn author_or_anonymous<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(match raw {
        Some(author) if !author.trim().is_empty() => author,
        _ => anonymous(),
    })
}

/// Body of `POST /tasks/{id}/comments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub content: String,
    pub author: String,
}

impl NewComment {
    /// Builds a payload, trimming both fields. A blank author is replaced
    /// by [`ANONYMOUS_AUTHOR`].
    #[must_use]
    pub fn new(content: &str, author: &str) -> Self {
        let author = author.trim();
        Self {
            content: content.trim().to_string(),
            author: if author.is_empty() {
                anonymous()
            } else {
                author.to_string()
            },
        }
    }
}

/// Body of `PUT /comments/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}
