//! Task records, their enumerated fields and the create/update payloads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::time::Timestamp;

/// Maximum task title length accepted by the service, in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Server-assigned task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned by the strict `FromStr` parsers of [`TaskStatus`] and [`Priority`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} '{value}' (expected one of: {expected})")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

/// Workflow state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TaskStatus {
    /// Not started.
    #[default]
    Pending,
    /// Being worked on.
    InProgress,
    /// Done.
    Completed,
}

impl TaskStatus {
    /// Every status, in workflow order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    /// Decodes a wire value, falling back to [`TaskStatus::Pending`] for
    /// anything unrecognized.
    #[must_use]
    pub fn from_wire(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }

    /// The next status in workflow order, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Pending => Self::InProgress,
            Self::InProgress => Self::Completed,
            Self::Completed => Self::Pending,
        }
    }
}

impl FromStr for TaskStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(ParseEnumError {
                kind: "status",
                value: other.to_string(),
                expected: "pending, in_progress, completed",
            }),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TaskStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(raw.as_str().map_or_else(Self::default, Self::from_wire))
    }
}

/// Importance of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    /// Can wait.
    Low,
    /// Normal.
    #[default]
    Medium,
    /// Urgent.
    High,
}

impl Priority {
    /// Every priority, highest first (the order used by filter controls).
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Decodes a wire value, falling back to [`Priority::Medium`] for
    /// anything unrecognized.
    #[must_use]
    pub fn from_wire(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }

    /// The next priority, low to high, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Low,
        }
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(ParseEnumError {
                kind: "priority",
                value: other.to_string(),
                expected: "low, medium, high",
            }),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(raw.as_str().map_or_else(Self::default, Self::from_wire))
    }
}

/// A task as returned by the service (the canonical form).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Server-assigned identifier.
    pub id: TaskId,
    /// Non-empty title.
    pub title: String,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Workflow state; unknown or missing values decode as pending.
    #[serde(default)]
    pub status: TaskStatus,
    /// Importance; unknown or missing values decode as medium.
    #[serde(default)]
    pub priority: Priority,
    /// Optional deadline.
    #[serde(default)]
    pub due_date: Option<Timestamp>,
    /// Creation time, assigned by the service.
    pub created_at: Timestamp,
    /// Last modification time, assigned by the service.
    pub updated_at: Timestamp,
    /// Number of comments attached to the task, computed by the service.
    #[serde(default)]
    pub comments_count: u32,
}

impl Task {
    /// The description, treating an empty string like no description.
    #[must_use]
    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.trim().is_empty())
    }
}

/// Body of a create request. Unset optional fields are left to the
/// service's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    /// Task title.
    pub title: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Initial status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// Initial priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Optional deadline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Timestamp>,
}

impl NewTask {
    /// A create payload with only a title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Body of a partial update. Only `Some` fields are sent.
///
/// `due_date` is doubly optional: `Some(None)` is sent as `null` and clears
/// the deadline, `None` leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskPatch {
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// New priority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// New deadline, or `Some(None)` to clear it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<Timestamp>>,
}

impl TaskPatch {
    /// A patch that only changes the status.
    #[must_use]
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Whether the patch would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }
}

/// Per-status task counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusCounts {
    pub pending: u64,
    pub in_progress: u64,
    pub completed: u64,
}

/// Per-priority task counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityCounts {
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

/// Aggregate counts from `GET /tasks/stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskStats {
    pub total_tasks: u64,
    pub by_status: StatusCounts,
    pub by_priority: PriorityCounts,
}

impl TaskStats {
    /// Count for one status.
    #[must_use]
    pub const fn status_count(&self, status: TaskStatus) -> u64 {
        match status {
            TaskStatus::Pending => self.by_status.pending,
            TaskStatus::InProgress => self.by_status.in_progress,
            TaskStatus::Completed => self.by_status.completed,
        }
    }

    /// Count for one priority.
    #[must_use]
    pub const fn priority_count(&self, priority: Priority) -> u64 {
        match priority {
            Priority::Low => self.by_priority.low,
            Priority::Medium => self.by_priority.medium,
            Priority::High => self.by_priority.high,
        }
    }
}
