//! Filter state for the task list.
//!
//! Each axis is either [`Filter::All`] or pinned to one value. An `All` axis
//! is never sent to the service; it is omitted from the query string.

use taskdeck_proto::{Priority, Task, TaskStatus};

/// One filter axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter<T> {
    /// No restriction on this axis.
    #[default]
    All,
    /// Only entries with this value.
    Only(T),
}

impl<T: Copy + PartialEq> Filter<T> {
    /// The pinned value, if any.
    #[must_use]
    pub fn value(self) -> Option<T> {
        match self {
            Self::All => None,
            Self::Only(v) => Some(v),
        }
    }

    /// Whether `candidate` passes this axis.
    #[must_use]
    pub fn matches(self, candidate: T) -> bool {
        match self {
            Self::All => true,
            Self::Only(v) => v == candidate,
        }
    }

    /// Steps to the next position in `All, values[0], values[1], ..., All`.
    #[must_use]
    pub fn cycle(self, values: &[T]) -> Self {
        match self {
            Self::All => values.first().map_or(Self::All, |v| Self::Only(*v)),
            Self::Only(current) => values
                .iter()
                .position(|v| *v == current)
                .and_then(|i| values.get(i + 1))
                .map_or(Self::All, |v| Self::Only(*v)),
        }
    }
}

impl<T> From<Option<T>> for Filter<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::All, Self::Only)
    }
}

impl Filter<TaskStatus> {
    /// Label for the status axis.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Status",
            Self::Only(s) => s.label(),
        }
    }
}

impl Filter<Priority> {
    /// Label for the priority axis.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Priority",
            Self::Only(p) => p.label(),
        }
    }
}

/// Both filter axes. Owned by the controller; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterState {
    pub status: Filter<TaskStatus>,
    pub priority: Filter<Priority>,
}

impl FilterState {
    #[must_use]
    pub const fn new(status: Filter<TaskStatus>, priority: Filter<Priority>) -> Self {
        Self { status, priority }
    }

    /// Query parameters for a list request. `All` axes are omitted.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, &'static str)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(status) = self.status.value() {
            pairs.push(("status", status.as_str()));
        }
        if let Some(priority) = self.priority.value() {
            pairs.push(("priority", priority.as_str()));
        }
        pairs
    }

    /// Whether `task` passes both axes.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.status.matches(task.status) && self.priority.matches(task.priority)
    }
}
