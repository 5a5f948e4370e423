//! Shared wire model for the taskdeck task service.
//!
//! Everything here mirrors the JSON bodies exchanged with the remote
//! service. Decoding is deliberately lenient about enumerated values so a
//! single odd record never takes down a whole list response.

pub mod comment;
pub mod envelope;
pub mod task;
pub mod time;

pub use comment::{Comment, CommentId, CommentPatch, NewComment};
pub use envelope::{
    CommentEnvelope, CommentList, ErrorBody, StatsEnvelope, TaskEnvelope, TaskList,
};
pub use task::{
    NewTask, ParseEnumError, Priority, PriorityCounts, StatusCounts, Task, TaskId, TaskPatch,
    TaskStats, TaskStatus,
};
pub use time::{Timestamp, TimestampError};
