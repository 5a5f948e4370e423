//! Remote task service abstraction.
//!
//! Defines the [`TaskApi`] trait that every client of the task service
//! satisfies, and the [`RemoteError`] taxonomy its operations report.
//! The production implementation is [`http::HttpTaskApi`].

pub mod http;

use std::future::Future;

use taskdeck_proto::{
    Comment, CommentId, CommentPatch, NewComment, NewTask, Task, TaskId, TaskPatch, TaskStats,
};

use crate::filter::FilterState;

/// Query of a list call. An `All` axis is omitted from the request.
pub type TaskQuery = FilterState;

/// Errors reported by remote operations.
///
/// Every failure is terminal for its request; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// No response was received (connection refused, DNS failure, reset).
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a 4xx or 5xx status.
    #[error("{message} (HTTP {status})")]
    Http {
        /// Response status code.
        status: u16,
        /// Message from the error body, or the raw body, or the status reason.
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl RemoteError {
    /// The HTTP status, when a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Async client of the remote task service.
///
/// Each operation returns the canonical value as stored by the service, or
/// a [`RemoteError`]. Identifiers are only ever allocated by the service.
pub trait TaskApi: Send + Sync {
    /// `GET /tasks`, optionally filtered.
    fn list_tasks(
        &self,
        query: TaskQuery,
    ) -> impl Future<Output = Result<Vec<Task>, RemoteError>> + Send;

    /// `GET /tasks/{id}`.
    fn get_task(&self, id: TaskId) -> impl Future<Output = Result<Task, RemoteError>> + Send;

    /// `POST /tasks`.
    fn create_task(
        &self,
        task: NewTask,
    ) -> impl Future<Output = Result<Task, RemoteError>> + Send;

    /// `PUT /tasks/{id}` with a partial body.
    fn update_task(
        &self,
        id: TaskId,
        patch: TaskPatch,
    ) -> impl Future<Output = Result<Task, RemoteError>> + Send;

    /// `DELETE /tasks/{id}`.
    fn delete_task(&self, id: TaskId) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// `GET /tasks/stats`.
    fn task_stats(&self) -> impl Future<Output = Result<TaskStats, RemoteError>> + Send;

    /// `GET /tasks/{id}/comments`, in the order the service returns them.
    fn list_comments(
        &self,
        task_id: TaskId,
    ) -> impl Future<Output = Result<Vec<Comment>, RemoteError>> + Send;

    /// `POST /tasks/{id}/comments`.
    fn create_comment(
        &self,
        task_id: TaskId,
        comment: NewComment,
    ) -> impl Future<Output = Result<Comment, RemoteError>> + Send;

    /// `GET /comments/{id}`.
    fn get_comment(
        &self,
        id: CommentId,
    ) -> impl Future<Output = Result<Comment, RemoteError>> + Send;

    /// `PUT /comments/{id}`.
    fn update_comment(
        &self,
        id: CommentId,
        patch: CommentPatch,
    ) -> impl Future<Output = Result<Comment, RemoteError>> + Send;

    /// `DELETE /comments/{id}`.
    fn delete_comment(&self, id: CommentId)
    -> impl Future<Output = Result<(), RemoteError>> + Send;
}
