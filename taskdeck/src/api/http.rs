//! HTTP implementation of [`TaskApi`] over `reqwest`.
//!
//! One client, one base URL, one timeout. All bodies are JSON. Requests are
//! logged at debug level, failures at warn; logging never changes the
//! outcome of a call.

use std::time::{Duration, Instant};

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use taskdeck_proto::{
    Comment, CommentEnvelope, CommentId, CommentList, CommentPatch, ErrorBody, NewComment,
    NewTask, StatsEnvelope, Task, TaskEnvelope, TaskId, TaskList, TaskPatch, TaskStats,
};

use super::{RemoteError, TaskApi, TaskQuery};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors raised while constructing an [`HttpTaskApi`].
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The base URL could not be parsed.
    #[error("invalid base URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    /// The base URL cannot carry a path (e.g. `mailto:`).
    #[error("base URL '{0}' cannot be used as an API root")]
    NotABase(String),

    /// The underlying HTTP client failed to initialize.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Task service client speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: Client,
    base: Url,
}

impl HttpTaskApi {
    /// Create a client rooted at `base_url` (e.g. `http://127.0.0.1:5000/api`).
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the URL is invalid or the HTTP client cannot
    /// be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BuildError> {
        let base = Url::parse(base_url).map_err(|source| BuildError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;
        if base.cannot_be_a_base() {
            return Err(BuildError::NotABase(base_url.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base })
    }

    /// The API root every endpoint is resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolve an endpoint by appending path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send a prepared request and return the response if its status is 2xx.
    async fn dispatch(&self, builder: RequestBuilder) -> Result<Response, RemoteError> {
        let request = builder.build().map_err(|e| classify(&e))?;
        let method = request.method().clone();
        let url = request.url().clone();

        tracing::debug!(%method, %url, "sending request");
        let started = Instant::now();

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                let err = classify(&e);
                tracing::warn!(%method, %url, error = %err, "request failed");
                return Err(err);
            }
        };

        let status = response.status();
        tracing::debug!(
            %method,
            %url,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis(),
            "received response"
        );

        if status.is_success() {
            return Ok(response);
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(%method, %url, error = %e, "failed to read error body");
                String::new()
            }
        };
        let err = RemoteError::Http {
            status: status.as_u16(),
            message: error_message(status, &body),
        };
        tracing::warn!(%method, %url, error = %err, "service returned an error");
        Err(err)
    }

    /// Send a request and decode its JSON body.
    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, RemoteError> {
        let response = self.dispatch(builder).await?;
        response.json::<T>().await.map_err(|e| {
            let err = classify(&e);
            tracing::warn!(error = %err, "failed to read response body");
            err
        })
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.client.request(method, self.endpoint(segments))
    }
}

/// Map a `reqwest` error onto the remote error taxonomy.
fn classify(err: &reqwest::Error) -> RemoteError {
    if err.is_timeout() {
        RemoteError::Timeout
    } else if err.is_decode() {
        RemoteError::Decode(err.to_string())
    } else {
        RemoteError::Network(err.to_string())
    }
}

/// Pick the message for a non-2xx response: the error body's message when
/// it parses, else the raw text, else the status reason.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Some(message) = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message())
    {
        return message;
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

impl TaskApi for HttpTaskApi {
    async fn list_tasks(&self, query: TaskQuery) -> Result<Vec<Task>, RemoteError> {
        let mut url = self.endpoint(&["tasks"]);
        let pairs = query.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        let list: TaskList = self.fetch(self.client.get(url)).await?;
        Ok(list.tasks)
    }

    async fn get_task(&self, id: TaskId) -> Result<Task, RemoteError> {
        let id = id.to_string();
        let envelope: TaskEnvelope = self.fetch(self.request(Method::GET, &["tasks", &id])).await?;
        Ok(envelope.task)
    }

    async fn create_task(&self, task: NewTask) -> Result<Task, RemoteError> {
        let envelope: TaskEnvelope = self
            .fetch(self.request(Method::POST, &["tasks"]).json(&task))
            .await?;
        tracing::info!(id = %envelope.task.id, "task created");
        Ok(envelope.task)
    }

    async fn update_task(&self, id: TaskId, patch: TaskPatch) -> Result<Task, RemoteError> {
        let raw = id.to_string();
        let envelope: TaskEnvelope = self
            .fetch(self.request(Method::PUT, &["tasks", &raw]).json(&patch))
            .await?;
        tracing::info!(%id, "task updated");
        Ok(envelope.task)
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), RemoteError> {
        let raw = id.to_string();
        self.dispatch(self.request(Method::DELETE, &["tasks", &raw]))
            .await?;
        tracing::info!(%id, "task deleted");
        Ok(())
    }

    async fn task_stats(&self) -> Result<TaskStats, RemoteError> {
        let envelope: StatsEnvelope = self
            .fetch(self.request(Method::GET, &["tasks", "stats"]))
            .await?;
        Ok(envelope.stats)
    }

    async fn list_comments(&self, task_id: TaskId) -> Result<Vec<Comment>, RemoteError> {
        let raw = task_id.to_string();
        let list: CommentList = self
            .fetch(self.request(Method::GET, &["tasks", &raw, "comments"]))
            .await?;
        Ok(list.comments)
    }

    async fn create_comment(
        &self,
        task_id: TaskId,
        comment: NewComment,
    ) -> Result<Comment, RemoteError> {
        let raw = task_id.to_string();
        let envelope: CommentEnvelope = self
            .fetch(
                self.request(Method::POST, &["tasks", &raw, "comments"])
                    .json(&comment),
            )
            .await?;
        tracing::info!(%task_id, id = %envelope.comment.id, "comment created");
        Ok(envelope.comment)
    }

    async fn get_comment(&self, id: CommentId) -> Result<Comment, RemoteError> {
        let raw = id.to_string();
        let envelope: CommentEnvelope = self
            .fetch(self.request(Method::GET, &["comments", &raw]))
            .await?;
        Ok(envelope.comment)
    }

    async fn update_comment(
        &self,
        id: CommentId,
        patch: CommentPatch,
    ) -> Result<Comment, RemoteError> {
        let raw = id.to_string();
        let envelope: CommentEnvelope = self
            .fetch(self.request(Method::PUT, &["comments", &raw]).json(&patch))
            .await?;
        tracing::info!(%id, "comment updated");
        Ok(envelope.comment)
    }

    async fn delete_comment(&self, id: CommentId) -> Result<(), RemoteError> {
        let raw = id.to_string();
        self.dispatch(self.request(Method::DELETE, &["comments", &raw]))
            .await?;
        tracing::info!(%id, "comment deleted");
        Ok(())
    }
}
