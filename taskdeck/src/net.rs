//! Background request worker bridging the TUI to the async [`TaskApi`].
//!
//! The TUI runs a synchronous, poll-based loop; every remote call runs on a
//! tokio task. The two sides talk through bounded channels:
//!
//! ```text
//! TUI (main thread)  ←── ApiEvent ───  tokio background tasks
//!                     ─── ApiCommand →
//! ```
//!
//! Each command is executed on its own task, so completions can arrive in
//! any order. Nothing is cancelled once issued; ordering of list responses
//! is resolved by the controller through sequence numbers.

use std::sync::Arc;

use tokio::sync::mpsc;

use taskdeck_proto::{Comment, NewComment, NewTask, Task, TaskId, TaskPatch, TaskStats};

use crate::api::{RemoteError, TaskApi, TaskQuery};

/// Default capacity of the command and event channels.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Requests sent from the TUI to the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCommand {
    /// Fetch the task list. `seq` identifies the request so that only the
    /// latest response is applied.
    ListTasks { seq: u64, query: TaskQuery },
    CreateTask(NewTask),
    UpdateTask { id: TaskId, patch: TaskPatch },
    DeleteTask(TaskId),
    LoadStats,
    ListComments(TaskId),
    CreateComment { task_id: TaskId, comment: NewComment },
    /// Stop accepting commands. In-flight requests still complete.
    Shutdown,
}

/// Completions sent from the worker back to the TUI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiEvent {
    TasksLoaded {
        seq: u64,
        result: Result<Vec<Task>, RemoteError>,
    },
    TaskCreated(Result<Task, RemoteError>),
    TaskUpdated {
        id: TaskId,
        result: Result<Task, RemoteError>,
    },
    TaskDeleted {
        id: TaskId,
        result: Result<(), RemoteError>,
    },
    StatsLoaded(Result<TaskStats, RemoteError>),
    CommentsLoaded {
        task_id: TaskId,
        result: Result<Vec<Comment>, RemoteError>,
    },
    CommentCreated {
        task_id: TaskId,
        result: Result<Comment, RemoteError>,
    },
}

impl ApiEvent {
    /// The failure event a command would have produced had its request
    /// failed with `err`. `None` for [`ApiCommand::Shutdown`].
    ///
    /// Used when a command never reaches the worker (channel full or closed).
    #[must_use]
    pub fn failure(command: ApiCommand, err: RemoteError) -> Option<Self> {
        Some(match command {
            ApiCommand::ListTasks { seq, .. } => Self::TasksLoaded {
                seq,
                result: Err(err),
            },
            ApiCommand::CreateTask(_) => Self::TaskCreated(Err(err)),
            ApiCommand::UpdateTask { id, .. } => Self::TaskUpdated {
                id,
                result: Err(err),
            },
            ApiCommand::DeleteTask(id) => Self::TaskDeleted {
                id,
                result: Err(err),
            },
            ApiCommand::LoadStats => Self::StatsLoaded(Err(err)),
            ApiCommand::ListComments(task_id) => Self::CommentsLoaded {
                task_id,
                result: Err(err),
            },
            ApiCommand::CreateComment { task_id, .. } => Self::CommentCreated {
                task_id,
                result: Err(err),
            },
            ApiCommand::Shutdown => return None,
        })
    }
}

/// Run one command against `api` and return its completion event.
///
/// Returns `None` for [`ApiCommand::Shutdown`], which has no completion.
pub async fn execute<A: TaskApi>(api: &A, command: ApiCommand) -> Option<ApiEvent> {
    let event = match command {
        ApiCommand::ListTasks { seq, query } => ApiEvent::TasksLoaded {
            seq,
            result: api.list_tasks(query).await,
        },
        ApiCommand::CreateTask(task) => ApiEvent::TaskCreated(api.create_task(task).await),
        ApiCommand::UpdateTask { id, patch } => ApiEvent::TaskUpdated {
            id,
            result: api.update_task(id, patch).await,
        },
        ApiCommand::DeleteTask(id) => ApiEvent::TaskDeleted {
            id,
            result: api.delete_task(id).await,
        },
        ApiCommand::LoadStats => ApiEvent::StatsLoaded(api.task_stats().await),
        ApiCommand::ListComments(task_id) => ApiEvent::CommentsLoaded {
            task_id,
            result: api.list_comments(task_id).await,
        },
        ApiCommand::CreateComment { task_id, comment } => ApiEvent::CommentCreated {
            task_id,
            result: api.create_comment(task_id, comment).await,
        },
        ApiCommand::Shutdown => return None,
    };
    Some(event)
}

/// Spawn the worker and return its channel handles.
///
/// Must be called from within a tokio runtime. The worker stops when it
/// receives [`ApiCommand::Shutdown`] or when the command sender is dropped.
pub fn spawn_worker<A>(
    api: Arc<A>,
    channel_capacity: usize,
) -> (mpsc::Sender<ApiCommand>, mpsc::Receiver<ApiEvent>)
where
    A: TaskApi + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::channel::<ApiCommand>(channel_capacity);
    let (evt_tx, evt_rx) = mpsc::channel::<ApiEvent>(channel_capacity);

    tokio::spawn(async move {
        command_loop(api, cmd_rx, evt_tx).await;
    });

    (cmd_tx, evt_rx)
}

/// Background task: fan each command out to its own task.
async fn command_loop<A>(
    api: Arc<A>,
    mut cmd_rx: mpsc::Receiver<ApiCommand>,
    evt_tx: mpsc::Sender<ApiEvent>,
) where
    A: TaskApi + 'static,
{
    while let Some(command) = cmd_rx.recv().await {
        if command == ApiCommand::Shutdown {
            tracing::info!("request worker shutting down");
            break;
        }

        tracing::debug!(?command, "dispatching command");
        let api = Arc::clone(&api);
        let evt_tx = evt_tx.clone();
        tokio::spawn(async move {
            if let Some(event) = execute(api.as_ref(), command).await
                && evt_tx.send(event).await.is_err()
            {
                tracing::debug!("event receiver dropped; discarding completion");
            }
        });
    }
}
