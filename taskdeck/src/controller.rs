//! Application controller: the single owner of the task collection.
//!
//! Every operation returns the [`ApiCommand`]s the caller must hand to the
//! worker; nothing here performs I/O. Completions come back as
//! [`ApiEvent`]s through [`Controller::apply`], which is the only place the
//! collection is mutated.
//!
//! # Synchronization model
//!
//! - A refresh replaces the whole collection with the service's answer.
//! - A created task is prepended; an updated task replaces its entry in
//!   place; a deleted task is removed. No client-side sorting.
//! - Each list request carries a sequence number. Only the response to the
//!   latest request is applied; older ones are discarded.
//! - Failures never clear data. They set a dismissible banner and, for
//!   create/update, are handed back to the open editor.

use std::mem;

use taskdeck_proto::{NewTask, Priority, Task, TaskId, TaskPatch, TaskStats, TaskStatus};

use crate::api::RemoteError;
use crate::detail::DetailView;
use crate::editor::{Submission, TaskEditor, ValidationError};
use crate::filter::{Filter, FilterState};
use crate::net::{ApiCommand, ApiEvent};

/// Load state of the task collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// The latest list request is in flight.
    Loading,
    /// The latest list request succeeded.
    Ready,
    /// The latest list request failed; the previous collection is kept.
    Error,
}

/// The modal layer over the task list. At most one task is targeted at a
/// time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Modal {
    #[default]
    None,
    Create(TaskEditor),
    Edit(TaskEditor),
    Details(DetailView),
    /// Waiting for the user to confirm a delete. `previous` is restored
    /// when the prompt closes.
    ConfirmDelete {
        target: TaskId,
        title: String,
        previous: Box<Modal>,
    },
}

/// Contents of the statistics overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsView {
    Loading,
    Loaded(TaskStats),
    Failed(String),
}

/// Informational overlays. Independent of task and modal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    About,
    Stats(StatsView),
}

/// Typed requests emitted by views. Only the controller acts on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    ViewTask(TaskId),
    EditTask(TaskId),
    DeleteTask(TaskId),
    StatusChange(TaskId, TaskStatus),
    NewTask,
}

/// Owner of the task collection, filters, modal state and error banner.
#[derive(Debug)]
pub struct Controller {
    tasks: Vec<Task>,
    load_state: LoadState,
    modal: Modal,
    overlay: Option<Overlay>,
    error: Option<String>,
    filters: FilterState,
    cursor: usize,
    next_seq: u64,
    latest_seq: Option<u64>,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(FilterState::default())
    }
}

impl Controller {
    /// A controller with an empty collection and the given initial filters.
    /// Call [`Controller::refresh`] to load the first page.
    #[must_use]
    pub const fn new(filters: FilterState) -> Self {
        Self {
            tasks: Vec::new(),
            load_state: LoadState::Loading,
            modal: Modal::None,
            overlay: None,
            error: None,
            filters,
            cursor: 0,
            next_seq: 0,
            latest_seq: None,
        }
    }

    // -----------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------

    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[must_use]
    pub const fn load_state(&self) -> LoadState {
        self.load_state
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    #[must_use]
    pub const fn modal(&self) -> &Modal {
        &self.modal
    }

    /// Mutable access for key handling inside the open modal.
    pub const fn modal_mut(&mut self) -> &mut Modal {
        &mut self.modal
    }

    #[must_use]
    pub const fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    /// The banner message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn filters(&self) -> FilterState {
        self.filters
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn selected_task(&self) -> Option<&Task> {
        self.tasks.get(self.cursor)
    }

    fn find(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    // -----------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------

    pub fn select_next(&mut self) {
        if self.cursor + 1 < self.tasks.len() {
            self.cursor += 1;
        }
    }

    pub const fn select_prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn clamp_cursor(&mut self) {
        if self.cursor >= self.tasks.len() {
            self.cursor = self.tasks.len().saturating_sub(1);
        }
    }

    // -----------------------------------------------------------------
    // Refresh and filters
    // -----------------------------------------------------------------

    /// Issue a list request for the current filters.
    ///
    /// Any earlier list request still in flight becomes stale.
    pub fn refresh(&mut self) -> ApiCommand {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.latest_seq = Some(seq);
        self.load_state = LoadState::Loading;
        tracing::debug!(seq, filters = ?self.filters, "refreshing task list");
        ApiCommand::ListTasks {
            seq,
            query: self.filters,
        }
    }

    /// Replace both filter axes, refreshing if anything changed.
    pub fn set_filters(&mut self, filters: FilterState) -> Option<ApiCommand> {
        if filters == self.filters {
            return None;
        }
        self.filters = filters;
        Some(self.refresh())
    }

    pub fn set_status_filter(&mut self, status: Filter<TaskStatus>) -> Option<ApiCommand> {
        self.set_filters(FilterState::new(status, self.filters.priority))
    }

    pub fn set_priority_filter(&mut self, priority: Filter<Priority>) -> Option<ApiCommand> {
        self.set_filters(FilterState::new(self.filters.status, priority))
    }

    pub fn cycle_status_filter(&mut self) -> Option<ApiCommand> {
        self.set_status_filter(self.filters.status.cycle(&TaskStatus::ALL))
    }

    pub fn cycle_priority_filter(&mut self) -> Option<ApiCommand> {
        self.set_priority_filter(self.filters.priority.cycle(&Priority::ALL))
    }

    // -----------------------------------------------------------------
    // Intents
    // -----------------------------------------------------------------

    /// Act on a view intent.
    pub fn dispatch(&mut self, intent: Intent) -> Option<ApiCommand> {
        match intent {
            Intent::ViewTask(id) => self.open_details(id),
            Intent::EditTask(id) => {
                self.open_edit(id);
                None
            }
            Intent::DeleteTask(id) => {
                self.request_delete(id);
                None
            }
            Intent::StatusChange(id, status) => self.change_status(id, status),
            Intent::NewTask => {
                self.open_create();
                None
            }
        }
    }

    pub fn open_create(&mut self) {
        self.modal = Modal::Create(TaskEditor::create());
    }

    /// Open the editor for `id`. Replaces any open modal.
    pub fn open_edit(&mut self, id: TaskId) {
        if let Some(task) = self.find(id) {
            self.modal = Modal::Edit(TaskEditor::edit(task));
        }
    }

    /// Open the detail view for `id` and return its comment request.
    pub fn open_details(&mut self, id: TaskId) -> Option<ApiCommand> {
        let task = self.find(id)?.clone();
        let (view, command) = DetailView::open(task);
        self.modal = Modal::Details(view);
        Some(command)
    }

    /// Close the open modal. A pending delete prompt is cancelled.
    pub fn close_modal(&mut self) {
        if matches!(self.modal, Modal::ConfirmDelete { .. }) {
            self.cancel_delete();
        } else {
            self.modal = Modal::None;
        }
    }

    // -----------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------

    /// Issue a create request.
    pub fn create(&self, payload: NewTask) -> ApiCommand {
        tracing::debug!(title = %payload.title, "creating task");
        ApiCommand::CreateTask(payload)
    }

    /// Issue a partial update request.
    pub fn update(&self, id: TaskId, patch: TaskPatch) -> ApiCommand {
        tracing::debug!(%id, "updating task");
        ApiCommand::UpdateTask { id, patch }
    }

    /// Change one task's status without opening the editor.
    pub fn change_status(&mut self, id: TaskId, status: TaskStatus) -> Option<ApiCommand> {
        let current = self.find(id)?;
        if current.status == status {
            return None;
        }
        Some(self.update(id, TaskPatch::status(status)))
    }

    /// Submit the open editor.
    ///
    /// # Errors
    ///
    /// Returns the editor's [`ValidationError`]; nothing is sent in that
    /// case. Also fails with [`ValidationError::NothingToSubmit`] when no
    /// editor is open.
    pub fn submit_editor(&mut self) -> Result<ApiCommand, ValidationError> {
        let submission = match &mut self.modal {
            Modal::Create(editor) | Modal::Edit(editor) => editor.submit()?,
            _ => return Err(ValidationError::NothingToSubmit),
        };
        Ok(match submission {
            Submission::Create(payload) => self.create(payload),
            Submission::Update(id, patch) => self.update(id, patch),
        })
    }

    /// Submit the comment form of the open detail view.
    ///
    /// # Errors
    ///
    /// Returns the view's [`ValidationError`]; fails with
    /// [`ValidationError::NothingToSubmit`] when no detail view is open.
    pub fn submit_comment(&mut self) -> Result<ApiCommand, ValidationError> {
        match &mut self.modal {
            Modal::Details(view) => view.submit(),
            _ => Err(ValidationError::NothingToSubmit),
        }
    }

    /// First phase of a delete: ask for confirmation. Nothing is sent.
    pub fn request_delete(&mut self, id: TaskId) {
        let Some(title) = self.find(id).map(|t| t.title.clone()) else {
            return;
        };
        let previous = mem::take(&mut self.modal);
        self.modal = Modal::ConfirmDelete {
            target: id,
            title,
            previous: Box::new(previous),
        };
    }

    /// Confirm the pending delete and issue the request.
    pub fn confirm_delete(&mut self) -> Option<ApiCommand> {
        match mem::take(&mut self.modal) {
            Modal::ConfirmDelete {
                target, previous, ..
            } => {
                self.modal = *previous;
                tracing::debug!(id = %target, "deleting task");
                Some(ApiCommand::DeleteTask(target))
            }
            other => {
                self.modal = other;
                None
            }
        }
    }

    /// Abandon the pending delete. Nothing is sent.
    pub fn cancel_delete(&mut self) {
        match mem::take(&mut self.modal) {
            Modal::ConfirmDelete { previous, .. } => self.modal = *previous,
            other => self.modal = other,
        }
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    // -----------------------------------------------------------------
    // Overlays
    // -----------------------------------------------------------------

    /// Open the statistics overlay and return the request that fills it.
    pub fn open_stats(&mut self) -> ApiCommand {
        self.overlay = Some(Overlay::Stats(StatsView::Loading));
        ApiCommand::LoadStats
    }

    pub fn toggle_about(&mut self) {
        self.overlay = match self.overlay {
            Some(Overlay::About) => None,
            _ => Some(Overlay::About),
        };
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    // -----------------------------------------------------------------
    // Completions
    // -----------------------------------------------------------------

    /// Apply a completed request.
    pub fn apply(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::TasksLoaded { seq, result } => self.tasks_loaded(seq, result),
            ApiEvent::TaskCreated(result) => self.task_created(result),
            ApiEvent::TaskUpdated { id, result } => self.task_updated(id, result),
            ApiEvent::TaskDeleted { id, result } => self.task_deleted(id, result),
            ApiEvent::StatsLoaded(result) => self.stats_loaded(result),
            ApiEvent::CommentsLoaded { task_id, result } => match &mut self.modal {
                Modal::Details(view) if view.task_id() == task_id => {
                    view.comments_loaded(task_id, result);
                }
                _ => tracing::debug!(%task_id, "discarding comments for a closed view"),
            },
            ApiEvent::CommentCreated { task_id, result } => match &mut self.modal {
                Modal::Details(view) if view.task_id() == task_id => {
                    view.comment_created(task_id, result);
                }
                _ => tracing::debug!(%task_id, "discarding comment for a closed view"),
            },
        }
    }

    fn tasks_loaded(&mut self, seq: u64, result: Result<Vec<Task>, RemoteError>) {
        if self.latest_seq != Some(seq) {
            tracing::debug!(seq, latest = ?self.latest_seq, "discarding stale task list");
            return;
        }
        match result {
            Ok(tasks) => {
                tracing::info!(count = tasks.len(), "task list loaded");
                let unmatched = tasks.iter().filter(|t| !self.filters.matches(t)).count();
                if unmatched > 0 {
                    tracing::debug!(
                        unmatched,
                        filters = ?self.filters,
                        "service returned tasks outside the active filters"
                    );
                }
                self.tasks = tasks;
                self.load_state = LoadState::Ready;
                self.error = None;
                self.clamp_cursor();
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load tasks");
                self.load_state = LoadState::Error;
                self.error = Some(format!("Failed to load tasks: {e}. Please try again."));
            }
        }
    }

    fn task_created(&mut self, result: Result<Task, RemoteError>) {
        match result {
            Ok(task) => {
                tracing::info!(id = %task.id, "task added to collection");
                // A newer list response may already contain it.
                self.tasks.retain(|t| t.id != task.id);
                self.tasks.insert(0, task);
                self.cursor = 0;
                self.error = None;
                if matches!(self.modal, Modal::Create(_)) {
                    self.modal = Modal::None;
                }
            }
            Err(e) => {
                let message = format!("Failed to create task: {e}");
                tracing::warn!(error = %e, "failed to create task");
                if let Modal::Create(editor) = &mut self.modal {
                    editor.fail(message.clone());
                }
                self.error = Some(message);
            }
        }
    }

    fn task_updated(&mut self, id: TaskId, result: Result<Task, RemoteError>) {
        match result {
            Ok(task) => {
                match self.tasks.iter_mut().find(|t| t.id == id) {
                    Some(slot) => *slot = task.clone(),
                    None => tracing::debug!(%id, "updated task is not in the collection"),
                }
                self.error = None;
                if matches!(&self.modal, Modal::Edit(editor) if editor.target() == Some(id)) {
                    self.modal = Modal::None;
                } else if let Modal::Details(view) = &mut self.modal {
                    view.refresh_task(task);
                }
            }
            Err(e) => {
                let message = format!("Failed to update task: {e}");
                tracing::warn!(%id, error = %e, "failed to update task");
                if let Modal::Edit(editor) = &mut self.modal
                    && editor.target() == Some(id)
                {
                    editor.fail(message.clone());
                }
                self.error = Some(message);
            }
        }
    }

    fn task_deleted(&mut self, id: TaskId, result: Result<(), RemoteError>) {
        match result {
            Ok(()) => {
                self.tasks.retain(|t| t.id != id);
                self.clamp_cursor();
                self.error = None;
                let shows_deleted = match &self.modal {
                    Modal::Details(view) => view.task_id() == id,
                    Modal::Edit(editor) => editor.target() == Some(id),
                    _ => false,
                };
                if shows_deleted {
                    self.modal = Modal::None;
                }
                tracing::info!(%id, "task removed from collection");
            }
            Err(e) => {
                tracing::warn!(%id, error = %e, "failed to delete task");
                self.error = Some(format!("Failed to delete task: {e}"));
            }
        }
    }

    fn stats_loaded(&mut self, result: Result<TaskStats, RemoteError>) {
        let Some(Overlay::Stats(view)) = &mut self.overlay else {
            tracing::debug!("discarding stats for a closed overlay");
            return;
        };
        *view = match result {
            Ok(stats) => StatsView::Loaded(stats),
            Err(e) => StatsView::Failed(format!("Failed to load statistics: {e}")),
        };
    }
}
