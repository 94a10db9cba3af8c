//! Task store: the single entry point for task mutation.
//!
//! Every mutation follows the same shape: build the new record, persist it
//! through the repository, and only then apply it to in-memory state and the
//! view. A repository failure therefore leaves memory untouched and still in
//! step with storage.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::future::join_all;
use mockable::Clock;
use thiserror::Error;
use tracing::{info, warn};

use super::{
    order,
    state::{CategoryChanges, Claim, Entry, StoreState},
};
use crate::task::{
    domain::{
        Category, CategoryId, EffectKind, SortChoice, SortIndex, Task, TaskData, TaskId,
        TaskStatus, default_tasks,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskView},
};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    data: TaskData,
    status: TaskStatus,
    sort_index: Option<SortIndex>,
}

impl CreateTaskRequest {
    /// Creates a request for a pending task with the next free rank.
    #[must_use]
    pub const fn new(data: TaskData) -> Self {
        Self {
            data,
            status: TaskStatus::Pending,
            sort_index: None,
        }
    }

    /// Places the task in another bucket.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Uses an externally supplied rank.
    #[must_use]
    pub const fn with_sort_index(mut self, sort_index: SortIndex) -> Self {
        self.sort_index = Some(sort_index);
        self
    }
}

/// Result of firing the advance trigger on a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The task moved between buckets.
    Moved {
        /// Bucket left.
        from: TaskStatus,
        /// Bucket entered.
        to: TaskStatus,
    },
    /// The task is completed; the trigger was swallowed.
    AlreadyCompleted,
    /// Another effect is in flight for the task; the trigger was dropped.
    Ignored,
}

/// Service-level errors for task store operations.
#[derive(Debug, Error)]
pub enum TaskStoreError {
    /// No task with this identifier is held by the store.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// A transition or removal of the task has not finished yet.
    #[error("task {0} has an operation in flight")]
    InFlight(TaskId),

    /// The repository could not persist the change.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Orchestrates tasks, status buckets and the category index.
///
/// Operations on different tasks may interleave at effect boundaries.
/// Operations on the same task are serialized by an in-flight mark that is
/// held from the start of an effect until the change has been applied.
pub struct TaskStore<R, V, C>
where
    R: TaskRepository,
    V: TaskView,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    view: Arc<V>,
    clock: Arc<C>,
    state: Mutex<StoreState>,
}

impl<R, V, C> TaskStore<R, V, C>
where
    R: TaskRepository,
    V: TaskView,
    C: Clock + Send + Sync,
{
    /// Creates an empty store.
    #[must_use]
    pub fn new(repository: Arc<R>, view: Arc<V>, clock: Arc<C>) -> Self {
        Self {
            repository,
            view,
            clock,
            state: Mutex::default(),
        }
    }

    /// Repopulates the store from the repository.
    ///
    /// When the repository is empty and `seed_defaults` is set, the
    /// demonstration tasks are created instead. Records already held are
    /// skipped. Returns the number of tasks held afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Repository`] when records cannot be loaded or
    /// seeded.
    pub async fn load(&self, seed_defaults: bool) -> TaskStoreResult<usize> {
        let mut records = self.repository.load_all().await?;
        if records.is_empty() && seed_defaults {
            for data in default_tasks() {
                self.create_task(CreateTaskRequest::new(data)).await?;
            }
            info!(count = self.len(), "seeded default tasks");
            return Ok(self.len());
        }

        records.sort_by_key(|task| (task.sort_index(), task.id()));
        for mut task in records {
            if self.lock().contains(task.id()) {
                continue;
            }
            task.restamp(&*self.clock);
            self.admit(task);
        }
        info!(count = self.len(), "tasks loaded");
        Ok(self.len())
    }

    /// Creates a task, persists it and places it in its bucket.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Repository`] when the record cannot be
    /// saved; the store is left unchanged.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskStoreResult<Task> {
        let sort_index = match request.sort_index {
            Some(sort_index) => sort_index,
            None => self.lock().reserve_sort_index(),
        };
        let task = Task::new(
            TaskId::new(),
            request.data,
            request.status,
            sort_index,
            &*self.clock,
        );
        self.insert(task).await
    }

    /// Replaces the content of a task. Status and rank are kept.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] for an unknown task,
    /// [`TaskStoreError::InFlight`] while the task is mid-effect and
    /// [`TaskStoreError::Repository`] when the record cannot be saved.
    pub async fn update_task(&self, id: TaskId, data: TaskData) -> TaskStoreResult<Task> {
        let (entry, _claim) = self.claim(id)?;
        let updated = entry.task.with_data(data, &*self.clock);
        self.repository.save(&updated).await?;

        let replaced = self.lock().replace(updated.clone());
        let (handle, changes) = replaced.ok_or(TaskStoreError::NotFound(id))?;
        self.view.refresh(handle, &updated);
        self.announce(changes);
        info!(task_id = %id, category = updated.category(), "task updated");
        Ok(updated)
    }

    /// Plays the removal effect, deletes the record and drops the task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] for an unknown task,
    /// [`TaskStoreError::InFlight`] while the task is mid-effect and
    /// [`TaskStoreError::Repository`] when the record cannot be deleted; the
    /// task is then kept.
    pub async fn remove_task(&self, id: TaskId) -> TaskStoreResult<()> {
        let (entry, _claim) = self.claim(id)?;
        self.view.play_effect(entry.handle, EffectKind::Remove).await;
        self.discard(&entry).await
    }

    /// Removes every task. Returns how many were removed.
    ///
    /// Works on a snapshot; tasks with an operation in flight are skipped.
    /// The removal effects play together, then records are deleted in rank
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Repository`] on the first deletion failure.
    /// Tasks deleted before it stay removed; the failed task and the ones
    /// after it are kept.
    pub async fn remove_all(&self) -> TaskStoreResult<usize> {
        Ok(self.remove_where(|_| true).await?.len())
    }

    /// Removes every task whose outdated marker is set.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Repository`] on the first deletion failure.
    pub async fn remove_all_outdated(&self) -> TaskStoreResult<usize> {
        Ok(self.remove_where(Task::is_outdated).await?.len())
    }

    /// Removes every task filed under the category of `label`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Repository`] on the first deletion failure.
    pub async fn remove_category(&self, label: &str) -> TaskStoreResult<usize> {
        let id = CategoryId::from_label(label);
        Ok(self
            .remove_where(|task| task.category_id() == id)
            .await?
            .len())
    }

    /// Fires the advance trigger on a task.
    ///
    /// Pending moves to progress and progress to completed, each after its
    /// effect has played. Completed tasks and tasks already mid-effect are
    /// left alone.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] for an unknown task and
    /// [`TaskStoreError::Repository`] when the new status cannot be saved;
    /// the task then stays in its bucket.
    pub async fn transition(&self, id: TaskId) -> TaskStoreResult<TransitionOutcome> {
        let (entry, _claim) = match self.claim(id) {
            Ok(claimed) => claimed,
            Err(TaskStoreError::InFlight(_)) => return Ok(TransitionOutcome::Ignored),
            Err(err) => return Err(err),
        };
        let from = entry.task.status();
        let (Some(to), Some(effect)) = (from.advance(), from.advance_effect()) else {
            return Ok(TransitionOutcome::AlreadyCompleted);
        };

        self.view.play_effect(entry.handle, effect).await;
        let moved = entry.task.with_status(to);
        self.repository.save(&moved).await?;

        let replaced = self.lock().replace(moved.clone());
        let (handle, _) = replaced.ok_or(TaskStoreError::NotFound(id))?;
        self.view.refresh(handle, &moved);
        info!(task_id = %id, %from, %to, "task transitioned");
        Ok(TransitionOutcome::Moved { from, to })
    }

    /// Reorders every task by `choice` and rebuilds the store in that order.
    ///
    /// Ranks are renumbered densely by final position and saved before the
    /// store is touched. The rebuild then removes each task and recreates it
    /// through the creation path, so the view sees fresh handles while task
    /// identifiers are kept. Every task stays claimed until the rebuild is
    /// done.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::InFlight`] when any task is mid-effect and
    /// [`TaskStoreError::Repository`] when a reordered record cannot be
    /// saved. The store is then left in its previous order.
    pub async fn sort(&self, choice: SortChoice) -> TaskStoreResult<Vec<Task>> {
        let (entries, _claim) = {
            let mut state = self.lock();
            if let Some(busy) = state.first_in_flight() {
                return Err(TaskStoreError::InFlight(busy));
            }
            let (entries, _) = state.begin_matching(|_| true);
            drop(state);
            let ids = entries.iter().map(|entry| entry.task.id()).collect();
            (entries, Claim::many(&self.state, ids))
        };

        let previous: Vec<Task> = entries.iter().map(|entry| entry.task.clone()).collect();
        let ordered = order(previous.clone(), choice);
        self.persist_order(&previous, &ordered).await?;

        join_all(
            entries
                .iter()
                .map(|entry| self.view.play_effect(entry.handle, EffectKind::Remove)),
        )
        .await;
        for entry in &entries {
            self.forget(entry.task.id());
        }

        let rebuilt: Vec<Task> = ordered
            .into_iter()
            .map(|task| {
                let recreated = Task::new(
                    task.id(),
                    task.data().clone(),
                    task.status(),
                    task.sort_index(),
                    &*self.clock,
                );
                self.admit(recreated.clone());
                recreated
            })
            .collect();
        info!(%choice, count = rebuilt.len(), "tasks sorted");
        Ok(rebuilt)
    }

    /// Returns the task with `id`.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<Task> {
        self.lock().entry(id).map(|entry| entry.task.clone())
    }

    /// Returns every task ordered by rank.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.lock().ordered_tasks()
    }

    /// Returns the tasks of one bucket in the order they entered it.
    #[must_use]
    pub fn bucket(&self, status: TaskStatus) -> Vec<Task> {
        self.lock().bucket(status)
    }

    /// Returns the tasks filed under `category`, ordered by rank.
    ///
    /// `None` selects every task; the empty identifier selects
    /// uncategorized tasks.
    #[must_use]
    pub fn tasks_in_category(&self, category: Option<&CategoryId>) -> Vec<Task> {
        let tasks = self.tasks();
        match category {
            None => tasks,
            Some(id) => tasks
                .into_iter()
                .filter(|task| &task.category_id() == id)
                .collect(),
        }
    }

    /// Returns the tracked categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        self.lock().categories().categories().to_vec()
    }

    /// Returns whether any task is filed under `id`.
    #[must_use]
    pub fn references_category(&self, id: &CategoryId) -> bool {
        self.lock().references_category(id)
    }

    /// Returns the number of tasks held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` when no task is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks a task busy for the lifetime of the returned claim.
    fn claim(&self, id: TaskId) -> TaskStoreResult<(Entry, Claim<'_>)> {
        let mut state = self.lock();
        let entry = state.entry(id).cloned().ok_or(TaskStoreError::NotFound(id))?;
        if !state.begin(id) {
            return Err(TaskStoreError::InFlight(id));
        }
        drop(state);
        Ok((entry, Claim::new(&self.state, id)))
    }

    async fn insert(&self, task: Task) -> TaskStoreResult<Task> {
        self.repository.save(&task).await?;
        self.admit(task.clone());
        info!(
            task_id = %task.id(),
            status = %task.status(),
            category = task.category(),
            "task created"
        );
        Ok(task)
    }

    fn admit(&self, task: Task) {
        let handle = self.view.render(&task);
        let created = self.lock().admit(task, handle);
        self.announce(CategoryChanges {
            created,
            removed: None,
        });
    }

    fn announce(&self, changes: CategoryChanges) {
        if let Some(category) = changes.created {
            self.view.notify_category_created(&category);
        }
        if let Some(category) = changes.removed {
            self.view.notify_category_removed(&category);
        }
    }

    /// Removes the matching tasks of a snapshot, returning the identifiers
    /// actually removed.
    async fn remove_where(
        &self,
        predicate: impl Fn(&Task) -> bool,
    ) -> TaskStoreResult<Vec<TaskId>> {
        let (entries, _claim) = {
            let mut state = self.lock();
            let (entries, busy) = state.begin_matching(predicate);
            drop(state);
            for id in busy {
                warn!(task_id = %id, "skipping task with an operation in flight");
            }
            let ids = entries.iter().map(|entry| entry.task.id()).collect();
            (entries, Claim::many(&self.state, ids))
        };

        join_all(
            entries
                .iter()
                .map(|entry| self.view.play_effect(entry.handle, EffectKind::Remove)),
        )
        .await;

        let mut removed = Vec::with_capacity(entries.len());
        for entry in &entries {
            self.discard(entry).await?;
            removed.push(entry.task.id());
        }
        Ok(removed)
    }

    /// Deletes the record of a claimed task and drops it from the store.
    async fn discard(&self, entry: &Entry) -> TaskStoreResult<()> {
        let id = entry.task.id();
        match self.repository.delete(&entry.task).await {
            Ok(()) => {}
            Err(TaskRepositoryError::NotFound(_)) => {
                warn!(task_id = %id, "record already absent from storage");
            }
            Err(err) => return Err(err.into()),
        }
        self.forget(id);
        info!(task_id = %id, category = entry.task.category(), "task removed");
        Ok(())
    }

    /// Drops a task from memory and the view without touching storage.
    fn forget(&self, id: TaskId) {
        let detached = self.lock().detach(id);
        if let Some((entry, removed)) = detached {
            self.view.detach(entry.handle);
            self.announce(CategoryChanges {
                created: None,
                removed,
            });
        }
    }

    /// Saves every reordered record. On failure the records already saved
    /// are put back with their previous ranks.
    async fn persist_order(&self, previous: &[Task], ordered: &[Task]) -> TaskStoreResult<()> {
        for (position, task) in ordered.iter().enumerate() {
            let Err(err) = self.repository.save(task).await else {
                continue;
            };
            warn!(
                task_id = %task.id(),
                error = %err,
                "sort aborted, restoring previous order"
            );
            for saved in ordered.iter().take(position) {
                let Some(original) = previous.iter().find(|old| old.id() == saved.id()) else {
                    continue;
                };
                if let Err(restore_err) = self.repository.save(original).await {
                    warn!(
                        task_id = %original.id(),
                        error = %restore_err,
                        "failed to restore previous rank"
                    );
                }
            }
            return Err(err.into());
        }
        Ok(())
    }
}
