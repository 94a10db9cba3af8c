//! In-memory state owned by the task store.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use super::CategoryIndex;
use crate::task::{
    domain::{Category, CategoryId, SortIndex, Task, TaskId, TaskStatus},
    ports::ViewHandle,
};

/// A task together with the display handle it was rendered under.
#[derive(Debug, Clone)]
pub(super) struct Entry {
    pub(super) task: Task,
    pub(super) handle: ViewHandle,
}

/// Category changes produced by a single mutation.
#[derive(Debug, Default)]
pub(super) struct CategoryChanges {
    pub(super) created: Option<Category>,
    pub(super) removed: Option<Category>,
}

#[derive(Debug, Default)]
pub(super) struct StoreState {
    tasks: HashMap<TaskId, Entry>,
    buckets: BTreeMap<TaskStatus, Vec<TaskId>>,
    categories: CategoryIndex,
    in_flight: HashSet<TaskId>,
    next_sort_index: SortIndex,
}

impl StoreState {
    pub(super) fn entry(&self, id: TaskId) -> Option<&Entry> {
        self.tasks.get(&id)
    }

    pub(super) fn contains(&self, id: TaskId) -> bool {
        self.tasks.contains_key(&id)
    }

    pub(super) fn len(&self) -> usize {
        self.tasks.len()
    }

    pub(super) const fn categories(&self) -> &CategoryIndex {
        &self.categories
    }

    pub(super) fn references_category(&self, id: &CategoryId) -> bool {
        references(&self.tasks, id)
    }

    /// Tasks ordered by rank, identifier breaking ties.
    pub(super) fn ordered_tasks(&self) -> Vec<Task> {
        let mut tasks: Vec<Task> = self.tasks.values().map(|entry| entry.task.clone()).collect();
        tasks.sort_by_key(|task| (task.sort_index(), task.id()));
        tasks
    }

    /// Tasks of one bucket in insertion order.
    pub(super) fn bucket(&self, status: TaskStatus) -> Vec<Task> {
        self.buckets
            .get(&status)
            .into_iter()
            .flatten()
            .filter_map(|id| self.tasks.get(id))
            .map(|entry| entry.task.clone())
            .collect()
    }

    /// Hands out the next free rank.
    pub(super) fn reserve_sort_index(&mut self) -> SortIndex {
        let reserved = self.next_sort_index;
        self.next_sort_index = reserved.next();
        reserved
    }

    pub(super) fn first_in_flight(&self) -> Option<TaskId> {
        self.in_flight.iter().min().copied()
    }

    /// Marks every task matching `predicate` busy, in rank order.
    ///
    /// Returns the claimed entries and the identifiers skipped because
    /// they were already busy.
    pub(super) fn begin_matching(
        &mut self,
        predicate: impl Fn(&Task) -> bool,
    ) -> (Vec<Entry>, Vec<TaskId>) {
        let mut claimed = Vec::new();
        let mut busy = Vec::new();
        for task in self.ordered_tasks().into_iter().filter(|task| predicate(task)) {
            let id = task.id();
            if !self.begin(id) {
                busy.push(id);
                continue;
            }
            if let Some(entry) = self.tasks.get(&id) {
                claimed.push(entry.clone());
            }
        }
        (claimed, busy)
    }

    /// Marks `id` busy. Returns `false` when it already was.
    pub(super) fn begin(&mut self, id: TaskId) -> bool {
        self.in_flight.insert(id)
    }

    pub(super) fn finish(&mut self, id: TaskId) {
        self.in_flight.remove(&id);
    }

    /// Adds a task to its bucket and tracks its category.
    pub(super) fn admit(&mut self, task: Task, handle: ViewHandle) -> Option<Category> {
        let id = task.id();
        let status = task.status();
        if task.sort_index() >= self.next_sort_index {
            self.next_sort_index = task.sort_index().next();
        }
        let label = task.category().to_owned();
        self.tasks.insert(id, Entry { task, handle });
        self.buckets.entry(status).or_default().push(id);
        self.categories.ensure(&label)
    }

    /// Swaps in new content for an admitted task.
    ///
    /// The new category is ensured before the old one is reconciled, so a
    /// still-referenced category is never transiently absent.
    pub(super) fn replace(&mut self, task: Task) -> Option<(ViewHandle, CategoryChanges)> {
        let entry = self.tasks.get_mut(&task.id())?;
        let handle = entry.handle;
        let old_label = entry.task.category().to_owned();
        let new_label = task.category().to_owned();
        let old_status = entry.task.status();
        let new_status = task.status();
        entry.task = task;

        if old_status != new_status {
            let id = entry.task.id();
            self.move_between_buckets(id, old_status, new_status);
        }

        let mut changes = CategoryChanges::default();
        if old_label != new_label {
            changes.created = self.categories.ensure(&new_label);
            let tasks = &self.tasks;
            changes.removed = self
                .categories
                .reconcile(&old_label, |id| references(tasks, id));
        }
        Some((handle, changes))
    }

    /// Removes a task from its bucket and reconciles its category.
    pub(super) fn detach(&mut self, id: TaskId) -> Option<(Entry, Option<Category>)> {
        let entry = self.tasks.remove(&id)?;
        if let Some(bucket) = self.buckets.get_mut(&entry.task.status()) {
            bucket.retain(|candidate| *candidate != id);
        }
        let tasks = &self.tasks;
        let removed = self
            .categories
            .reconcile(entry.task.category(), |category| references(tasks, category));
        Some((entry, removed))
    }

    fn move_between_buckets(&mut self, id: TaskId, from: TaskStatus, to: TaskStatus) {
        if let Some(bucket) = self.buckets.get_mut(&from) {
            bucket.retain(|candidate| *candidate != id);
        }
        self.buckets.entry(to).or_default().push(id);
    }
}

fn references(tasks: &HashMap<TaskId, Entry>, id: &CategoryId) -> bool {
    tasks.values().any(|entry| &entry.task.category_id() == id)
}

/// Releases the in-flight marks of its tasks when dropped.
pub(super) struct Claim<'a> {
    state: &'a Mutex<StoreState>,
    ids: Vec<TaskId>,
}

impl<'a> Claim<'a> {
    pub(super) fn new(state: &'a Mutex<StoreState>, id: TaskId) -> Self {
        Self::many(state, vec![id])
    }

    pub(super) const fn many(state: &'a Mutex<StoreState>, ids: Vec<TaskId>) -> Self {
        Self { state, ids }
    }
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        for id in &self.ids {
            state.finish(*id);
        }
    }
}
