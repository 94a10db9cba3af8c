//! Headless view that records every call the task store makes.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};

use crate::config::EffectDurations;
use crate::task::{
    domain::{Category, CategoryId, EffectKind, Task, TaskId, TaskStatus},
    ports::{TaskView, ViewHandle},
};

/// One recorded view call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// A task was drawn.
    Rendered {
        /// Handle issued for the task.
        handle: ViewHandle,
        /// Task drawn.
        task_id: TaskId,
        /// Bucket the task was drawn into.
        status: TaskStatus,
    },
    /// A task was redrawn.
    Refreshed {
        /// Handle of the redrawn task.
        handle: ViewHandle,
        /// Bucket after the redraw.
        status: TaskStatus,
    },
    /// A display element was dropped.
    Detached(ViewHandle),
    /// An effect finished playing.
    Effect {
        /// Handle the effect played on.
        handle: ViewHandle,
        /// Effect played.
        kind: EffectKind,
    },
    /// A category appeared.
    CategoryCreated(CategoryId),
    /// A category disappeared.
    CategoryRemoved(CategoryId),
}

#[derive(Debug, Default)]
struct RecordingState {
    next_handle: u64,
    events: Vec<ViewEvent>,
}

/// View adapter without a display.
///
/// Effects sleep for the configured duration so that the in-flight window
/// of a transition is observable; zero durations resolve immediately.
#[derive(Debug, Clone)]
pub struct RecordingView {
    state: Arc<Mutex<RecordingState>>,
    durations: EffectDurations,
}

impl RecordingView {
    /// Creates a view whose effects resolve immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::with_durations(EffectDurations::instant())
    }

    /// Creates a view whose effects last `durations`.
    #[must_use]
    pub fn with_durations(durations: EffectDurations) -> Self {
        Self {
            state: Arc::default(),
            durations,
        }
    }

    /// Returns every recorded call in order.
    #[must_use]
    pub fn events(&self) -> Vec<ViewEvent> {
        self.lock().events.clone()
    }

    /// Returns the identifiers announced as created, in order.
    #[must_use]
    pub fn created_categories(&self) -> Vec<CategoryId> {
        self.lock()
            .events
            .iter()
            .filter_map(|event| match event {
                ViewEvent::CategoryCreated(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    /// Returns the identifiers announced as removed, in order.
    #[must_use]
    pub fn removed_categories(&self) -> Vec<CategoryId> {
        self.lock()
            .events
            .iter()
            .filter_map(|event| match event {
                ViewEvent::CategoryRemoved(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    /// Returns the effects played, in order.
    #[must_use]
    pub fn effects(&self) -> Vec<EffectKind> {
        self.lock()
            .events
            .iter()
            .filter_map(|event| match event {
                ViewEvent::Effect { kind, .. } => Some(*kind),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RecordingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, event: ViewEvent) {
        self.lock().events.push(event);
    }
}

impl Default for RecordingView {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskView for RecordingView {
    fn render(&self, task: &Task) -> ViewHandle {
        let mut state = self.lock();
        state.next_handle += 1;
        let handle = ViewHandle::new(state.next_handle);
        state.events.push(ViewEvent::Rendered {
            handle,
            task_id: task.id(),
            status: task.status(),
        });
        handle
    }

    fn refresh(&self, handle: ViewHandle, task: &Task) {
        self.record(ViewEvent::Refreshed {
            handle,
            status: task.status(),
        });
    }

    fn detach(&self, handle: ViewHandle) {
        self.record(ViewEvent::Detached(handle));
    }

    async fn play_effect(&self, handle: ViewHandle, kind: EffectKind) {
        let duration = self.durations.for_kind(kind);
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
        self.record(ViewEvent::Effect { handle, kind });
    }

    fn notify_category_created(&self, category: &Category) {
        self.record(ViewEvent::CategoryCreated(category.id().clone()));
    }

    fn notify_category_removed(&self, category: &Category) {
        self.record(ViewEvent::CategoryRemoved(category.id().clone()));
    }
}
