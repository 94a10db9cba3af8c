//! Shared fixtures for task store integration tests.

use std::sync::Arc;

use chrono::NaiveDate;
use mockable::DefaultClock;
use rstest::fixture;
use taskboard::config::EffectDurations;
use taskboard::task::{
    adapters::memory::{InMemoryTaskRepository, RecordingView},
    domain::{Task, TaskData},
    services::{CreateTaskRequest, TaskStore},
};

/// Store type used throughout the integration tests.
pub type TestStore = TaskStore<InMemoryTaskRepository, RecordingView, DefaultClock>;

/// A store together with handles on its collaborators.
pub struct Board {
    /// Store under test.
    pub store: TestStore,
    /// Shared view of the persisted records.
    pub repository: InMemoryTaskRepository,
    /// View receiving every display call.
    pub view: Arc<RecordingView>,
}

/// Builds a board over existing collaborators.
pub fn board_with(repository: InMemoryTaskRepository) -> Board {
    assemble(repository, RecordingView::new())
}

/// Builds an empty board whose effects each last `millis`.
pub fn slow_board(millis: u64) -> Board {
    let durations = EffectDurations {
        advance_ms: millis,
        complete_ms: millis,
        remove_ms: millis,
    };
    assemble(
        InMemoryTaskRepository::new(),
        RecordingView::with_durations(durations),
    )
}

fn assemble(repository: InMemoryTaskRepository, recording: RecordingView) -> Board {
    let view = Arc::new(recording);
    let store = TaskStore::new(
        Arc::new(repository.clone()),
        Arc::clone(&view),
        Arc::new(DefaultClock),
    );
    Board {
        store,
        repository,
        view,
    }
}

/// Provides an empty board.
#[fixture]
pub fn board() -> Board {
    board_with(InMemoryTaskRepository::new())
}

/// Parses a `YYYY-MM-DD` test date.
pub fn day(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid test date")
}

/// Creates a task with a far-future deadline.
pub async fn add(store: &TestStore, title: &str, category: &str) -> Task {
    add_due(store, title, category, "2999-01-01").await
}

/// Creates a task with the given deadline.
pub async fn add_due(store: &TestStore, title: &str, category: &str, deadline: &str) -> Task {
    let data = TaskData::new(title, day(deadline)).with_category(category);
    store
        .create_task(CreateTaskRequest::new(data))
        .await
        .expect("task creation should succeed")
}

/// Returns the tracked category identifiers in display order.
pub fn category_ids(store: &TestStore) -> Vec<String> {
    store
        .categories()
        .iter()
        .map(|category| category.id().as_str().to_owned())
        .collect()
}
