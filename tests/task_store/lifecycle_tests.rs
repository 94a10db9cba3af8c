//! Creation, transition and removal flows through the public API.

use std::time::{Duration, Instant};

use super::helpers::{Board, add, add_due, board, board_with, day, slow_board};
use mockable::DefaultClock;
use rstest::rstest;
use taskboard::task::{
    adapters::memory::{InMemoryTaskRepository, ViewEvent},
    domain::{EffectKind, SortIndex, Task, TaskData, TaskId, TaskStatus},
    services::{TaskStoreError, TransitionOutcome},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_moves_through_every_bucket_exactly_once(board: Board) {
    let task = add(&board.store, "Ship release", "Work").await;

    for expected in [TaskStatus::Progress, TaskStatus::Completed] {
        let outcome = board
            .store
            .transition(task.id())
            .await
            .expect("transition should succeed");
        assert!(matches!(outcome, TransitionOutcome::Moved { to, .. } if to == expected));

        let occupied: Vec<TaskStatus> = TaskStatus::ALL
            .into_iter()
            .filter(|status| !board.store.bucket(*status).is_empty())
            .collect();
        assert_eq!(occupied, vec![expected]);
    }

    let last = board
        .store
        .transition(task.id())
        .await
        .expect("trigger on completed task is a no-op");
    assert_eq!(last, TransitionOutcome::AlreadyCompleted);
    assert_eq!(board.store.bucket(TaskStatus::Completed).len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn view_receives_render_effect_refresh_and_detach(board: Board) {
    let task = add(&board.store, "Tidy desk", "").await;
    board
        .store
        .transition(task.id())
        .await
        .expect("transition should succeed");
    board
        .store
        .remove_task(task.id())
        .await
        .expect("removal should succeed");

    let events = board.view.events();
    let Some(ViewEvent::Rendered { handle, task_id, status }) = events.first().cloned() else {
        panic!("expected the first event to be a render, got {events:?}");
    };
    assert_eq!(task_id, task.id());
    assert_eq!(status, TaskStatus::Pending);
    assert_eq!(
        events.get(1..),
        Some(
            &[
                ViewEvent::Effect {
                    handle,
                    kind: EffectKind::Advance
                },
                ViewEvent::Refreshed {
                    handle,
                    status: TaskStatus::Progress
                },
                ViewEvent::Effect {
                    handle,
                    kind: EffectKind::Remove
                },
                ViewEvent::Detached(handle),
            ][..]
        )
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn outdated_marker_is_stamped_at_creation(board: Board) {
    let late = add_due(&board.store, "Late", "", "2000-04-08").await;
    let early = add(&board.store, "Early", "").await;

    assert!(late.is_outdated());
    assert!(!early.is_outdated());

    let removed = board
        .store
        .remove_all_outdated()
        .await
        .expect("bulk removal should succeed");
    assert_eq!(removed, 1);
    assert_eq!(board.store.tasks(), vec![early]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn state_survives_a_restart(board: Board) {
    let task = add(&board.store, "Persist me", "Home").await;
    board
        .store
        .transition(task.id())
        .await
        .expect("transition should succeed");

    let restarted = board_with(board.repository.clone());
    restarted
        .store
        .load(true)
        .await
        .expect("load should succeed");

    let reloaded = restarted.store.get(task.id()).expect("task reloaded");
    assert_eq!(reloaded.status(), TaskStatus::Progress);
    assert_eq!(reloaded.title(), "Persist me");
    assert_eq!(restarted.store.bucket(TaskStatus::Progress).len(), 1);
    assert!(restarted.store.references_category(&reloaded.category_id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn updating_removed_task_is_not_found(board: Board) {
    let task = add(&board.store, "Gone", "").await;
    board
        .store
        .remove_task(task.id())
        .await
        .expect("removal should succeed");

    let result = board
        .store
        .update_task(task.id(), TaskData::new("Back", task.deadline()))
        .await;

    assert!(matches!(result, Err(TaskStoreError::NotFound(id)) if id == task.id()));
    assert!(board.repository.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn load_orders_stored_records_by_rank() {
    let deadline = day("2999-01-01");
    let stored = [("late", 7), ("early", 2), ("middle", 4)].map(|(title, rank)| {
        Task::new(
            TaskId::new(),
            TaskData::new(title, deadline).with_category("Work"),
            TaskStatus::Progress,
            SortIndex::new(rank),
            &DefaultClock,
        )
    });
    let board = board_with(InMemoryTaskRepository::with_tasks(stored));

    let count = board.store.load(true).await.expect("load should succeed");

    assert_eq!(count, 3);
    let tasks = board.store.tasks();
    let titles: Vec<&str> = tasks.iter().map(Task::title).collect();
    assert_eq!(titles, vec!["early", "middle", "late"]);
    assert_eq!(board.store.bucket(TaskStatus::Progress).len(), 3);
    assert_eq!(board.store.categories().len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bulk_removal_plays_effects_together() {
    let board = slow_board(200);
    for title in ["one", "two", "three", "four"] {
        add(&board.store, title, "Work").await;
    }

    let started = Instant::now();
    let removed = board.store.remove_all().await.expect("clear should succeed");

    assert_eq!(removed, 4);
    assert!(started.elapsed() < Duration::from_millis(600));
    assert_eq!(board.view.effects(), vec![EffectKind::Remove; 4]);
    assert!(board.store.is_empty());
    assert_eq!(board.repository.len(), 0);
}
