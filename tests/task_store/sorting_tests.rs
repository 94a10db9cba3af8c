//! Sorting rebuilds the store in the requested order.

use super::helpers::{Board, add, add_due, board, category_ids, slow_board};
use rstest::rstest;
use taskboard::task::{
    domain::{SortChoice, Task, TaskStatus},
    services::{TaskStoreError, TransitionOutcome},
};

fn titles(tasks: &[Task]) -> Vec<String> {
    tasks.iter().map(|task| task.title().to_owned()).collect()
}

#[rstest]
#[case(SortChoice::AlphaAsc, vec!["apple", "Banana", "cherry"])]
#[case(SortChoice::AlphaDesc, vec!["cherry", "Banana", "apple"])]
#[case(SortChoice::DateAsc, vec!["cherry", "apple", "Banana"])]
#[case(SortChoice::DateDesc, vec!["Banana", "apple", "cherry"])]
#[tokio::test(flavor = "multi_thread")]
async fn sort_orders_every_task(
    board: Board,
    #[case] choice: SortChoice,
    #[case] expected: Vec<&str>,
) {
    add_due(&board.store, "Banana", "Fruit", "2020-01-01").await;
    add_due(&board.store, "apple", "Fruit", "2010-01-01").await;
    add_due(&board.store, "cherry", "", "2000-01-01").await;

    let sorted = board.store.sort(choice).await.expect("sort should succeed");

    assert_eq!(titles(&sorted), expected);
    assert_eq!(titles(&board.store.tasks()), expected);
    let ranks: Vec<u64> = board
        .store
        .tasks()
        .iter()
        .map(|task| task.sort_index().value())
        .collect();
    assert_eq!(ranks, vec![0, 1, 2]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sort_recreates_through_the_creation_path(board: Board) {
    add(&board.store, "b", "Work").await;
    add(&board.store, "a", "Work").await;

    board
        .store
        .sort(SortChoice::AlphaAsc)
        .await
        .expect("sort should succeed");

    assert_eq!(category_ids(&board.store), vec!["work"]);
    assert_eq!(board.view.created_categories().len(), 2);
    assert_eq!(board.view.removed_categories().len(), 1);
    assert_eq!(board.repository.len(), 2);
    assert_eq!(titles(&board.store.bucket(TaskStatus::Pending)), vec!["a", "b"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sort_refuses_while_a_task_is_mid_effect() {
    let board = slow_board(50);
    let task = add(&board.store, "a", "").await;

    let (moved, sorted) = tokio::join!(
        board.store.transition(task.id()),
        board.store.sort(SortChoice::AlphaAsc)
    );

    assert!(moved.is_ok());
    assert!(matches!(sorted, Err(TaskStoreError::InFlight(id)) if id == task.id()));
    assert_eq!(board.store.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn trigger_during_sort_rebuild_is_ignored() {
    let board = slow_board(50);
    let first = add(&board.store, "b", "").await;
    add(&board.store, "a", "").await;

    let (sorted, moved) = tokio::join!(
        board.store.sort(SortChoice::AlphaAsc),
        board.store.transition(first.id())
    );

    assert_eq!(moved.expect("trigger should not fail"), TransitionOutcome::Ignored);
    assert_eq!(titles(&sorted.expect("sort should succeed")), vec!["a", "b"]);
    let ranks: Vec<u64> = board
        .store
        .tasks()
        .iter()
        .map(|task| task.sort_index().value())
        .collect();
    assert_eq!(ranks, vec![0, 1]);
    assert_eq!(board.store.bucket(TaskStatus::Pending).len(), 2);

    let after = board
        .store
        .transition(first.id())
        .await
        .expect("trigger after the rebuild");
    assert!(matches!(after, TransitionOutcome::Moved { .. }));
}
