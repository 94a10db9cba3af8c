//! Category liveness across create, update and remove.

use super::helpers::{Board, add, board, category_ids};
use rstest::rstest;
use taskboard::task::domain::{CategoryId, TaskData};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn category_lives_exactly_as_long_as_its_tasks(board: Board) {
    let task = add(&board.store, "A", "Work").await;
    assert_eq!(category_ids(&board.store), vec!["work"]);

    board
        .store
        .remove_task(task.id())
        .await
        .expect("removal should succeed");

    assert!(category_ids(&board.store).is_empty());
    assert!(!board.store.references_category(&CategoryId::from_label("work")));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn whitespace_variants_share_one_category(board: Board) {
    let a = add(&board.store, "A", "Home").await;
    add(&board.store, "B", "Home ").await;

    board
        .store
        .remove_task(a.id())
        .await
        .expect("removal should succeed");

    assert_eq!(category_ids(&board.store), vec!["home"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn editing_category_away_orphans_old_one(board: Board) {
    let task = add(&board.store, "A", "Work").await;

    board
        .store
        .update_task(
            task.id(),
            TaskData::new("A", task.deadline()).with_category("Leisure"),
        )
        .await
        .expect("update should succeed");

    assert_eq!(category_ids(&board.store), vec!["leisure"]);
    assert_eq!(
        board.view.removed_categories(),
        vec![CategoryId::from_label("work")]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn uncategorized_tasks_never_create_a_category(board: Board) {
    let task = add(&board.store, "A", "   ").await;
    board
        .store
        .update_task(task.id(), TaskData::new("A", task.deadline()))
        .await
        .expect("update should succeed");

    assert!(board.store.categories().is_empty());
    assert!(board.view.created_categories().is_empty());
    assert!(board.view.removed_categories().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_category_removes_its_tasks(board: Board) {
    add(&board.store, "A", "Work").await;
    add(&board.store, "B", "Work").await;
    let other = add(&board.store, "C", "").await;

    let removed = board
        .store
        .remove_category("work")
        .await
        .expect("category removal should succeed");

    assert_eq!(removed, 2);
    assert_eq!(board.store.tasks(), vec![other]);
    assert!(board.store.categories().is_empty());
    assert_eq!(board.repository.len(), 1);
}
