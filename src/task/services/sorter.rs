//! Total ordering of tasks and dense rank reassignment.

use crate::task::domain::{SortChoice, SortIndex, Task};

/// Orders `tasks` by `choice` and renumbers their ranks by final position.
///
/// Tasks that compare equal keep their previous rank order. Ranks start at
/// zero and have no gaps.
#[must_use]
pub fn order(mut tasks: Vec<Task>, choice: SortChoice) -> Vec<Task> {
    tasks.sort_by(|a, b| {
        choice
            .compare(a, b)
            .then_with(|| a.sort_index().cmp(&b.sort_index()))
    });
    tasks
        .into_iter()
        .zip(0_u64..)
        .map(|(task, position)| task.with_sort_index(SortIndex::new(position)))
        .collect()
}
