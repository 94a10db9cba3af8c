//! Application services keeping tasks, buckets and categories in sync.

mod category_index;
mod sorter;
mod state;
mod store;

pub use category_index::CategoryIndex;
pub use sorter::order;
pub use store::{
    CreateTaskRequest, TaskStore, TaskStoreError, TaskStoreResult, TransitionOutcome,
};
