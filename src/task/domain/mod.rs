//! Domain model for the task tracker.
//!
//! Tasks, their status buckets, derived categories and sort criteria. No
//! infrastructure concerns live here.

mod category;
mod defaults;
mod error;
mod ids;
mod sort;
mod status;
mod task;

pub use category::{Category, CategoryId, normalize};
pub use defaults::default_tasks;
pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::{SortIndex, TaskId};
pub use sort::{SortChoice, collate};
pub use status::{EffectKind, TaskStatus};
pub use task::{DEADLINE_FORMAT, Task, TaskData, parse_deadline};
