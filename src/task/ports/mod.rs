//! Port contracts for the task tracker.
//!
//! Ports define the collaborator interfaces the task store calls into.

pub mod repository;
pub mod view;

pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
pub use view::{TaskView, ViewHandle};
