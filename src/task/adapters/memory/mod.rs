//! In-memory adapters for tests and headless use.

mod task;
mod view;

pub use task::InMemoryTaskRepository;
pub use view::{RecordingView, ViewEvent};
