//! Filesystem adapter storing each task as a JSON document.

mod repository;

pub use repository::JsonFileTaskRepository;
