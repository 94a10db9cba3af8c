//! Adapter implementations of the task ports.

pub mod json_file;
pub mod memory;
