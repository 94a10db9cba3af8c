//! Taskboard: personal task tracking with derived categories.
//!
//! Tasks carry a title, a free-text category, a description, a deadline
//! and two flags, and move through three status buckets. The crate keeps
//! the task collection, the buckets, the set of live categories and the
//! persisted records in lockstep.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage and display
//! - **Adapters**: Concrete implementations of ports (memory, JSON files)
//!
//! # Modules
//!
//! - [`task`]: Task store, category index, status machine and sorter
//! - [`config`]: TOML configuration

pub mod config;
pub mod task;
