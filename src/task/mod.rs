//! Task tracking and category synchronization.
//!
//! The [`services::TaskStore`] owns the task collection and is the only
//! mutation entry point. It drives the [`services::CategoryIndex`], the
//! status state machine on [`domain::TaskStatus`] and the sorter, and calls
//! out to the persistence and view ports. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
