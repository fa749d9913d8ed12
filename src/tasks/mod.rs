//! Tasks Module
//!
//! Background maintenance tasks for the cache.

mod cleanup;

pub use cleanup::spawn_cleanup_task;
