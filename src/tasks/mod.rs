//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the cache.
//!
//! # Tasks
//! - Cleanup sweep: removes expired and unreadable entries at configured intervals

mod cleanup;

pub use cleanup::spawn_cleanup_task;
