//! Background tasks owned by the server binary.
//!
//! The cache store never sweeps itself; callers that want periodic expiry
//! spawn [`spawn_cleanup_task`] and abort the returned handle on shutdown.

mod cleanup;

pub use cleanup::spawn_cleanup_task;
