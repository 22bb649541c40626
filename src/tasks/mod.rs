//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - TTL Cleanup: sweeps expired response-cache entries at configured
//!   intervals. Lazy expiry at read time already keeps results correct; the
//!   sweep bounds memory held by keys that are never read again.

mod cleanup;

pub use cleanup::spawn_cleanup_task;
