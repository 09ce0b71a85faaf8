//! Background Tasks Module
//!
//! Contains background tasks that run periodically while a `RequestCache` is alive.
//!
//! # Tasks
//! - Expiry sweep: removes expired cache entries once per TTL interval

mod sweep;

pub use sweep::spawn_sweep_task;
