//! Client Module
//!
//! The `RequestCache` service: GET/POST JSON requests with an optional
//! time-bounded response cache.

mod service;

pub use service::RequestCache;
