//! JSON Request Cache - a JSON request helper with a TTL response cache
//!
//! Sends GET/POST requests, parses JSON responses and optionally caches them
//! by URL and parameters for a configurable time-to-live.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;
pub mod transport;

pub use client::RequestCache;
pub use config::Config;
pub use error::{RequestError, Result, TransportError};
pub use models::{Headers, Method, Params};
pub use transport::{HttpTransport, Transport, TransportRequest};
