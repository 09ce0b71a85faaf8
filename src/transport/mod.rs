//! Transport Module
//!
//! The seam between the dispatcher and the network. A transport receives a
//! fully built request and resolves to the response text or a
//! `TransportError`, exactly once.

mod http;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::models::{Method, Params};

pub use http::HttpTransport;

/// A request ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: Method,
    /// Final URL, including any query string built from GET params
    pub url: String,
    /// Headers to attach, empty values already filtered out
    pub headers: Vec<(String, String)>,
    /// Params sent as the request body
    pub body: Option<Params>,
    /// Per-request timeout, `None` for no limit
    pub timeout: Option<Duration>,
}

/// Sends requests and returns the response body text.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<String, TransportError>;
}
