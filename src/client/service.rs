//! Request Cache Service
//!
//! Dispatches JSON requests through a transport and keeps successful
//! response bodies in a TTL cache.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{default_key_fn, CacheStats, CacheStore, KeyFn};
use crate::config::{Config, DEFAULT_TIMEOUT_SECS};
use crate::error::{RequestError, Result, TransportError};
use crate::models::{append_query, Headers, Method, Params};
use crate::tasks::spawn_sweep_task;
use crate::transport::{HttpTransport, Transport, TransportRequest};

/// JSON request dispatcher with an optional response cache.
///
/// Caching is disabled until [`set_cache`](Self::set_cache) is called with a
/// positive TTL. While enabled, a background task sweeps expired entries once
/// per TTL interval; lookups also check expiry, so a stale entry is never served.
///
/// Concurrent requests for the same key are not coalesced: if both miss the
/// cache, both reach the transport and the later response overwrites the
/// earlier entry.
pub struct RequestCache {
    transport: Arc<dyn Transport>,
    cache: Arc<RwLock<CacheStore>>,
    sweeper: Mutex<Option<JoinHandle<()>>>,
    timeout: RwLock<Option<Duration>>,
    key_fn: KeyFn,
}

impl RequestCache {
    // == Constructors ==
    /// Creates a service with caching disabled and the default 40 second timeout.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            cache: Arc::new(RwLock::new(CacheStore::new(None))),
            sweeper: Mutex::new(None),
            timeout: RwLock::new(seconds(DEFAULT_TIMEOUT_SECS)),
            key_fn: default_key_fn(),
        }
    }

    /// Creates a service over an `HttpTransport`, applying the configured
    /// cache TTL and timeout.
    pub async fn from_config(config: &Config) -> std::result::Result<Self, TransportError> {
        let service = Self::new(Arc::new(HttpTransport::from_config(config)?));
        service.set_timeout(config.request_timeout).await;
        service.set_cache(config.cache_ttl).await;
        Ok(service)
    }

    /// Replaces the cache key derivation.
    pub fn with_key_fn<F>(mut self, key_fn: F) -> Self
    where
        F: Fn(&str, Option<&Params>) -> String + Send + Sync + 'static,
    {
        self.key_fn = Arc::new(key_fn);
        self
    }

    // == Configuration ==
    /// Enables caching for `ttl_secs` seconds, or disables it when the value
    /// is not a positive finite number.
    ///
    /// Any running sweep task is cancelled first, so repeated calls never leave
    /// more than one sweep alive. Disabling keeps existing entries but hides
    /// them from lookups.
    pub async fn set_cache(&self, ttl_secs: f64) {
        let ttl = seconds(ttl_secs);
        let mut sweeper = self.sweeper.lock().await;

        if let Some(handle) = sweeper.take() {
            handle.abort();
        }
        self.cache.write().await.set_ttl(ttl);

        match ttl {
            Some(ttl) => {
                *sweeper = Some(spawn_sweep_task(self.cache.clone(), ttl));
                info!(ttl_ms = ttl.as_millis() as u64, "Response cache enabled");
            }
            None => info!("Response cache disabled"),
        }
    }

    /// Sets the timeout for requests issued after this call. Non-positive
    /// values remove the limit.
    pub async fn set_timeout(&self, timeout_secs: f64) {
        let timeout = seconds(timeout_secs);
        *self.timeout.write().await = timeout;
        debug!(?timeout, "Request timeout updated");
    }

    pub async fn cache_ttl(&self) -> Option<Duration> {
        self.cache.read().await.ttl()
    }

    pub async fn request_timeout(&self) -> Option<Duration> {
        *self.timeout.read().await
    }

    // == Lifecycle ==
    /// Returns current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    /// Drops every cached response. Configuration is kept.
    pub async fn clear(&self) {
        self.cache.write().await.clear();
    }

    /// Returns the service to its initial state: caching disabled, sweep
    /// cancelled, cache and statistics emptied, default timeout.
    pub async fn reset(&self) {
        self.set_cache(0.0).await;
        {
            let mut cache = self.cache.write().await;
            cache.clear();
            cache.reset_stats();
        }
        self.set_timeout(DEFAULT_TIMEOUT_SECS).await;
    }

    /// Cancels the sweep task. Cached entries stay readable until they expire.
    pub async fn shutdown(&self) {
        if let Some(handle) = self.sweeper.lock().await.take() {
            handle.abort();
            debug!("Cache sweep task stopped");
        }
    }

    // == Requests ==
    /// Sends a GET request; params are moved into the query string.
    pub async fn get(
        &self,
        url: &str,
        params: Option<&Params>,
        headers: Option<&Headers>,
    ) -> Result<Value> {
        self.send_request(Method::Get, url, params, headers).await
    }

    /// Sends a POST request; params are sent as the body.
    pub async fn post(
        &self,
        url: &str,
        params: Option<&Params>,
        headers: Option<&Headers>,
    ) -> Result<Value> {
        self.send_request(Method::Post, url, params, headers).await
    }

    /// Serves the request from the cache when possible, otherwise sends it
    /// through the transport and parses the response as JSON.
    ///
    /// A cached body that fails to parse is reported as a parse error; the
    /// network is not tried again.
    pub async fn send_request(
        &self,
        method: Method,
        url: &str,
        params: Option<&Params>,
        headers: Option<&Headers>,
    ) -> Result<Value> {
        let key = (self.key_fn)(url, params);

        let cached = self.cache.write().await.get(&key);
        if let Some(raw) = cached {
            debug!(%method, url, "Serving from cache");
            return parse_body(raw);
        }

        let request = self.build_request(method, url, params, headers).await;
        debug!(%method, url = %request.url, "Dispatching request");

        let body = match self.transport.send(request).await {
            Ok(body) => body,
            Err(err) => {
                warn!(%method, url, error = %err, "Request failed");
                return Err(err.into());
            }
        };

        let value: Value = match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(err) => {
                warn!(%method, url, error = %err, "Response is not valid JSON");
                return Err(RequestError::parse(err, body));
            }
        };

        if self.cache.write().await.insert(key, body) {
            debug!(url, "Response cached");
        }
        Ok(value)
    }

    async fn build_request(
        &self,
        method: Method,
        url: &str,
        params: Option<&Params>,
        headers: Option<&Headers>,
    ) -> TransportRequest {
        let (url, body) = match (method, params) {
            (Method::Get, Some(params)) => (append_query(url, params), None),
            (Method::Get, None) => (url.to_string(), None),
            (Method::Post, params) => (url.to_string(), params.cloned()),
        };

        let mut headers: Vec<(String, String)> = headers
            .into_iter()
            .flatten()
            .filter(|(_, value)| !value.is_empty())
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        headers.sort();

        TransportRequest {
            method,
            url,
            headers,
            body,
            timeout: *self.timeout.read().await,
        }
    }
}

impl Drop for RequestCache {
    fn drop(&mut self) {
        if let Some(handle) = self.sweeper.get_mut().take() {
            handle.abort();
        }
    }
}

fn parse_body(raw: String) -> Result<Value> {
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(err) => Err(RequestError::parse(err, raw)),
    }
}

/// Converts a seconds count to a duration; non-positive, NaN and infinite
/// values yield `None`.
fn seconds(secs: f64) -> Option<Duration> {
    if secs.is_finite() && secs > 0.0 {
        Duration::try_from_secs_f64(secs).ok()
    } else {
        None
    }
}
