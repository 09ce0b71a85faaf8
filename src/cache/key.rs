//! Cache Key Module
//!
//! Derives the cache key for a request from its URL and parameters.

use std::sync::Arc;

use crate::models::Params;

/// Function used to derive a cache key from a URL and its parameters.
pub type KeyFn = Arc<dyn Fn(&str, Option<&Params>) -> String + Send + Sync>;

// == JSON Key ==
/// Default key derivation: the URL followed by the JSON text of the params.
///
/// The key is order-sensitive. `{a, b}` and `{b, a}` produce different keys
/// because params keep their insertion order. Absent params serialize as
/// `null`. The method is not part of the key, so a GET and a POST to the same
/// URL with the same params share an entry.
pub fn json_key(url: &str, params: Option<&Params>) -> String {
    let params = match params {
        Some(params) => serde_json::Value::Object(params.clone()).to_string(),
        None => "null".to_string(),
    };
    format!("{url}{params}")
}

/// The default key function as a `KeyFn`.
pub fn default_key_fn() -> KeyFn {
    Arc::new(json_key)
}
