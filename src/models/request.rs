//! Request inputs
//!
//! Defines the method, parameter and header types accepted by the dispatcher.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request parameters.
///
/// Insertion order is preserved (serde_json `preserve_order`), so both the
/// query string and the cache key follow the order the caller built them in.
pub type Params = serde_json::Map<String, Value>;

/// Custom request headers. Entries with an empty value are not sent.
pub type Headers = HashMap<String, String>;

/// HTTP method supported by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        }
    }
}

/// Text form of a parameter value.
///
/// Strings are used as-is, every other JSON value is written as JSON text.
pub fn param_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}
