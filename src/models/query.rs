//! Parameter encoding
//!
//! Turns request params into `key=value` pairs for query strings and form bodies.

use crate::models::{param_text, Params};

/// Encodes every param as `key=urlencoded(value)`, in insertion order.
///
/// Keys are written verbatim.
pub fn encode_pairs(params: &Params) -> Vec<String> {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&param_text(value))))
        .collect()
}

/// Appends params to `url` as a query string.
///
/// Every pair is prefixed with `&`, so `{a: "1", b: "2"}` yields `?&a=1&b=2`.
/// When the URL already carries a query the pairs are appended to it instead
/// of starting a second one. Empty params leave the URL unchanged.
pub fn append_query(url: &str, params: &Params) -> String {
    if params.is_empty() {
        return url.to_string();
    }

    let mut out = String::from(url);
    if !url.contains('?') {
        out.push('?');
    }
    for pair in encode_pairs(params) {
        out.push('&');
        out.push_str(&pair);
    }
    out
}

/// Encodes params as an `application/x-www-form-urlencoded` body.
pub fn form_body(params: &Params) -> String {
    encode_pairs(params).join("&")
}
