//! Request models
//!
//! Types callers use to describe a request (method, parameters, headers)
//! and the encoding of parameters into query strings and form bodies.

pub mod query;
pub mod request;

// Re-export commonly used types
pub use query::{append_query, encode_pairs, form_body};
pub use request::{param_text, Headers, Method, Params};
