//! JSON Request Cache - command line front end
//!
//! Sends one GET or POST request and prints the parsed JSON response.
//!
//! ```text
//! json_request_cache <get|post> <url> [key=value ...]
//! ```

use anyhow::{bail, Context};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use json_request_cache::{Config, Method, Params, RequestCache};

/// Entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the request service over the HTTP transport
/// 4. Send the request described by the command line
/// 5. Print the JSON response
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "json_request_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (method, url, params) = parse_args(&args)?;

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_ttl={}s, request_timeout={}s",
        config.cache_ttl, config.request_timeout
    );

    let service = RequestCache::from_config(&config)
        .await
        .context("failed to build HTTP transport")?;

    let params = (!params.is_empty()).then_some(params);
    let value = service
        .send_request(method, &url, params.as_ref(), None)
        .await
        .with_context(|| format!("{method} {url} failed"))?;

    println!("{}", serde_json::to_string_pretty(&value)?);
    service.shutdown().await;
    Ok(())
}

/// Parses `<get|post> <url> [key=value ...]`.
fn parse_args(args: &[String]) -> anyhow::Result<(Method, String, Params)> {
    let [method, url, pairs @ ..] = args else {
        bail!("usage: json_request_cache <get|post> <url> [key=value ...]");
    };

    let method = match method.to_ascii_lowercase().as_str() {
        "get" => Method::Get,
        "post" => Method::Post,
        other => bail!("unsupported method: {other}"),
    };

    let mut params = Params::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("expected key=value, got {pair:?}"))?;
        params.insert(key.to_string(), Value::String(value.to_string()));
    }

    Ok((method, url.clone(), params))
}
