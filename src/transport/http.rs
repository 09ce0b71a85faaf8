//! HTTP transport backed by reqwest.

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use tracing::debug;

use super::{Transport, TransportRequest};
use crate::config::Config;
use crate::error::TransportError;
use crate::models::form_body;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Production transport using a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport that identifies itself with `user_agent`.
    pub fn new(user_agent: &str) -> Result<Self, TransportError> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }

    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        Self::new(&config.user_agent)
    }

    /// Wrap an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<String, TransportError> {
        let mut builder = self.client.request(request.method.into(), &request.url);

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(params) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(form_body(params));
        }

        let response = builder.send().await.map_err(map_send_error)?;
        let status = response.status();
        debug!(url = %request.url, status = status.as_u16(), "response received");

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        response.text().await.map_err(map_send_error)
    }
}

fn map_send_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Http(err)
    }
}
