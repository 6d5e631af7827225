//! `reqwest`-backed HTTP executor.

use super::{HttpClient, HttpError, HttpMethod, HttpRequestOptions};
use crate::config::HttpConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue, ACCEPT};
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::debug;
use url::Url;

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// HTTP client using a shared `reqwest::Client` connection pool
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Build a client from configuration
    pub fn from_config(config: &HttpConfig) -> Result<Self, HttpError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder
            .build()
            .map_err(|e| HttpError::Transport(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn request(&self, options: HttpRequestOptions) -> Result<JsonValue, HttpError> {
        let url = Url::parse(&options.url)
            .map_err(|e| HttpError::InvalidRequest(format!("{}: {}", options.url, e)))?;

        let mut builder = self.client.request(options.method.into(), url);

        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| HttpError::InvalidRequest(e.to_string()))?;
            let value =
                HeaderValue::from_str(value).map_err(|e| HttpError::InvalidRequest(e.to_string()))?;
            builder = builder.header(name, value);
        }

        if options.json {
            builder = builder.header(ACCEPT, "application/json");
        }

        if let Some(body) = &options.body {
            builder = if options.json {
                builder.json(body)
            } else {
                builder.body(body.to_string())
            };
        }

        debug!("{} {}", options.method, options.url);

        let response = builder
            .send()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(HttpError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        decode_body(&text, options.json)
    }
}

/// Decode a successful response body.
///
/// Non-JSON exchanges return the raw text as a JSON string; an empty JSON
/// body decodes to `null`.
fn decode_body(text: &str, json: bool) -> Result<JsonValue, HttpError> {
    if !json {
        return Ok(JsonValue::String(text.to_string()));
    }
    if text.trim().is_empty() {
        return Ok(JsonValue::Null);
    }
    serde_json::from_str(text).map_err(|e| HttpError::Decode(e.to_string()))
}
