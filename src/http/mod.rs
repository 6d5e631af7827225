//! HTTP request capability.
//!
//! Nodes never talk to the network directly: they describe a request with
//! [`HttpRequestOptions`] and hand it to an [`HttpClient`]. Transport
//! concerns (TLS, pooling, timeouts) live behind that trait.

mod client;

pub use client::ReqwestClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use thiserror::Error;

/// HTTP request method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Description of a single outbound request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpRequestOptions {
    pub method: HttpMethod,
    pub url: String,
    /// Request body, if any
    pub body: Option<JsonValue>,
    /// Send the body as JSON and decode the response as JSON
    pub json: bool,
    /// Extra request headers
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl HttpRequestOptions {
    /// Create options without a body
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            json: false,
            headers: BTreeMap::new(),
        }
    }

    /// Set a JSON body; also switches the exchange to JSON in both directions
    pub fn with_json_body(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self.json = true;
        self
    }

    /// Add a header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Failure of an HTTP exchange
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HttpError {
    /// Connection, TLS or timeout failure
    #[error("Request failed: {0}")]
    Transport(String),

    /// Remote answered with a non-success status
    #[error("Request failed with status code {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body is not valid JSON
    #[error("Invalid JSON in response body: {0}")]
    Decode(String),

    /// Options cannot be turned into a request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// The HTTP request executor
///
/// Returns the decoded response body, or fails. Implementations own any
/// timeout or retry behaviour.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn request(&self, options: HttpRequestOptions) -> Result<JsonValue, HttpError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_body_sets_json_flag() {
        let options = HttpRequestOptions::new(HttpMethod::Post, "https://example.com")
            .with_json_body(json!({"a": 1}));
        assert!(options.json);
        assert_eq!(options.body, Some(json!({"a": 1})));
    }

    #[test]
    fn test_method_serializes_uppercase() {
        assert_eq!(serde_json::to_value(HttpMethod::Post).unwrap(), json!("POST"));
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_status_error_message() {
        let err = HttpError::Status {
            status: 404,
            body: "not found".to_string(),
        };
        assert_eq!(err.to_string(), "Request failed with status code 404: not found");
    }
}
