//! Crate-wide error type.

use thiserror::Error;

use crate::http::HttpError;
use crate::node::NodeError;

/// Errors surfaced by configuration, the CLI host and node execution.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error(transparent)]
    Node(#[from] NodeError),
}

/// Result alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;
