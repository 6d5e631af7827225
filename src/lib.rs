//! Buho Suite Vectors workflow node.
//!
//! A workflow node that sends, for every input item, one similarity search
//! request to a Buho Suite knowledge base and returns the response as the
//! item's output.
//!
//! - [`node`]: host-facing node framework (descriptions, execution context)
//! - [`http`]: the HTTP request capability and its `reqwest` implementation
//! - [`buho`]: the Buho Suite Vectors node
//! - [`config`]: TOML configuration for the CLI host

pub mod buho;
pub mod config;
pub mod error;
pub mod http;
pub mod node;

pub use buho::{
    description, BuhoVectors, FailurePolicy, SearchDispatcher, SearchParameters, NODE_DISPLAY_NAME,
    SEARCH_URL,
};
pub use config::{HttpConfig, LoggingConfig, NodeConfig, NodeSettings};
pub use error::{Error, Result};
pub use http::{HttpClient, HttpError, HttpMethod, HttpRequestOptions, ReqwestClient};
pub use node::{
    ExecutionContext, Node, NodeDescription, NodeError, NodeExecutionData, NodeHandle, NodeItem,
    ParameterSource, TrackedNode,
};
