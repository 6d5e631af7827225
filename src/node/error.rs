//! Node error types

use std::error::Error;
use std::fmt;

/// Node-specific error type
#[derive(Debug, Clone, PartialEq)]
pub enum NodeError {
    /// Execution of the node was aborted by an item failure.
    /// Carries the node identity and the original failure message.
    Operation {
        node: String,
        item_index: usize,
        message: String,
    },
    /// Parameter is neither supplied nor declared by the node
    UnknownParameter { name: String },
    /// Parameter value cannot be coerced to its declared type
    InvalidParameter { name: String, reason: String },
    /// Item index outside of the input batch
    ItemOutOfRange { index: usize, len: usize },
}

impl NodeError {
    /// Wrap a failure message so it is reported against the given node.
    pub fn operation(
        node: impl Into<String>,
        item_index: usize,
        message: impl Into<String>,
    ) -> Self {
        NodeError::Operation {
            node: node.into(),
            item_index,
            message: message.into(),
        }
    }

    /// The original failure message, without node attribution.
    pub fn message(&self) -> String {
        match self {
            NodeError::Operation { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeError::Operation {
                node,
                item_index,
                message,
            } => {
                write!(f, "Node '{}' failed on item {}: {}", node, item_index, message)
            }
            NodeError::UnknownParameter { name } => {
                write!(f, "Could not get parameter '{}'", name)
            }
            NodeError::InvalidParameter { name, reason } => {
                write!(f, "Invalid value for parameter '{}': {}", name, reason)
            }
            NodeError::ItemOutOfRange { index, len } => {
                write!(f, "Item index {} out of range for {} input items", index, len)
            }
        }
    }
}

impl Error for NodeError {}

/// Result type for node operations
pub type NodeResult<T> = Result<T, NodeError>;
