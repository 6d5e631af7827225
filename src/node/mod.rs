//! Node framework
//!
//! Host-facing building blocks shared by every node:
//! - Descriptions: declarative metadata a host renders as a form
//! - Execution: the context a host hands to a node, and the `Node` trait
//! - Errors: the failure taxonomy and the node-attributed abort wrapper

mod builder;
mod error;
mod execution;
mod types;

pub use builder::NodeDescriptionBuilder;
pub use error::{NodeError, NodeResult};
pub use execution::{
    coerce_value, ExecutionContext, Node, NodeStats, ParameterSource, TrackedNode,
};
pub use types::{
    ConnectionType, NodeDefaults, NodeDescription, NodeExecutionData, NodeHandle, NodeIcon,
    NodeItem, NodeProperty, PropertyType,
};
