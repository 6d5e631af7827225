//! Node execution trait and types
//!
//! A host drives a node by handing it an [`ExecutionContext`]: the ordered
//! input items, the node-level configured parameters and the
//! failure-tolerance flag.

use super::error::{NodeError, NodeResult};
use super::types::{
    NodeDescription, NodeExecutionData, NodeHandle, NodeItem, NodeProperty, PropertyType,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Per-item parameter accessor
pub trait ParameterSource: Send + Sync {
    /// Resolve parameter `name` for the item at `item_index`, coerced to the
    /// parameter's declared type.
    fn get_node_parameter(&self, name: &str, item_index: usize) -> NodeResult<JsonValue>;
}

/// Context passed to node execution
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Node instance being executed
    pub node: NodeHandle,
    /// Execution ID for tracing
    pub execution_id: String,
    items: Vec<NodeItem>,
    parameters: HashMap<String, JsonValue>,
    properties: Vec<NodeProperty>,
    continue_on_fail: bool,
}

impl ExecutionContext {
    /// Create a context for a node described by `description`
    pub fn new(description: &NodeDescription, items: Vec<NodeItem>) -> Self {
        Self {
            node: NodeHandle::for_description(description),
            execution_id: uuid::Uuid::new_v4().to_string(),
            items,
            parameters: HashMap::new(),
            properties: description.properties.clone(),
            continue_on_fail: false,
        }
    }

    /// Set the node instance handle
    pub fn with_node(mut self, node: NodeHandle) -> Self {
        self.node = node;
        self
    }

    /// Set a node-level parameter, used for every item that does not
    /// supply its own value
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Enable or disable failure tolerance
    pub fn with_continue_on_fail(mut self, continue_on_fail: bool) -> Self {
        self.continue_on_fail = continue_on_fail;
        self
    }

    /// Input items, in order
    pub fn input_data(&self) -> &[NodeItem] {
        &self.items
    }

    /// Whether item failures become output records instead of aborting
    pub fn continue_on_fail(&self) -> bool {
        self.continue_on_fail
    }

    fn raw_parameter(&self, name: &str, item: &NodeItem) -> Option<JsonValue> {
        item.json
            .get(name)
            .or_else(|| self.parameters.get(name))
            .cloned()
    }
}

impl ParameterSource for ExecutionContext {
    fn get_node_parameter(&self, name: &str, item_index: usize) -> NodeResult<JsonValue> {
        let item = self.items.get(item_index).ok_or(NodeError::ItemOutOfRange {
            index: item_index,
            len: self.items.len(),
        })?;

        let property = self.properties.iter().find(|p| p.name == name);
        let raw = self.raw_parameter(name, item);

        match (property, raw) {
            (Some(prop), Some(value)) => coerce_value(prop, value),
            (Some(prop), None) => Ok(prop.default.clone()),
            (None, Some(value)) => Ok(value),
            (None, None) => Err(NodeError::UnknownParameter {
                name: name.to_string(),
            }),
        }
    }
}

/// Coerce a raw value to the property's declared type.
///
/// `null` resolves to the declared default.
pub fn coerce_value(property: &NodeProperty, value: JsonValue) -> NodeResult<JsonValue> {
    if value.is_null() {
        return Ok(property.default.clone());
    }

    let invalid = |reason: &str| NodeError::InvalidParameter {
        name: property.name.clone(),
        reason: reason.to_string(),
    };

    match property.kind {
        PropertyType::String => match value {
            JsonValue::String(_) => Ok(value),
            JsonValue::Number(n) => Ok(JsonValue::String(n.to_string())),
            JsonValue::Bool(b) => Ok(JsonValue::String(b.to_string())),
            _ => Err(invalid("expected a string")),
        },
        PropertyType::Number => match value {
            JsonValue::Number(ref n) if n.is_i64() || n.is_u64() => Ok(value),
            JsonValue::Number(ref n) => match n.as_f64() {
                Some(f) if f.is_finite() && f.fract() == 0.0 => {
                    // i64::MAX as f64 rounds up to 2^63, which is already out of range
                    if f >= i64::MIN as f64 && f < i64::MAX as f64 {
                        Ok(JsonValue::from(f as i64))
                    } else {
                        Err(invalid("expected an integer in range"))
                    }
                }
                _ => Ok(value),
            },
            JsonValue::String(s) => {
                let trimmed = s.trim();
                if let Ok(i) = trimmed.parse::<i64>() {
                    Ok(JsonValue::from(i))
                } else if let Ok(f) = trimmed.parse::<f64>() {
                    serde_json::Number::from_f64(f)
                        .map(JsonValue::Number)
                        .ok_or_else(|| invalid("expected a finite number"))
                } else {
                    Err(invalid(&format!("'{}' is not a number", s)))
                }
            }
            _ => Err(invalid("expected a number")),
        },
        PropertyType::Boolean => match value {
            JsonValue::Bool(_) => Ok(value),
            JsonValue::String(s) => match s.trim() {
                "true" => Ok(JsonValue::Bool(true)),
                "false" => Ok(JsonValue::Bool(false)),
                _ => Err(invalid(&format!("'{}' is not a boolean", s))),
            },
            _ => Err(invalid("expected a boolean")),
        },
        PropertyType::Json => Ok(value),
    }
}

/// The Node trait
///
/// Nodes receive an ordered batch of items and return one output record
/// per item, in the same order.
#[async_trait]
pub trait Node: Send + Sync {
    /// Get node description
    fn description(&self) -> &NodeDescription;

    /// Execute the node over every input item of `ctx`
    ///
    /// # Returns
    /// Output records, or an error aborting the whole batch
    async fn execute(&self, ctx: &ExecutionContext) -> NodeResult<Vec<NodeExecutionData>>;
}

/// Wrapper for node with usage statistics
pub struct TrackedNode {
    inner: Arc<dyn Node>,
    execution_count: RwLock<u64>,
    items_processed: RwLock<u64>,
    total_duration_ms: RwLock<u64>,
    abort_count: RwLock<u64>,
}

impl TrackedNode {
    /// Create a new tracked node
    pub fn new(node: Arc<dyn Node>) -> Self {
        Self {
            inner: node,
            execution_count: RwLock::new(0),
            items_processed: RwLock::new(0),
            total_duration_ms: RwLock::new(0),
            abort_count: RwLock::new(0),
        }
    }

    /// Get the underlying node
    pub fn inner(&self) -> &Arc<dyn Node> {
        &self.inner
    }

    /// Execute with tracking
    pub async fn execute_tracked(
        &self,
        ctx: &ExecutionContext,
    ) -> NodeResult<Vec<NodeExecutionData>> {
        let start = std::time::Instant::now();
        let result = self.inner.execute(ctx).await;
        let duration = start.elapsed().as_millis() as u64;

        {
            let mut count = self.execution_count.write().await;
            *count += 1;
        }
        {
            let mut total = self.total_duration_ms.write().await;
            *total += duration;
        }

        match &result {
            Ok(output) => {
                let mut items = self.items_processed.write().await;
                *items += output.len() as u64;
            }
            Err(_) => {
                let mut aborts = self.abort_count.write().await;
                *aborts += 1;
            }
        }

        result
    }

    /// Get execution statistics
    pub async fn stats(&self) -> NodeStats {
        let execution_count = *self.execution_count.read().await;
        let items_processed = *self.items_processed.read().await;
        let total_duration_ms = *self.total_duration_ms.read().await;
        let abort_count = *self.abort_count.read().await;

        NodeStats {
            execution_count,
            items_processed,
            average_duration_ms: if execution_count > 0 {
                total_duration_ms / execution_count
            } else {
                0
            },
            abort_count,
        }
    }
}

/// Node execution statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStats {
    /// Total number of executions
    pub execution_count: u64,
    /// Output records produced by completed executions
    pub items_processed: u64,
    /// Average execution duration in milliseconds
    pub average_duration_ms: u64,
    /// Executions aborted by an item failure
    pub abort_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeDescriptionBuilder;
    use serde_json::json;

    fn description() -> NodeDescription {
        NodeDescriptionBuilder::new("Test Node")
            .property(NodeProperty::new("Name", "name", PropertyType::String, ""))
            .property(NodeProperty::new("Limit", "limit", PropertyType::Number, 5))
            .property(NodeProperty::new("Flag", "flag", PropertyType::Boolean, false))
            .build()
    }

    fn items(values: Vec<JsonValue>) -> Vec<NodeItem> {
        values.into_iter().map(NodeItem::new).collect()
    }

    #[test]
    fn test_item_value_wins_over_node_parameter() {
        let ctx = ExecutionContext::new(
            &description(),
            items(vec![json!({"name": "item"}), json!({})]),
        )
        .with_parameter("name", "node");

        assert_eq!(ctx.get_node_parameter("name", 0).unwrap(), json!("item"));
        assert_eq!(ctx.get_node_parameter("name", 1).unwrap(), json!("node"));
    }

    #[test]
    fn test_missing_parameter_uses_declared_default() {
        let ctx = ExecutionContext::new(&description(), items(vec![json!({})]));
        assert_eq!(ctx.get_node_parameter("limit", 0).unwrap(), json!(5));
        assert_eq!(ctx.get_node_parameter("name", 0).unwrap(), json!(""));
    }

    #[test]
    fn test_null_parameter_uses_declared_default() {
        let ctx = ExecutionContext::new(&description(), items(vec![json!({"limit": null})]));
        assert_eq!(ctx.get_node_parameter("limit", 0).unwrap(), json!(5));
    }

    #[test]
    fn test_unknown_parameter_is_an_error() {
        let ctx = ExecutionContext::new(&description(), items(vec![json!({})]));
        let err = ctx.get_node_parameter("nope", 0).unwrap_err();
        assert_eq!(err, NodeError::UnknownParameter { name: "nope".to_string() });
    }

    #[test]
    fn test_undeclared_parameter_passes_through() {
        let ctx = ExecutionContext::new(&description(), items(vec![json!({"extra": [1, 2]})]));
        assert_eq!(ctx.get_node_parameter("extra", 0).unwrap(), json!([1, 2]));
    }

    #[test]
    fn test_out_of_range_index() {
        let ctx = ExecutionContext::new(&description(), Vec::new());
        let err = ctx.get_node_parameter("name", 0).unwrap_err();
        assert_eq!(err, NodeError::ItemOutOfRange { index: 0, len: 0 });
    }

    #[test]
    fn test_number_coercion() {
        let ctx = ExecutionContext::new(
            &description(),
            items(vec![
                json!({"limit": "7"}),
                json!({"limit": 3.0}),
                json!({"limit": "many"}),
                json!({"limit": {"n": 1}}),
            ]),
        );

        assert_eq!(ctx.get_node_parameter("limit", 0).unwrap(), json!(7));
        assert_eq!(ctx.get_node_parameter("limit", 1).unwrap(), json!(3));
        assert!(matches!(
            ctx.get_node_parameter("limit", 2),
            Err(NodeError::InvalidParameter { .. })
        ));
        assert!(matches!(
            ctx.get_node_parameter("limit", 3),
            Err(NodeError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_whole_float_outside_i64_range_is_rejected() {
        let ctx = ExecutionContext::new(
            &description(),
            items(vec![json!({"limit": 1e20}), json!({"limit": -1e20}), json!({"limit": 1e15})]),
        );

        let err = ctx.get_node_parameter("limit", 0).unwrap_err();
        assert_eq!(
            err,
            NodeError::InvalidParameter {
                name: "limit".to_string(),
                reason: "expected an integer in range".to_string(),
            }
        );
        assert!(ctx.get_node_parameter("limit", 1).is_err());
        assert_eq!(
            ctx.get_node_parameter("limit", 2).unwrap(),
            json!(1_000_000_000_000_000i64)
        );
    }

    #[test]
    fn test_string_coercion() {
        let ctx = ExecutionContext::new(
            &description(),
            items(vec![json!({"name": 42}), json!({"name": true}), json!({"name": ["x"]})]),
        );

        assert_eq!(ctx.get_node_parameter("name", 0).unwrap(), json!("42"));
        assert_eq!(ctx.get_node_parameter("name", 1).unwrap(), json!("true"));
        assert!(ctx.get_node_parameter("name", 2).is_err());
    }

    #[test]
    fn test_boolean_coercion() {
        let ctx = ExecutionContext::new(&description(), items(vec![json!({"flag": "true"})]));
        assert_eq!(ctx.get_node_parameter("flag", 0).unwrap(), json!(true));
    }

    struct EchoNode {
        description: NodeDescription,
        fail: bool,
    }

    #[async_trait]
    impl Node for EchoNode {
        fn description(&self) -> &NodeDescription {
            &self.description
        }

        async fn execute(&self, ctx: &ExecutionContext) -> NodeResult<Vec<NodeExecutionData>> {
            if self.fail {
                return Err(NodeError::operation(&ctx.node.name, 0, "failed"));
            }
            Ok(ctx.input_data().to_vec())
        }
    }

    #[tokio::test]
    async fn test_tracked_node_stats() {
        let ok = TrackedNode::new(Arc::new(EchoNode {
            description: description(),
            fail: false,
        }));
        let ctx = ExecutionContext::new(&description(), items(vec![json!({}), json!({})]));

        ok.execute_tracked(&ctx).await.unwrap();
        ok.execute_tracked(&ctx).await.unwrap();

        let stats = ok.stats().await;
        assert_eq!(stats.execution_count, 2);
        assert_eq!(stats.items_processed, 4);
        assert_eq!(stats.abort_count, 0);

        let failing = TrackedNode::new(Arc::new(EchoNode {
            description: description(),
            fail: true,
        }));
        assert!(failing.execute_tracked(&ctx).await.is_err());

        let stats = failing.stats().await;
        assert_eq!(stats.execution_count, 1);
        assert_eq!(stats.items_processed, 0);
        assert_eq!(stats.abort_count, 1);
    }
}
