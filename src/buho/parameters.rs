//! Search parameters read per input item.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use super::SEARCH_URL;
use crate::http::{HttpMethod, HttpRequestOptions};
use crate::node::{NodeError, NodeProperty, NodeResult, ParameterSource, PropertyType};

/// Number of chunks requested when `top_k` is not supplied.
pub const DEFAULT_TOP_K: i64 = 5;

/// The four values describing one similarity search.
///
/// `account_id` and `kb_id` are marked required in the form but are not
/// checked here; the remote service validates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParameters {
    /// Account owning the knowledge base
    pub account_id: String,
    /// Knowledge base to search
    pub kb_id: String,
    /// Free-text query
    pub query_text: String,
    /// Number of most relevant chunks to return
    pub top_k: i64,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            account_id: String::new(),
            kb_id: String::new(),
            query_text: String::new(),
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl SearchParameters {
    /// Form fields, in display order
    pub fn properties() -> Vec<NodeProperty> {
        vec![
            NodeProperty::new("Account ID", "account_id", PropertyType::String, "")
                .required()
                .with_description("Identifier of the account that owns the knowledge base"),
            NodeProperty::new("Knowledge Base ID (KB ID)", "kb_id", PropertyType::String, "")
                .required()
                .with_description("Identifier of the knowledge base"),
            NodeProperty::new("Query Text", "query_text", PropertyType::String, "")
                .with_placeholder("Text to search for in the knowledge base")
                .with_description("Text or question to search for within the knowledge base"),
            NodeProperty::new("Top K", "top_k", PropertyType::Number, DEFAULT_TOP_K)
                .with_description("Number of most relevant chunks to retrieve"),
        ]
    }

    /// Read the parameters of item `item_index`
    pub fn read(source: &dyn ParameterSource, item_index: usize) -> NodeResult<Self> {
        Ok(Self {
            account_id: read_string(source, "account_id", item_index)?,
            kb_id: read_string(source, "kb_id", item_index)?,
            query_text: read_string(source, "query_text", item_index)?,
            top_k: read_integer(source, "top_k", item_index)?,
        })
    }

    /// JSON request body. Fields serialize in a fixed order, so equal
    /// parameters always produce identical bytes.
    pub fn to_body(&self) -> JsonValue {
        json!({
            "account_id": self.account_id,
            "kb_id": self.kb_id,
            "query_text": self.query_text,
            "top_k": self.top_k,
        })
    }

    /// The outbound request for these parameters
    pub fn to_request(&self) -> HttpRequestOptions {
        HttpRequestOptions::new(HttpMethod::Post, SEARCH_URL).with_json_body(self.to_body())
    }
}

fn read_string(source: &dyn ParameterSource, name: &str, item_index: usize) -> NodeResult<String> {
    match source.get_node_parameter(name, item_index)? {
        JsonValue::String(s) => Ok(s),
        other => Err(NodeError::InvalidParameter {
            name: name.to_string(),
            reason: format!("expected a string, got {}", other),
        }),
    }
}

fn read_integer(source: &dyn ParameterSource, name: &str, item_index: usize) -> NodeResult<i64> {
    let value = source.get_node_parameter(name, item_index)?;
    value.as_i64().ok_or_else(|| NodeError::InvalidParameter {
        name: name.to_string(),
        reason: format!("expected an integer, got {}", value),
    })
}
