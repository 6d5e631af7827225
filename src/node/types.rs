//! Core node types

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Declared type of a node property, used by hosts to render the form
/// and by parameter sources to coerce raw values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Number,
    Boolean,
    Json,
}

/// Connection kind for node inputs and outputs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    #[default]
    Main,
}

/// A single configurable field of a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeProperty {
    /// Label shown in the host form
    pub display_name: String,
    /// Parameter name used to read the value
    pub name: String,
    /// Declared value type
    #[serde(rename = "type")]
    pub kind: PropertyType,
    /// Value used when nothing is supplied
    pub default: JsonValue,
    /// Whether the host form marks the field as mandatory
    #[serde(default)]
    pub required: bool,
    /// Help text
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl NodeProperty {
    /// Create a property with an empty description
    pub fn new(
        display_name: impl Into<String>,
        name: impl Into<String>,
        kind: PropertyType,
        default: impl Into<JsonValue>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            name: name.into(),
            kind,
            default: default.into(),
            required: false,
            description: String::new(),
            placeholder: None,
        }
    }

    /// Mark as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set placeholder
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }
}

/// Icon references per UI theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeIcon {
    pub light: String,
    pub dark: String,
}

/// Default values applied to a freshly created node instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDefaults {
    pub name: String,
}

/// Node description (metadata)
///
/// Declarative data a host needs to list, render and instantiate the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescription {
    /// Human-readable name
    pub display_name: String,
    /// Unique node type name
    pub name: String,
    pub icon: Option<NodeIcon>,
    /// Groups for categorization (e.g., "transform")
    pub group: Vec<String>,
    /// Node type version
    pub version: u32,
    /// Human-readable description
    pub description: String,
    pub defaults: NodeDefaults,
    pub inputs: Vec<ConnectionType>,
    pub outputs: Vec<ConnectionType>,
    /// Whether agents may call the node as a tool
    pub usable_as_tool: bool,
    /// Configurable fields, in form order
    pub properties: Vec<NodeProperty>,
}

impl Default for NodeDescription {
    fn default() -> Self {
        Self {
            display_name: String::new(),
            name: String::new(),
            icon: None,
            group: Vec::new(),
            version: 1,
            description: String::new(),
            defaults: NodeDefaults::default(),
            inputs: vec![ConnectionType::Main],
            outputs: vec![ConnectionType::Main],
            usable_as_tool: false,
            properties: Vec::new(),
        }
    }
}

impl NodeDescription {
    /// Look up a declared property by parameter name
    pub fn property(&self, name: &str) -> Option<&NodeProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// One record flowing between nodes: `{ "json": ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeExecutionData {
    pub json: JsonValue,
}

impl NodeExecutionData {
    /// Wrap a JSON value
    pub fn new(json: impl Into<JsonValue>) -> Self {
        Self { json: json.into() }
    }

    /// Record describing a tolerated failure: `{ "json": { "error": message } }`
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            json: serde_json::json!({ "error": message.into() }),
        }
    }
}

/// Input items share the output record shape
pub type NodeItem = NodeExecutionData;

/// Identity of the node instance being executed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeHandle {
    /// Instance id
    pub id: String,
    /// Instance name as shown in the workflow
    pub name: String,
    /// Node type name
    pub type_name: String,
}

impl NodeHandle {
    /// Create a handle with a freshly generated id
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    /// Handle for an instance named after the description's defaults
    pub fn for_description(description: &NodeDescription) -> Self {
        Self::new(description.defaults.name.clone(), description.name.clone())
    }
}
