//! Description builder for easy node construction

use super::{NodeDefaults, NodeDescription, NodeIcon, NodeProperty};

/// Builder for creating node descriptions
pub struct NodeDescriptionBuilder {
    description: NodeDescription,
}

impl NodeDescriptionBuilder {
    /// Create a new builder. The name doubles as display name and default
    /// instance name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            description: NodeDescription {
                display_name: name.clone(),
                defaults: NodeDefaults { name: name.clone() },
                name,
                ..Default::default()
            },
        }
    }

    /// Set icon references for light and dark themes
    pub fn icon(mut self, light: impl Into<String>, dark: impl Into<String>) -> Self {
        self.description.icon = Some(NodeIcon {
            light: light.into(),
            dark: dark.into(),
        });
        self
    }

    /// Add a group
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.description.group.push(group.into());
        self
    }

    /// Set version
    pub fn version(mut self, version: u32) -> Self {
        self.description.version = version;
        self
    }

    /// Allow agents to call the node as a tool
    pub fn usable_as_tool(mut self, usable: bool) -> Self {
        self.description.usable_as_tool = usable;
        self
    }

    /// Add a property
    pub fn property(mut self, property: NodeProperty) -> Self {
        self.description.properties.push(property);
        self
    }

    /// Add multiple properties
    pub fn properties(mut self, properties: impl IntoIterator<Item = NodeProperty>) -> Self {
        self.description.properties.extend(properties);
        self
    }

    /// Build the description
    pub fn build(self) -> NodeDescription {
        self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{ConnectionType, PropertyType};

    #[test]
    fn test_builder_defaults() {
        let desc = NodeDescriptionBuilder::new("Example").build();
        assert_eq!(desc.name, "Example");
        assert_eq!(desc.display_name, "Example");
        assert_eq!(desc.defaults.name, "Example");
        assert_eq!(desc.version, 1);
        assert_eq!(desc.inputs, vec![ConnectionType::Main]);
        assert_eq!(desc.outputs, vec![ConnectionType::Main]);
        assert!(!desc.usable_as_tool);
        assert!(desc.icon.is_none());
        assert!(desc.description.is_empty());
    }

    #[test]
    fn test_builder_keeps_both_icons() {
        let desc = NodeDescriptionBuilder::new("Example")
            .icon("file:light.svg", "file:dark.svg")
            .build();
        assert_eq!(
            desc.icon,
            Some(NodeIcon {
                light: "file:light.svg".to_string(),
                dark: "file:dark.svg".to_string(),
            })
        );
    }

    #[test]
    fn test_builder_keeps_property_order() {
        let desc = NodeDescriptionBuilder::new("Example")
            .property(NodeProperty::new("A", "a", PropertyType::String, ""))
            .properties([
                NodeProperty::new("B", "b", PropertyType::Number, 1),
                NodeProperty::new("C", "c", PropertyType::Boolean, false),
            ])
            .build();

        let names: Vec<_> = desc.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(desc.property("b").map(|p| p.kind), Some(PropertyType::Number));
        assert!(desc.property("missing").is_none());
    }
}
