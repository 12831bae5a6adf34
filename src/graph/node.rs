//! Node implementation for the explorer's graph model

use super::property::{PropertyMap, PropertyValue};
use super::types::{NodeId, NodeType};
use serde::{Deserialize, Serialize};

/// Property keys consulted, in order, when a node arrives without a label
const LABEL_FALLBACK_KEYS: [&str; 2] = ["name", "title"];

/// A node in the explored graph
///
/// Identity is the `id`. The remaining fields are mutable and follow the
/// server: a later fetch overwrites them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node
    pub id: NodeId,

    /// Category tag
    #[serde(rename = "type", default)]
    pub node_type: NodeType,

    /// Display name as sent by the service (may be empty)
    #[serde(default)]
    pub label: String,

    /// Properties associated with this node
    #[serde(default)]
    pub properties: PropertyMap,
}

impl Node {
    /// Create a new node with a type and label
    pub fn new(id: impl Into<NodeId>, node_type: impl Into<NodeType>, label: impl Into<String>) -> Self {
        Node {
            id: id.into(),
            node_type: node_type.into(),
            label: label.into(),
            properties: PropertyMap::new(),
        }
    }

    /// Builder-style property setter
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Label to show in the view: the explicit label, else a `name` or
    /// `title` property, else the id.
    pub fn display_label(&self) -> &str {
        if !self.label.trim().is_empty() {
            return &self.label;
        }
        LABEL_FALLBACK_KEYS
            .iter()
            .filter_map(|key| self.get_property(key).and_then(PropertyValue::as_string))
            .find(|value| !value.trim().is_empty())
            .unwrap_or_else(|| self.id.as_str())
    }

    /// Get number of properties
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }
}
