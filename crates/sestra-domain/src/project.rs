//! Project schema: layers, layer types and attributes
//!
//! A project is a named, ordered set of layers. Order is significant: it is
//! the declaration order and is restored exactly when a project is read back.

use serde::{Deserialize, Serialize};

/// An annotation project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique, non-blank project name
    pub name: String,

    /// Layers in declaration order
    pub layers: Vec<Layer>,
}

impl Project {
    /// Create a new project
    pub fn new(name: impl Into<String>, layers: Vec<Layer>) -> Self {
        Self {
            name: name.into(),
            layers,
        }
    }

    /// Find a layer by name
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.name == name)
    }
}

/// A named category of annotations within a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Layer name, unique within the project
    pub name: String,

    /// Span or relation
    #[serde(rename = "type")]
    pub layer_type: LayerType,

    /// Attributes every annotation in this layer must fill in
    pub attrs: Vec<Attribute>,
}

impl Layer {
    /// Create a span layer
    pub fn span(name: impl Into<String>, attrs: Vec<Attribute>) -> Self {
        Self {
            name: name.into(),
            layer_type: LayerType::Span,
            attrs,
        }
    }

    /// Create a relation layer with the given roles
    pub fn relation(
        name: impl Into<String>,
        span_roles: Vec<RelationLayerSpanRole>,
        attrs: Vec<Attribute>,
    ) -> Self {
        Self {
            name: name.into(),
            layer_type: LayerType::Relation { span_roles },
            attrs,
        }
    }
}

/// Kind of a layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum LayerType {
    /// Annotations are `[start, end)` ranges over the document text
    Span,

    /// Annotations link existing annotations through named roles
    Relation {
        /// Roles in declaration order
        #[serde(rename = "spanRoles")]
        span_roles: Vec<RelationLayerSpanRole>,
    },
}

impl LayerType {
    /// Storage tag of this layer type
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerType::Span => "span",
            LayerType::Relation { .. } => "relation",
        }
    }

    /// Whether this is a span layer
    pub fn is_span(&self) -> bool {
        matches!(self, LayerType::Span)
    }
}

/// A role declared on a relation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationLayerSpanRole {
    /// Role name, unique within the layer
    pub name: String,

    /// Name of the span layer the role points at
    pub target_layer_name: String,
}

impl RelationLayerSpanRole {
    /// Create a new role
    pub fn new(name: impl Into<String>, target_layer_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target_layer_name: target_layer_name.into(),
        }
    }
}

/// A typed field declared on a layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name, unique within the layer
    pub name: String,

    /// Value type every annotation must supply
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
}

impl Attribute {
    /// Create a new attribute
    pub fn new(name: impl Into<String>, attr_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attr_type,
        }
    }
}

/// Value type of an attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum AttributeType {
    /// `true` / `false`
    Boolean,
    /// Signed integer
    Int,
    /// Floating point number
    Float,
    /// Free text
    String,
    /// One of a fixed list of constants
    Enum {
        /// Allowed constants in declaration order
        values: Vec<String>,
    },
}

impl AttributeType {
    /// Storage tag of this attribute type
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::Boolean => "boolean",
            AttributeType::Int => "int",
            AttributeType::Float => "float",
            AttributeType::String => "string",
            AttributeType::Enum { .. } => "enum",
        }
    }

    /// Build an enum type from its constants
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AttributeType::Enum {
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_layer_type_json_shape() {
        let layer = Layer::relation(
            "layer2",
            vec![
                RelationLayerSpanRole::new("role1", "layer1"),
                RelationLayerSpanRole::new("role2", "layer1"),
            ],
            vec![],
        );

        let value = serde_json::to_value(&layer).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "layer2",
                "type": {
                    "name": "relation",
                    "spanRoles": [
                        {"name": "role1", "targetLayerName": "layer1"},
                        {"name": "role2", "targetLayerName": "layer1"}
                    ]
                },
                "attrs": []
            })
        );
    }

    #[test]
    fn test_attribute_type_json_shape() {
        let attr = Attribute::new("kind", AttributeType::enumeration(["a", "b"]));
        let value = serde_json::to_value(&attr).unwrap();
        assert_eq!(
            value,
            json!({"name": "kind", "type": {"name": "enum", "values": ["a", "b"]}})
        );

        let parsed: Attribute =
            serde_json::from_value(json!({"name": "flag", "type": {"name": "boolean"}})).unwrap();
        assert_eq!(parsed.attr_type, AttributeType::Boolean);
    }

    #[test]
    fn test_unknown_layer_type_is_rejected_at_decode() {
        let result: Result<LayerType, _> = serde_json::from_value(json!({"name": "tree"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_project_layer_lookup() {
        let project = Project::new("p", vec![Layer::span("layer1", vec![])]);
        assert!(project.layer("layer1").is_some());
        assert!(project.layer("missing").is_none());
    }
}
