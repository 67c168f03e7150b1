//! Annotation value model
//!
//! An annotation lives in exactly one (document, layer) pair and is owned by
//! the user who created it. Relation annotations refer to other annotations
//! by [`AnnotationId`] only.

use crate::AnnotationId;
use serde::{Deserialize, Serialize};

/// A single annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Caller-supplied, globally unique id
    pub id: AnnotationId,

    /// Span or relation payload
    pub value: AnnotationValue,

    /// Attribute values in declaration order
    pub attrs: Vec<AnnotationAttribute>,
}

impl Annotation {
    /// Create a new annotation
    pub fn new(id: AnnotationId, value: AnnotationValue, attrs: Vec<AnnotationAttribute>) -> Self {
        Self { id, value, attrs }
    }
}

/// Payload of an annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnnotationValue {
    /// `[start, end)` character range over the document text
    Span {
        /// Inclusive start offset
        start: i64,
        /// Exclusive end offset
        end: i64,
    },

    /// Named links to other annotations
    Relation {
        /// Roles in declaration order
        #[serde(rename = "spanRoles")]
        span_roles: Vec<RelationAnnotationSpanRole>,
    },
}

impl AnnotationValue {
    /// Create a span value
    pub fn span(start: i64, end: i64) -> Self {
        AnnotationValue::Span { start, end }
    }

    /// Create a relation value
    pub fn relation(span_roles: Vec<RelationAnnotationSpanRole>) -> Self {
        AnnotationValue::Relation { span_roles }
    }

    /// Storage tag of this value
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationValue::Span { .. } => "span",
            AnnotationValue::Relation { .. } => "relation",
        }
    }
}

/// One role of a relation annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationAnnotationSpanRole {
    /// Role name as declared on the layer
    pub name: String,

    /// Annotation the role points at
    pub target_annotation_id: AnnotationId,
}

impl RelationAnnotationSpanRole {
    /// Create a new role link
    pub fn new(name: impl Into<String>, target_annotation_id: AnnotationId) -> Self {
        Self {
            name: name.into(),
            target_annotation_id,
        }
    }
}

/// A named attribute value on an annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationAttribute {
    /// Attribute name as declared on the layer
    pub name: String,

    /// The value
    pub value: AttributeValue,
}

impl AnnotationAttribute {
    /// Create a new attribute value
    pub fn new(name: impl Into<String>, value: AttributeValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Attribute value, mirroring [`crate::AttributeType`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AttributeValue {
    /// Boolean value
    Boolean {
        /// The value
        value: bool,
    },
    /// Integer value
    Int {
        /// The value
        value: i64,
    },
    /// Floating point value
    Float {
        /// The value
        value: f64,
    },
    /// Text value
    String {
        /// The value
        value: String,
    },
    /// Enum constant
    Enum {
        /// The constant
        value: String,
    },
}

impl AttributeValue {
    /// Storage tag of this value
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeValue::Boolean { .. } => "boolean",
            AttributeValue::Int { .. } => "int",
            AttributeValue::Float { .. } => "float",
            AttributeValue::String { .. } => "string",
            AttributeValue::Enum { .. } => "enum",
        }
    }
}

/// Addresses the (project, document, layer) an annotation operation targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationContainer {
    /// Project name
    pub project_name: String,

    /// Document name within the project
    pub document_name: String,

    /// Layer name within the project
    pub layer_name: String,
}

impl AnnotationContainer {
    /// Create a new container
    pub fn new(
        project_name: impl Into<String>,
        document_name: impl Into<String>,
        layer_name: impl Into<String>,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            document_name: document_name.into(),
            layer_name: layer_name.into(),
        }
    }
}
