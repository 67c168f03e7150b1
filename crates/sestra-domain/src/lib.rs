//! Sestra Domain Layer
//!
//! This crate contains the value model shared by every other Sestra crate.
//! It defines annotation projects, their layers and attributes, documents,
//! annotations, the field-addressed validation error shape, the closed
//! result variants returned by every operation, and the trait interfaces
//! through which the service layer reaches storage.
//!
//! ## Key Concepts
//!
//! - **Project**: a named, ordered set of layers
//! - **Layer**: a span layer or a relation layer whose roles point at span layers
//! - **Attribute**: a typed field declared on a layer
//! - **Document**: raw text attached to a project
//! - **Annotation**: a span or relation inside one (document, layer) pair,
//!   owned by the user who created it
//!
//! ## Architecture
//!
//! - Pure data only, no storage access
//! - Tagged unions are plain enums; unknown tags can only appear at the
//!   persistence boundary, never in memory
//! - Cross-annotation references are held by [`AnnotationId`], never by
//!   in-memory pointers

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod annotation;
pub mod document;
pub mod ids;
pub mod project;
pub mod results;
pub mod traits;
pub mod validation;

// Re-exports for convenience
pub use annotation::{
    Annotation, AnnotationAttribute, AnnotationContainer, AnnotationValue, AttributeValue,
    RelationAnnotationSpanRole,
};
pub use document::{Document, DocumentContainer};
pub use ids::{AnnotationId, AnnotationKey, DocumentId, LayerId, ProjectId};
pub use project::{Attribute, AttributeType, Layer, LayerType, Project, RelationLayerSpanRole};
pub use results::{
    CreateAnnotationResult, CreateDocumentResult, CreateProjectResult, DeleteAnnotationResult,
};
pub use validation::ValidationError;
