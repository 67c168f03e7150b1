//! Closed outcome variants of every operation
//!
//! These are expected, enumerable outcomes and are returned as ordinary
//! values. Transport code maps each variant to a status code and body.

use crate::{AnnotationId, ValidationError};
use serde::Serialize;

/// Outcome of creating a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result")]
pub enum CreateProjectResult {
    /// The project was stored
    ProjectCreated,
    /// A project with this name already exists
    ProjectAlreadyExists,
    /// The project schema is malformed
    InvalidProject {
        /// Every structural problem found
        errors: Vec<ValidationError>,
    },
}

/// Outcome of creating a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result")]
pub enum CreateDocumentResult {
    /// The document was stored
    DocumentCreated,
    /// The project already has a document with this name
    DocumentAlreadyExists,
    /// No project with the given name
    ProjectNotFound,
    /// The document is malformed
    InvalidDocument {
        /// Every problem found
        errors: Vec<ValidationError>,
    },
}

/// Outcome of creating an annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result")]
pub enum CreateAnnotationResult {
    /// The annotation was stored
    AnnotationCreated,
    /// No project with the given name
    ProjectNotFound,
    /// No document with the given name in the project
    DocumentNotFound,
    /// No layer with the given name in the project
    LayerNotFound,
    /// An annotation with this id exists somewhere in the store
    AnnotationAlreadyExists,
    /// The annotation does not fit its layer or document
    InvalidAnnotation {
        /// Every problem found
        errors: Vec<ValidationError>,
    },
}

/// Outcome of deleting an annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result")]
pub enum DeleteAnnotationResult {
    /// The annotation was removed
    AnnotationDeleted,
    /// Other annotations still point at this one; nothing was removed
    AnnotationIsReferencedByOthers {
        /// Ids of the referencing annotations, each listed once
        ids: Vec<AnnotationId>,
    },
    /// No annotation with this id owned by the caller
    AnnotationNotFound,
}
