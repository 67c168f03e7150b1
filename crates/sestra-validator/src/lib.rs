//! Sestra Validators
//!
//! Structural checks over the schema and annotation value model.
//!
//! Every validator is stateless and returns the full list of
//! [`ValidationError`]s it found; an empty list means valid. Checks are never
//! short-circuited across categories, so a caller sees every problem at once.
//! Field paths are built by prefixing nested errors (`layers[i].`,
//! `attrs[j].`, `type.spanRoles[k].`, `type.values[m]`).
//!
//! # Examples
//!
//! ```
//! use sestra_domain::{Layer, Project};
//! use sestra_validator::ProjectValidator;
//!
//! let project = Project::new("", vec![Layer::span("layer1", vec![])]);
//! let errors = ProjectValidator.validate(&project);
//!
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors[0].field, "name");
//! ```
//!
//! [`ValidationError`]: sestra_domain::ValidationError

#![warn(missing_docs)]

mod annotation;
mod attribute;
mod document;
mod layer;
mod names;
mod project;

pub use annotation::AnnotationValidator;
pub use attribute::AttributeValidator;
pub use document::DocumentValidator;
pub use layer::LayerValidator;
pub use project::ProjectValidator;
