//! Sestra Service
//!
//! CRUD orchestration over annotation projects. Each operation sequences
//! existence lookups, validation, uniqueness checks and persistence, and
//! answers with one of the closed result enums of `sestra-domain`.
//!
//! # Architecture
//!
//! - [`ProjectsCrud`], [`DocumentsCrud`] and [`AnnotationsCrud`] are stateless
//!   and take the store as an argument
//! - [`Sestra`] owns a store and runs every operation in a transaction
//! - Fatal conditions (storage failures, corrupted rows, schema and store out
//!   of sync) are [`ServiceError`]s; everything else is a result variant
//!
//! # Ownership
//!
//! Projects and documents are shared. Annotations belong to the user who
//! created them: reads, relation targets and deletes only ever see the
//! caller's own annotations.

#![warn(missing_docs)]

mod annotations;
mod config;
mod documents;
mod error;
pub mod logging;
mod projects;
mod sestra;

pub use annotations::AnnotationsCrud;
pub use config::{ConfigError, SestraConfig};
pub use documents::DocumentsCrud;
pub use error::ServiceError;
pub use logging::LoggingConfig;
pub use projects::ProjectsCrud;
pub use sestra::Sestra;
