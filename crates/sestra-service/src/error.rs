//! Service error types

use sestra_domain::traits::PersistenceError;
use sestra_domain::AnnotationId;
use thiserror::Error;

/// Fatal failures of an orchestration call
///
/// Expected outcomes (not found, already exists, invalid input) are never
/// errors; they are the result variants of each operation.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The store failed or holds data it cannot map back
    #[error("Store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A layer named by the validated schema has no stored counterpart
    #[error("Target layer '{layer}' is unknown in project '{project}'")]
    UnknownTargetLayer {
        /// Project being annotated
        project: String,
        /// Layer that could not be resolved
        layer: String,
    },

    /// A relation role is not declared on its layer
    #[error("Role '{role}' is not declared on layer '{layer}'")]
    UndeclaredRole {
        /// Relation layer
        layer: String,
        /// Role name found in the annotation
        role: String,
    },

    /// A role target passed validation but could not be resolved for storage
    #[error("Target {id} of role '{role}' could not be resolved")]
    MissingRoleTarget {
        /// Role whose target vanished
        role: String,
        /// Referenced annotation
        id: AnnotationId,
    },
}

impl ServiceError {
    /// Wrap a repository error
    pub fn store<E: PersistenceError>(err: E) -> Self {
        ServiceError::Store(Box::new(err))
    }
}
