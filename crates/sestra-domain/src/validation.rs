//! Field-addressed validation errors
//!
//! Field paths use dotted/bracketed addressing (`layers[1].attrs[0].name`)
//! and are part of the external contract: clients key their error displays
//! off them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single validation failure
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationError {
    /// Path of the offending field
    pub field: String,

    /// Human-readable description
    pub description: String,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(field: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            description: description.into(),
        }
    }

    /// Re-address this error under `prefix`
    ///
    /// # Examples
    ///
    /// ```
    /// use sestra_domain::ValidationError;
    ///
    /// let error = ValidationError::new("name", "should not be blank").prefixed("layers[0]");
    /// assert_eq!(error.field, "layers[0].name");
    /// ```
    pub fn prefixed(self, prefix: &str) -> Self {
        Self {
            field: format!("{}.{}", prefix, self.field),
            description: self.description,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.description)
    }
}
