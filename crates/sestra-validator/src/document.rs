//! Documents

use crate::names::is_blank;
use sestra_domain::{Document, ValidationError};

/// Validates a document before it is attached to a project
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentValidator;

impl DocumentValidator {
    /// Both `name` and `text` must be non-blank
    pub fn validate(&self, document: &Document) -> Vec<ValidationError> {
        let mut result = Vec::new();

        if is_blank(&document.name) {
            result.push(ValidationError::new("name", "should not be blank"));
        }

        if is_blank(&document.text) {
            result.push(ValidationError::new("text", "should not be blank"));
        }

        result
    }
}
