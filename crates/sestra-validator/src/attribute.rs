//! Attribute declarations

use crate::names::{duplicates, is_blank};
use sestra_domain::{Attribute, AttributeType, ValidationError};

/// Validates a single attribute declaration
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeValidator;

impl AttributeValidator {
    /// Validate an attribute; field paths are relative to the attribute
    pub fn validate(&self, attr: &Attribute) -> Vec<ValidationError> {
        let mut result = Vec::new();

        if is_blank(&attr.name) {
            result.push(ValidationError::new("name", "should not be blank"));
        }

        if let AttributeType::Enum { values } = &attr.attr_type {
            if values.len() < 2 {
                result.push(ValidationError::new("type.values", "should have at least 2"));
            }

            for (idx, value) in values.iter().enumerate() {
                if is_blank(value) {
                    result.push(ValidationError::new(
                        format!("type.values[{}]", idx),
                        "should not be blank",
                    ));
                }
            }

            result.extend(
                duplicates(values.iter().map(String::as_str)).into_iter().map(|value| {
                    ValidationError::new("type.values", format!("value '{}' is duplicated", value))
                }),
            );
        }

        result
    }
}
