//! Project schemas

use crate::names::{duplicates, is_blank};
use crate::LayerValidator;
use sestra_domain::{Layer, Project, ValidationError};
use std::collections::HashMap;

/// Validates a whole project schema
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectValidator;

impl ProjectValidator {
    /// Validate a project
    ///
    /// Checks run in a fixed order and are all evaluated: project name,
    /// layer presence, duplicate layer names, then every layer by index.
    pub fn validate(&self, project: &Project) -> Vec<ValidationError> {
        let mut result = Vec::new();

        if is_blank(&project.name) {
            result.push(ValidationError::new("name", "should not be blank"));
        }

        if project.layers.is_empty() {
            result.push(ValidationError::new("layers", "should not be empty"));
        }

        result.extend(
            duplicates(project.layers.iter().map(|layer| layer.name.as_str()))
                .into_iter()
                .map(|name| ValidationError::new("layers", format!("value '{}' is duplicated", name))),
        );

        let layers_by_name: HashMap<&str, &Layer> = project
            .layers
            .iter()
            .map(|layer| (layer.name.as_str(), layer))
            .collect();

        let layer_validator = LayerValidator::default();
        for (idx, layer) in project.layers.iter().enumerate() {
            let prefix = format!("layers[{}]", idx);
            result.extend(
                layer_validator
                    .validate(layer, &layers_by_name)
                    .into_iter()
                    .map(|error| error.prefixed(&prefix)),
            );
        }

        result
    }
}
