//! Layer declarations

use crate::names::{duplicates, is_blank};
use crate::AttributeValidator;
use sestra_domain::{Layer, LayerType, RelationLayerSpanRole, ValidationError};
use std::collections::HashMap;

/// Validates a layer against the other layers of its project
#[derive(Debug, Clone, Copy, Default)]
pub struct LayerValidator {
    attrs: AttributeValidator,
}

impl LayerValidator {
    /// Validate a layer; field paths are relative to the layer
    ///
    /// `layers_by_name` resolves relation role targets. Role targets are not
    /// required to be acyclic; they only have to name an existing span layer.
    pub fn validate(
        &self,
        layer: &Layer,
        layers_by_name: &HashMap<&str, &Layer>,
    ) -> Vec<ValidationError> {
        let mut result = Vec::new();

        if is_blank(&layer.name) {
            result.push(ValidationError::new("name", "should not be blank"));
        }

        if let LayerType::Relation { span_roles } = &layer.layer_type {
            if span_roles.len() < 2 {
                result.push(ValidationError::new("type.spanRoles", "should have at least 2"));
            }

            for (idx, role) in span_roles.iter().enumerate() {
                let prefix = format!("type.spanRoles[{}]", idx);
                result.extend(self.validate_span_role(&prefix, role, layers_by_name));
            }

            result.extend(
                duplicates(span_roles.iter().map(|role| role.name.as_str()))
                    .into_iter()
                    .map(|name| {
                        ValidationError::new("type.spanRoles", format!("role '{}' is duplicated", name))
                    }),
            );
        }

        result.extend(
            duplicates(layer.attrs.iter().map(|attr| attr.name.as_str()))
                .into_iter()
                .map(|name| ValidationError::new("attrs", format!("name '{}' is duplicated", name))),
        );

        for (idx, attr) in layer.attrs.iter().enumerate() {
            let prefix = format!("attrs[{}]", idx);
            result.extend(
                self.attrs
                    .validate(attr)
                    .into_iter()
                    .map(|error| error.prefixed(&prefix)),
            );
        }

        result
    }

    fn validate_span_role(
        &self,
        prefix: &str,
        role: &RelationLayerSpanRole,
        layers_by_name: &HashMap<&str, &Layer>,
    ) -> Vec<ValidationError> {
        let mut result = Vec::new();

        if is_blank(&role.name) {
            result.push(ValidationError::new(format!("{}.name", prefix), "should not be blank"));
        }

        match layers_by_name.get(role.target_layer_name.as_str()) {
            None => result.push(ValidationError::new(
                format!("{}.targetLayerName", prefix),
                "should reference existing layer",
            )),
            Some(target) if !target.layer_type.is_span() => result.push(ValidationError::new(
                format!("{}.targetLayerName", prefix),
                "should reference span layer",
            )),
            Some(_) => {}
        }

        result
    }
}
