//! Annotations against their target layer and document

use crate::names::{difference, distinct, duplicates, render};
use sestra_domain::{
    Annotation, AnnotationAttribute, AnnotationId, AnnotationValue, Attribute, AttributeType,
    AttributeValue, Document, Layer, LayerType, RelationAnnotationSpanRole, ValidationError,
};
use std::collections::HashMap;

/// Validates one annotation against its resolved layer and document
///
/// The validator never touches storage. Relation role targets are checked
/// through a caller-supplied predicate answering "does an annotation with
/// this id exist in the layer named X, in the same document, owned by the
/// same user". The predicate may fail; its error is propagated unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotationValidator;

impl AnnotationValidator {
    /// Validate an annotation
    ///
    /// Value and attribute checks are independent and all evaluated. Field
    /// paths are not unique: a span whose end is both not after its start
    /// and past the end of the text yields two `value.end` errors.
    pub fn validate<E, F>(
        &self,
        annotation: &Annotation,
        target_layer: &Layer,
        target_document: &Document,
        mut exists_annotation: F,
    ) -> Result<Vec<ValidationError>, E>
    where
        F: FnMut(&str, AnnotationId) -> Result<bool, E>,
    {
        let mut result = match &annotation.value {
            AnnotationValue::Span { start, end } => {
                self.validate_span(*start, *end, target_document, &target_layer.layer_type)
            }
            AnnotationValue::Relation { span_roles } => self.validate_relation(
                span_roles,
                &target_layer.layer_type,
                &mut exists_annotation,
            )?,
        };

        result.extend(self.validate_attrs(&annotation.attrs, &target_layer.attrs));

        Ok(result)
    }

    fn validate_span(
        &self,
        start: i64,
        end: i64,
        document: &Document,
        layer_type: &LayerType,
    ) -> Vec<ValidationError> {
        let mut result = Vec::new();

        if !layer_type.is_span() {
            result.push(ValidationError::new("value", "is span while target layer isn't"));
        }

        if start < 0 {
            result.push(ValidationError::new("value.start", "should be non-negative"));
        }

        if end <= start {
            result.push(ValidationError::new("value.end", "should be greater than start"));
        }

        let text_len = i64::try_from(document.text_len()).unwrap_or(i64::MAX);
        if end > text_len {
            result.push(ValidationError::new(
                "value.end",
                "should not be greater than document length",
            ));
        }

        result
    }

    fn validate_relation<E, F>(
        &self,
        span_roles: &[RelationAnnotationSpanRole],
        layer_type: &LayerType,
        exists_annotation: &mut F,
    ) -> Result<Vec<ValidationError>, E>
    where
        F: FnMut(&str, AnnotationId) -> Result<bool, E>,
    {
        let mut result = Vec::new();

        result.extend(
            duplicates(span_roles.iter().map(|role| role.name.as_str()))
                .into_iter()
                .map(|name| {
                    ValidationError::new("value.spanRoles", format!("name '{}' is duplicated", name))
                }),
        );

        let layer_roles = match layer_type {
            LayerType::Relation { span_roles } => span_roles,
            LayerType::Span => {
                result.push(ValidationError::new(
                    "value",
                    "is relation while target layer isn't",
                ));
                return Ok(result);
            }
        };

        let value_names = distinct(span_roles.iter().map(|role| role.name.as_str()));
        let layer_names = distinct(layer_roles.iter().map(|role| role.name.as_str()));

        let unknown = difference(&value_names, &layer_names);
        if !unknown.is_empty() {
            result.push(ValidationError::new(
                "value.spanRoles",
                format!("roles '{}' are not defined in layer", render(&unknown)),
            ));
        }

        let missing = difference(&layer_names, &value_names);
        if !missing.is_empty() {
            result.push(ValidationError::new(
                "value.spanRoles",
                format!("roles '{}' defined in layer are missing", render(&missing)),
            ));
        }

        let target_layer_by_role: HashMap<&str, &str> = layer_roles
            .iter()
            .map(|role| (role.name.as_str(), role.target_layer_name.as_str()))
            .collect();

        for (idx, role) in span_roles.iter().enumerate() {
            let Some(&target_layer_name) = target_layer_by_role.get(role.name.as_str()) else {
                continue;
            };

            if !exists_annotation(target_layer_name, role.target_annotation_id)? {
                result.push(ValidationError::new(
                    format!("value.spanRoles[{}].targetAnnotationId", idx),
                    "annotation doesn't exist or is in incorrect layer",
                ));
            }
        }

        Ok(result)
    }

    fn validate_attrs(
        &self,
        attrs: &[AnnotationAttribute],
        layer_attrs: &[Attribute],
    ) -> Vec<ValidationError> {
        let mut result = Vec::new();

        result.extend(
            duplicates(attrs.iter().map(|attr| attr.name.as_str()))
                .into_iter()
                .map(|name| ValidationError::new("attrs", format!("name '{}' is duplicated", name))),
        );

        let names = distinct(attrs.iter().map(|attr| attr.name.as_str()));
        let layer_names = distinct(layer_attrs.iter().map(|attr| attr.name.as_str()));

        let unknown = difference(&names, &layer_names);
        if !unknown.is_empty() {
            result.push(ValidationError::new(
                "attrs",
                format!("'{}' are not defined in layer", render(&unknown)),
            ));
        }

        let missing = difference(&layer_names, &names);
        if !missing.is_empty() {
            result.push(ValidationError::new(
                "attrs",
                format!("'{}' defined in layer are missing", render(&missing)),
            ));
        }

        let layer_attr_types: HashMap<&str, &AttributeType> = layer_attrs
            .iter()
            .map(|attr| (attr.name.as_str(), &attr.attr_type))
            .collect();

        for (idx, attr) in attrs.iter().enumerate() {
            if let Some(attr_type) = layer_attr_types.get(attr.name.as_str()) {
                result.extend(self.validate_attr_value(idx, &attr.value, attr_type));
            }
        }

        result
    }

    fn validate_attr_value(
        &self,
        idx: usize,
        value: &AttributeValue,
        attr_type: &AttributeType,
    ) -> Vec<ValidationError> {
        let mut result = Vec::new();
        let field = format!("attrs[{}].value", idx);

        let compatible = matches!(
            (value, attr_type),
            (AttributeValue::Boolean { .. }, AttributeType::Boolean)
                | (AttributeValue::Int { .. }, AttributeType::Int)
                | (AttributeValue::Float { .. }, AttributeType::Float)
                | (AttributeValue::String { .. }, AttributeType::String)
                | (AttributeValue::Enum { .. }, AttributeType::Enum { .. })
        );

        if !compatible {
            result.push(ValidationError::new(field.clone(), "incompatible type with layer"));
        }

        if let (AttributeValue::Enum { value }, AttributeType::Enum { values }) = (value, attr_type) {
            if !values.contains(value) {
                result.push(ValidationError::new(field, "unknown enum constant"));
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sestra_domain::RelationLayerSpanRole;
    use std::convert::Infallible;

    fn span_layer() -> Layer {
        Layer::span(
            "layer1",
            vec![
                Attribute::new("attr1", AttributeType::Boolean),
                Attribute::new("attr2", AttributeType::Int),
                Attribute::new("attr3", AttributeType::Float),
            ],
        )
    }

    fn relation_layer() -> Layer {
        Layer::relation(
            "layer2",
            vec![
                RelationLayerSpanRole::new("role1", "layer1"),
                RelationLayerSpanRole::new("role2", "layer1"),
            ],
            vec![
                Attribute::new("attr1", AttributeType::String),
                Attribute::new("attr2", AttributeType::enumeration(["value1", "value2"])),
            ],
        )
    }

    fn document() -> Document {
        Document::new("doc1", "Hello, world!")
    }

    fn span_attrs() -> Vec<AnnotationAttribute> {
        vec![
            AnnotationAttribute::new("attr1", AttributeValue::Boolean { value: true }),
            AnnotationAttribute::new("attr2", AttributeValue::Int { value: 10 }),
            AnnotationAttribute::new("attr3", AttributeValue::Float { value: 2.5 }),
        ]
    }

    fn relation_attrs() -> Vec<AnnotationAttribute> {
        vec![
            AnnotationAttribute::new(
                "attr1",
                AttributeValue::String {
                    value: "haha".to_string(),
                },
            ),
            AnnotationAttribute::new(
                "attr2",
                AttributeValue::Enum {
                    value: "value1".to_string(),
                },
            ),
        ]
    }

    fn always(answer: bool) -> impl FnMut(&str, AnnotationId) -> Result<bool, Infallible> {
        move |_: &str, _: AnnotationId| Ok(answer)
    }

    fn validate_span(start: i64, end: i64) -> Vec<ValidationError> {
        let annotation = Annotation::new(
            AnnotationId::new(),
            AnnotationValue::span(start, end),
            span_attrs(),
        );
        AnnotationValidator
            .validate(&annotation, &span_layer(), &document(), always(true))
            .unwrap()
    }

    #[test]
    fn test_valid_span() {
        assert!(validate_span(5, 6).is_empty());
        assert!(validate_span(0, 13).is_empty());
    }

    #[test]
    fn test_empty_span_is_rejected() {
        assert_eq!(
            validate_span(5, 5),
            vec![ValidationError::new("value.end", "should be greater than start")]
        );
    }

    #[test]
    fn test_span_past_document_end() {
        assert_eq!(
            validate_span(5, 14),
            vec![ValidationError::new(
                "value.end",
                "should not be greater than document length"
            )]
        );
    }

    #[test]
    fn test_negative_start() {
        assert_eq!(
            validate_span(-1, 5),
            vec![ValidationError::new("value.start", "should be non-negative")]
        );
    }

    #[test]
    fn test_span_bounds_use_utf16_offsets() {
        let emoji = Document::new("doc1", "a😀b");
        let validate = |end: i64| {
            let annotation =
                Annotation::new(AnnotationId::new(), AnnotationValue::span(0, end), span_attrs());
            AnnotationValidator
                .validate(&annotation, &span_layer(), &emoji, always(true))
                .unwrap()
        };

        assert!(validate(4).is_empty());
        assert_eq!(
            validate(5),
            vec![ValidationError::new(
                "value.end",
                "should not be greater than document length"
            )]
        );
    }

    #[test]
    fn test_end_errors_can_co_occur() {
        let errors = validate_span(20, 15);
        assert_eq!(
            errors,
            vec![
                ValidationError::new("value.end", "should be greater than start"),
                ValidationError::new("value.end", "should not be greater than document length"),
            ]
        );
    }

    #[test]
    fn test_span_in_relation_layer() {
        let annotation = Annotation::new(
            AnnotationId::new(),
            AnnotationValue::span(5, 6),
            relation_attrs(),
        );

        let errors = AnnotationValidator
            .validate(&annotation, &relation_layer(), &document(), always(true))
            .unwrap();
        assert_eq!(
            errors,
            vec![ValidationError::new("value", "is span while target layer isn't")]
        );
    }

    #[test]
    fn test_valid_relation_consults_target_layers() {
        let target = AnnotationId::new();
        let annotation = Annotation::new(
            AnnotationId::new(),
            AnnotationValue::relation(vec![
                RelationAnnotationSpanRole::new("role1", target),
                RelationAnnotationSpanRole::new("role2", target),
            ]),
            relation_attrs(),
        );

        let mut asked = Vec::new();
        let errors = AnnotationValidator
            .validate(&annotation, &relation_layer(), &document(), |layer: &str, id| {
                asked.push((layer.to_string(), id));
                Ok::<_, Infallible>(true)
            })
            .unwrap();

        assert!(errors.is_empty());
        assert_eq!(
            asked,
            vec![("layer1".to_string(), target), ("layer1".to_string(), target)]
        );
    }

    #[test]
    fn test_relation_in_span_layer_skips_role_checks() {
        let annotation = Annotation::new(
            AnnotationId::new(),
            AnnotationValue::relation(vec![RelationAnnotationSpanRole::new(
                "role1",
                AnnotationId::new(),
            )]),
            span_attrs(),
        );

        let errors = AnnotationValidator
            .validate(&annotation, &span_layer(), &document(), |_: &str, _: AnnotationId| -> Result<bool, Infallible> {
                panic!("role targets must not be looked up")
            })
            .unwrap();

        assert_eq!(
            errors,
            vec![ValidationError::new("value", "is relation while target layer isn't")]
        );
    }

    #[test]
    fn test_relation_role_set_mismatch() {
        let target = AnnotationId::new();
        let annotation = Annotation::new(
            AnnotationId::new(),
            AnnotationValue::relation(vec![
                RelationAnnotationSpanRole::new("role1", target),
                RelationAnnotationSpanRole::new("role1", target),
                RelationAnnotationSpanRole::new("role3", target),
            ]),
            relation_attrs(),
        );

        let errors = AnnotationValidator
            .validate(&annotation, &relation_layer(), &document(), always(true))
            .unwrap();

        assert_eq!(
            errors,
            vec![
                ValidationError::new("value.spanRoles", "name 'role1' is duplicated"),
                ValidationError::new("value.spanRoles", "roles '[role3]' are not defined in layer"),
                ValidationError::new(
                    "value.spanRoles",
                    "roles '[role2]' defined in layer are missing"
                ),
            ]
        );
    }

    #[test]
    fn test_missing_target_uses_value_index() {
        let known = AnnotationId::new();
        let unknown = AnnotationId::new();
        let annotation = Annotation::new(
            AnnotationId::new(),
            AnnotationValue::relation(vec![
                RelationAnnotationSpanRole::new("role2", unknown),
                RelationAnnotationSpanRole::new("role1", known),
            ]),
            relation_attrs(),
        );

        let errors = AnnotationValidator
            .validate(&annotation, &relation_layer(), &document(), |_: &str, id| {
                Ok::<_, Infallible>(id == known)
            })
            .unwrap();

        assert_eq!(
            errors,
            vec![ValidationError::new(
                "value.spanRoles[0].targetAnnotationId",
                "annotation doesn't exist or is in incorrect layer"
            )]
        );
    }

    #[test]
    fn test_lookup_failure_is_propagated() {
        let annotation = Annotation::new(
            AnnotationId::new(),
            AnnotationValue::relation(vec![
                RelationAnnotationSpanRole::new("role1", AnnotationId::new()),
                RelationAnnotationSpanRole::new("role2", AnnotationId::new()),
            ]),
            relation_attrs(),
        );

        let result = AnnotationValidator.validate(
            &annotation,
            &relation_layer(),
            &document(),
            |layer: &str, _| Err(format!("layer '{}' unknown", layer)),
        );

        assert_eq!(result, Err("layer 'layer1' unknown".to_string()));
    }

    #[test]
    fn test_attribute_set_mismatch() {
        let annotation = Annotation::new(
            AnnotationId::new(),
            AnnotationValue::span(5, 6),
            vec![
                AnnotationAttribute::new("attr1", AttributeValue::Boolean { value: true }),
                AnnotationAttribute::new("attr1", AttributeValue::Boolean { value: false }),
                AnnotationAttribute::new("extra", AttributeValue::Int { value: 1 }),
            ],
        );

        let errors = AnnotationValidator
            .validate(&annotation, &span_layer(), &document(), always(true))
            .unwrap();

        assert_eq!(
            errors,
            vec![
                ValidationError::new("attrs", "name 'attr1' is duplicated"),
                ValidationError::new("attrs", "'[extra]' are not defined in layer"),
                ValidationError::new("attrs", "'[attr2, attr3]' defined in layer are missing"),
            ]
        );
    }

    #[test]
    fn test_attribute_type_mismatch_and_unknown_enum_constant() {
        let annotation = Annotation::new(
            AnnotationId::new(),
            AnnotationValue::relation(vec![
                RelationAnnotationSpanRole::new("role1", AnnotationId::new()),
                RelationAnnotationSpanRole::new("role2", AnnotationId::new()),
            ]),
            vec![
                AnnotationAttribute::new("attr1", AttributeValue::Int { value: 1 }),
                AnnotationAttribute::new(
                    "attr2",
                    AttributeValue::Enum {
                        value: "value3".to_string(),
                    },
                ),
            ],
        );

        let errors = AnnotationValidator
            .validate(&annotation, &relation_layer(), &document(), always(true))
            .unwrap();

        assert_eq!(
            errors,
            vec![
                ValidationError::new("attrs[0].value", "incompatible type with layer"),
                ValidationError::new("attrs[1].value", "unknown enum constant"),
            ]
        );
    }
}
