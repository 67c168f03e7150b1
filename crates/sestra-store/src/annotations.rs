//! Annotations with their relation roles and attribute values

use crate::{SqliteStore, StoreError};
use rusqlite::{params, OptionalExtension};
use sestra_domain::traits::{AnnotationRepository, AnnotationScope, NewAnnotation};
use sestra_domain::{
    Annotation, AnnotationAttribute, AnnotationId, AnnotationKey, AnnotationValue,
    AttributeValue, RelationAnnotationSpanRole,
};

/// One `annotation_attributes` row before its tag is checked
struct AttributeRow {
    name: String,
    tag: String,
    boolean_value: Option<bool>,
    int_value: Option<i64>,
    float_bits: Option<i64>,
    string_value: Option<String>,
    enum_value: Option<String>,
}

impl AttributeRow {
    fn into_attribute(self) -> Result<AnnotationAttribute, StoreError> {
        let missing = |column: &str| {
            StoreError::Corrupted(format!(
                "Attribute '{}' of type '{}' has no {}",
                self.name, self.tag, column
            ))
        };

        let value = match self.tag.as_str() {
            "boolean" => AttributeValue::Boolean {
                value: self.boolean_value.ok_or_else(|| missing("boolean_value"))?,
            },
            "int" => AttributeValue::Int {
                value: self.int_value.ok_or_else(|| missing("int_value"))?,
            },
            "float" => AttributeValue::Float {
                value: self
                    .float_bits
                    .map(|bits| f64::from_bits(bits as u64))
                    .ok_or_else(|| missing("float_bits"))?,
            },
            "string" => AttributeValue::String {
                value: self.string_value.clone().ok_or_else(|| missing("string_value"))?,
            },
            "enum" => AttributeValue::Enum {
                value: self.enum_value.clone().ok_or_else(|| missing("enum_value"))?,
            },
            other => {
                return Err(StoreError::Corrupted(format!(
                    "Unknown attribute value type '{}' for attribute '{}'",
                    other, self.name
                )))
            }
        };

        Ok(AnnotationAttribute::new(self.name, value))
    }
}

impl SqliteStore {
    fn insert_annotation(&self, new: &NewAnnotation<'_>) -> Result<AnnotationKey, StoreError> {
        let annotation = new.annotation;
        let (start, end) = match &annotation.value {
            AnnotationValue::Span { start, end } => (Some(*start), Some(*end)),
            AnnotationValue::Relation { .. } => (None, None),
        };

        self.conn.execute(
            "INSERT INTO annotations
             (uuid, document_id, layer_id, type, span_start, span_end, created_by)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                Self::annotation_id_to_bytes(annotation.id),
                new.document_id.value(),
                new.layer_id.value(),
                annotation.value.as_str(),
                start,
                end,
                new.created_by,
            ],
        )?;
        let annotation_key = self.conn.last_insert_rowid();

        if let AnnotationValue::Relation { span_roles } = &annotation.value {
            if span_roles.len() != new.role_targets.len() {
                return Err(StoreError::Corrupted(format!(
                    "Annotation {} has {} roles but {} resolved targets",
                    annotation.id,
                    span_roles.len(),
                    new.role_targets.len()
                )));
            }
            for (index, (role, target)) in span_roles.iter().zip(&new.role_targets).enumerate() {
                self.conn.execute(
                    "INSERT INTO relation_annotation_span_roles
                     (annotation_id, in_annotation_index, name, target_annotation_id)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![annotation_key, index as i64, role.name, target.value()],
                )?;
            }
        }

        for (index, attr) in annotation.attrs.iter().enumerate() {
            let (boolean_value, int_value, float_bits, string_value, enum_value) = match &attr.value {
                AttributeValue::Boolean { value } => (Some(*value), None, None, None, None),
                AttributeValue::Int { value } => (None, Some(*value), None, None, None),
                AttributeValue::Float { value } => (None, None, Some(value.to_bits() as i64), None, None),
                AttributeValue::String { value } => (None, None, None, Some(value.as_str()), None),
                AttributeValue::Enum { value } => (None, None, None, None, Some(value.as_str())),
            };
            self.conn.execute(
                "INSERT INTO annotation_attributes
                 (annotation_id, in_annotation_index, name, type,
                  boolean_value, int_value, float_bits, string_value, enum_value)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    annotation_key,
                    index as i64,
                    attr.name,
                    attr.value.as_str(),
                    boolean_value,
                    int_value,
                    float_bits,
                    string_value,
                    enum_value,
                ],
            )?;
        }

        Ok(AnnotationKey::from_value(annotation_key))
    }

    fn load_annotation(
        &self,
        key: i64,
        uuid: &[u8],
        tag: &str,
        start: Option<i64>,
        end: Option<i64>,
    ) -> Result<Annotation, StoreError> {
        let id = Self::bytes_to_annotation_id(uuid)?;

        let value = match (tag, start, end) {
            ("span", Some(start), Some(end)) => AnnotationValue::Span { start, end },
            ("span", _, _) => {
                return Err(StoreError::Corrupted(format!(
                    "Span annotation {} has no offsets",
                    id
                )))
            }
            ("relation", _, _) => {
                let mut stmt = self.conn.prepare(
                    "SELECT r.name, t.uuid
                     FROM relation_annotation_span_roles r
                     JOIN annotations t ON t.id = r.target_annotation_id
                     WHERE r.annotation_id = ?1
                     ORDER BY r.in_annotation_index",
                )?;
                let rows = stmt
                    .query_map(params![key], |row| {
                        Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?))
                    })?
                    .collect::<Result<Vec<_>, _>>()?;

                let span_roles = rows
                    .into_iter()
                    .map(|(name, target)| {
                        Ok(RelationAnnotationSpanRole::new(
                            name,
                            Self::bytes_to_annotation_id(&target)?,
                        ))
                    })
                    .collect::<Result<Vec<_>, StoreError>>()?;
                AnnotationValue::Relation { span_roles }
            }
            (other, _, _) => {
                return Err(StoreError::Corrupted(format!(
                    "Unknown annotation type '{}' for annotation {}",
                    other, id
                )))
            }
        };

        let mut stmt = self.conn.prepare(
            "SELECT name, type, boolean_value, int_value, float_bits, string_value, enum_value
             FROM annotation_attributes
             WHERE annotation_id = ?1
             ORDER BY in_annotation_index",
        )?;
        let rows = stmt
            .query_map(params![key], |row| {
                Ok(AttributeRow {
                    name: row.get(0)?,
                    tag: row.get(1)?,
                    boolean_value: row.get(2)?,
                    int_value: row.get(3)?,
                    float_bits: row.get(4)?,
                    string_value: row.get(5)?,
                    enum_value: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        let attrs = rows
            .into_iter()
            .map(AttributeRow::into_attribute)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Annotation::new(id, value, attrs))
    }

    fn remove_annotation(&self, id: AnnotationId) -> Result<(), StoreError> {
        let uuid = Self::annotation_id_to_bytes(id);
        let Some(key) = self
            .conn
            .query_row(
                "SELECT id FROM annotations WHERE uuid = ?1",
                params![uuid],
                |row| row.get::<_, i64>(0),
            )
            .optional()?
        else {
            return Ok(());
        };

        self.conn.execute(
            "DELETE FROM relation_annotation_span_roles WHERE annotation_id = ?1",
            params![key],
        )?;
        self.conn.execute(
            "DELETE FROM annotation_attributes WHERE annotation_id = ?1",
            params![key],
        )?;
        self.conn
            .execute("DELETE FROM annotations WHERE id = ?1", params![key])?;
        Ok(())
    }
}

impl AnnotationRepository for SqliteStore {
    fn exists_annotation(&self, id: AnnotationId) -> Result<bool, StoreError> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM annotations WHERE uuid = ?1",
                params![Self::annotation_id_to_bytes(id)],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn exists_annotation_owned_by(&self, id: AnnotationId, created_by: &str) -> Result<bool, StoreError> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM annotations WHERE uuid = ?1 AND created_by = ?2",
                params![Self::annotation_id_to_bytes(id), created_by],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn exists_annotation_in(&self, id: AnnotationId, scope: &AnnotationScope<'_>) -> Result<bool, StoreError> {
        Ok(self.find_annotation_key(id, scope)?.is_some())
    }

    fn find_annotation_key(
        &self,
        id: AnnotationId,
        scope: &AnnotationScope<'_>,
    ) -> Result<Option<AnnotationKey>, StoreError> {
        let key = self
            .conn
            .query_row(
                "SELECT id FROM annotations
                 WHERE uuid = ?1 AND layer_id = ?2 AND document_id = ?3 AND created_by = ?4",
                params![
                    Self::annotation_id_to_bytes(id),
                    scope.layer_id.value(),
                    scope.document_id.value(),
                    scope.created_by,
                ],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(key.map(AnnotationKey::from_value))
    }

    fn find_all_annotations(&self, scope: &AnnotationScope<'_>) -> Result<Vec<Annotation>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, uuid, type, span_start, span_end FROM annotations
             WHERE layer_id = ?1 AND document_id = ?2 AND created_by = ?3
             ORDER BY id",
        )?;
        let rows = stmt
            .query_map(
                params![scope.layer_id.value(), scope.document_id.value(), scope.created_by],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, Vec<u8>>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Option<i64>>(3)?,
                        row.get::<_, Option<i64>>(4)?,
                    ))
                },
            )?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(key, uuid, tag, start, end)| self.load_annotation(key, &uuid, &tag, start, end))
            .collect()
    }

    fn find_all_annotations_referencing(&self, target: AnnotationId) -> Result<Vec<AnnotationId>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT a.uuid
             FROM relation_annotation_span_roles r
             JOIN annotations a ON a.id = r.annotation_id
             JOIN annotations t ON t.id = r.target_annotation_id
             WHERE t.uuid = ?1
             ORDER BY r.id",
        )?;
        let rows = stmt
            .query_map(params![Self::annotation_id_to_bytes(target)], |row| {
                row.get::<_, Vec<u8>>(0)
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.iter()
            .map(|bytes| Self::bytes_to_annotation_id(bytes))
            .collect()
    }

    fn save_annotation(&mut self, annotation: &NewAnnotation<'_>) -> Result<AnnotationKey, StoreError> {
        let key = self.with_savepoint("save_annotation", |store| store.insert_annotation(annotation))?;
        tracing::debug!(annotation = %annotation.annotation.id, key = %key, "Saved annotation");
        Ok(key)
    }

    fn delete_annotation(&mut self, id: AnnotationId) -> Result<(), StoreError> {
        self.with_savepoint("delete_annotation", |store| store.remove_annotation(id))?;
        tracing::debug!(annotation = %id, "Deleted annotation");
        Ok(())
    }
}
