//! Project schemas: projects, layers, roles, attributes, enum constants

use crate::{SqliteStore, StoreError};
use rusqlite::{params, OptionalExtension};
use sestra_domain::traits::ProjectRepository;
use sestra_domain::{
    Attribute, AttributeType, Layer, LayerId, LayerType, Project, ProjectId,
    RelationLayerSpanRole,
};

impl SqliteStore {
    fn insert_project(&self, project: &Project, created_by: &str) -> Result<ProjectId, StoreError> {
        self.conn.execute(
            "INSERT INTO projects (name, created_by) VALUES (?1, ?2)",
            params![project.name, created_by],
        )?;
        let project_id = self.conn.last_insert_rowid();

        let mut layer_ids = Vec::with_capacity(project.layers.len());
        for (index, layer) in project.layers.iter().enumerate() {
            self.conn.execute(
                "INSERT INTO layers (project_id, in_project_index, name, type)
                 VALUES (?1, ?2, ?3, ?4)",
                params![project_id, index as i64, layer.name, layer.layer_type.as_str()],
            )?;
            let layer_id = self.conn.last_insert_rowid();
            self.insert_attributes(layer_id, &layer.attrs)?;
            layer_ids.push(layer_id);
        }

        // Roles go in last: their target may be declared after the relation layer
        for (layer, layer_id) in project.layers.iter().zip(&layer_ids) {
            let LayerType::Relation { span_roles } = &layer.layer_type else {
                continue;
            };
            for (index, role) in span_roles.iter().enumerate() {
                let target = project
                    .layers
                    .iter()
                    .position(|l| l.name == role.target_layer_name)
                    .map(|i| layer_ids[i])
                    .ok_or_else(|| StoreError::UnknownLayer(role.target_layer_name.clone()))?;
                self.conn.execute(
                    "INSERT INTO relation_layer_span_roles
                     (layer_id, in_layer_index, name, target_layer_id)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![layer_id, index as i64, role.name, target],
                )?;
            }
        }

        Ok(ProjectId::from_value(project_id))
    }

    fn insert_attributes(&self, layer_id: i64, attrs: &[Attribute]) -> Result<(), StoreError> {
        for (index, attr) in attrs.iter().enumerate() {
            self.conn.execute(
                "INSERT INTO attributes (layer_id, in_layer_index, name, type)
                 VALUES (?1, ?2, ?3, ?4)",
                params![layer_id, index as i64, attr.name, attr.attr_type.as_str()],
            )?;
            let attribute_id = self.conn.last_insert_rowid();

            if let AttributeType::Enum { values } = &attr.attr_type {
                for (value_index, value) in values.iter().enumerate() {
                    self.conn.execute(
                        "INSERT INTO enum_attribute_values
                         (attribute_id, in_attribute_index, name)
                         VALUES (?1, ?2, ?3)",
                        params![attribute_id, value_index as i64, value],
                    )?;
                }
            }
        }
        Ok(())
    }

    fn load_layer(&self, layer_id: i64, name: String, tag: &str) -> Result<Layer, StoreError> {
        let layer_type = match tag {
            "span" => LayerType::Span,
            "relation" => {
                let mut stmt = self.conn.prepare(
                    "SELECT r.name, t.name
                     FROM relation_layer_span_roles r
                     JOIN layers t ON t.id = r.target_layer_id
                     WHERE r.layer_id = ?1
                     ORDER BY r.in_layer_index",
                )?;
                let span_roles = stmt
                    .query_map(params![layer_id], |row| {
                        Ok(RelationLayerSpanRole::new(
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                        ))
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                LayerType::Relation { span_roles }
            }
            other => {
                return Err(StoreError::Corrupted(format!(
                    "Unknown layer type '{}' for layer '{}'",
                    other, name
                )))
            }
        };

        let mut stmt = self.conn.prepare(
            "SELECT id, name, type FROM attributes
             WHERE layer_id = ?1
             ORDER BY in_layer_index",
        )?;
        let rows = stmt
            .query_map(params![layer_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut attrs = Vec::with_capacity(rows.len());
        for (attribute_id, attr_name, attr_tag) in rows {
            let attr_type = self.load_attribute_type(attribute_id, &attr_name, &attr_tag)?;
            attrs.push(Attribute::new(attr_name, attr_type));
        }

        Ok(Layer {
            name,
            layer_type,
            attrs,
        })
    }

    fn load_attribute_type(
        &self,
        attribute_id: i64,
        name: &str,
        tag: &str,
    ) -> Result<AttributeType, StoreError> {
        match tag {
            "boolean" => Ok(AttributeType::Boolean),
            "int" => Ok(AttributeType::Int),
            "float" => Ok(AttributeType::Float),
            "string" => Ok(AttributeType::String),
            "enum" => {
                let mut stmt = self.conn.prepare(
                    "SELECT name FROM enum_attribute_values
                     WHERE attribute_id = ?1
                     ORDER BY in_attribute_index",
                )?;
                let values = stmt
                    .query_map(params![attribute_id], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(AttributeType::Enum { values })
            }
            other => Err(StoreError::Corrupted(format!(
                "Unknown attribute type '{}' for attribute '{}'",
                other, name
            ))),
        }
    }
}

impl ProjectRepository for SqliteStore {
    fn find_project_id_by_name(&self, name: &str) -> Result<Option<ProjectId>, StoreError> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM projects WHERE name = ?1",
                params![name],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(id.map(ProjectId::from_value))
    }

    fn exists_project_by_name(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.find_project_id_by_name(name)?.is_some())
    }

    fn save_project(&mut self, project: &Project, created_by: &str) -> Result<ProjectId, StoreError> {
        let project_id =
            self.with_savepoint("save_project", |store| store.insert_project(project, created_by))?;
        tracing::debug!(project = %project.name, id = %project_id, "Saved project");
        Ok(project_id)
    }

    fn find_project_by_name(&self, name: &str) -> Result<Option<Project>, StoreError> {
        let Some(project_id) = self.find_project_id_by_name(name)? else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT id, name, type FROM layers
             WHERE project_id = ?1
             ORDER BY in_project_index",
        )?;
        let rows = stmt
            .query_map(params![project_id.value()], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut layers = Vec::with_capacity(rows.len());
        for (layer_id, layer_name, tag) in rows {
            layers.push(self.load_layer(layer_id, layer_name, &tag)?);
        }

        Ok(Some(Project::new(name, layers)))
    }

    fn list_project_names(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT name FROM projects ORDER BY id")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    fn find_layer_id(&self, project_name: &str, layer_name: &str) -> Result<Option<LayerId>, StoreError> {
        let id = self
            .conn
            .query_row(
                "SELECT l.id FROM layers l
                 JOIN projects p ON p.id = l.project_id
                 WHERE p.name = ?1 AND l.name = ?2",
                params![project_name, layer_name],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(id.map(LayerId::from_value))
    }

    fn find_layer_by_name(
        &self,
        project_name: &str,
        layer_name: &str,
    ) -> Result<Option<(LayerId, Layer)>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT l.id, l.name, l.type FROM layers l
                 JOIN projects p ON p.id = l.project_id
                 WHERE p.name = ?1 AND l.name = ?2",
                params![project_name, layer_name],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((layer_id, name, tag)) => {
                let layer = self.load_layer(layer_id, name, &tag)?;
                Ok(Some((LayerId::from_value(layer_id), layer)))
            }
            None => Ok(None),
        }
    }
}
