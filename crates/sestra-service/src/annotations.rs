//! Annotation orchestration
//!
//! Every lookup here is scoped to the calling user: another user's
//! annotations are invisible, even when ids collide.

use crate::ServiceError;
use sestra_domain::traits::{
    AnnotationRepository, AnnotationScope, DocumentRepository, NewAnnotation, PersistenceError,
    ProjectRepository,
};
use sestra_domain::{
    Annotation, AnnotationContainer, AnnotationId, AnnotationKey, AnnotationValue,
    CreateAnnotationResult, DeleteAnnotationResult, DocumentId, Layer, LayerId, LayerType,
};
use sestra_validator::AnnotationValidator;
use std::collections::HashSet;
use tracing::{debug, info};

/// Creates, reads and deletes annotations
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotationsCrud {
    validator: AnnotationValidator,
}

/// Resolve a layer named by the stored schema; a miss means schema and store
/// have diverged
fn resolve_layer<S: ProjectRepository>(
    store: &S,
    project_name: &str,
    layer_name: &str,
) -> Result<LayerId, ServiceError> {
    store
        .find_layer_id(project_name, layer_name)
        .map_err(ServiceError::store)?
        .ok_or_else(|| ServiceError::UnknownTargetLayer {
            project: project_name.to_string(),
            layer: layer_name.to_string(),
        })
}

impl AnnotationsCrud {
    /// Create an annotation in the (document, layer) named by `container`
    pub fn create<S>(
        &self,
        store: &mut S,
        whoami: &str,
        container: &AnnotationContainer,
        annotation: &Annotation,
    ) -> Result<CreateAnnotationResult, ServiceError>
    where
        S: ProjectRepository + DocumentRepository + AnnotationRepository,
    {
        let project_name = container.project_name.as_str();

        let Some(project_id) = store
            .find_project_id_by_name(project_name)
            .map_err(ServiceError::store)?
        else {
            return Ok(CreateAnnotationResult::ProjectNotFound);
        };
        let Some((document_id, document)) = store
            .find_document(project_id, &container.document_name)
            .map_err(ServiceError::store)?
        else {
            return Ok(CreateAnnotationResult::DocumentNotFound);
        };
        let Some((layer_id, layer)) = store
            .find_layer_by_name(project_name, &container.layer_name)
            .map_err(ServiceError::store)?
        else {
            return Ok(CreateAnnotationResult::LayerNotFound);
        };

        let errors = {
            let store = &*store;
            self.validator
                .validate(annotation, &layer, &document, |target_layer, id| {
                    let scope = AnnotationScope {
                        layer_id: resolve_layer(store, project_name, target_layer)?,
                        document_id,
                        created_by: whoami,
                    };
                    store
                        .exists_annotation_in(id, &scope)
                        .map_err(ServiceError::store)
                })?
        };
        if !errors.is_empty() {
            debug!(annotation = %annotation.id, errors = errors.len(), "Rejected invalid annotation");
            return Ok(CreateAnnotationResult::InvalidAnnotation { errors });
        }

        if store
            .exists_annotation(annotation.id)
            .map_err(ServiceError::store)?
        {
            return Ok(CreateAnnotationResult::AnnotationAlreadyExists);
        }

        let role_targets =
            Self::resolve_role_targets(store, project_name, &layer, document_id, whoami, annotation)?;

        let new = NewAnnotation {
            annotation,
            layer_id,
            document_id,
            created_by: whoami,
            role_targets,
        };
        match store.save_annotation(&new) {
            Ok(key) => {
                info!(
                    annotation = %annotation.id,
                    kind = annotation.value.as_str(),
                    project = project_name,
                    document = %container.document_name,
                    layer = %container.layer_name,
                    %key,
                    created_by = whoami,
                    "Created annotation"
                );
                Ok(CreateAnnotationResult::AnnotationCreated)
            }
            Err(e) if e.is_conflict() => Ok(CreateAnnotationResult::AnnotationAlreadyExists),
            Err(e) => Err(ServiceError::store(e)),
        }
    }

    /// Stored keys of a relation's role targets, in the annotation's role order
    fn resolve_role_targets<S>(
        store: &S,
        project_name: &str,
        layer: &Layer,
        document_id: DocumentId,
        whoami: &str,
        annotation: &Annotation,
    ) -> Result<Vec<AnnotationKey>, ServiceError>
    where
        S: ProjectRepository + AnnotationRepository,
    {
        let (AnnotationValue::Relation { span_roles }, LayerType::Relation { span_roles: declared }) =
            (&annotation.value, &layer.layer_type)
        else {
            return Ok(Vec::new());
        };

        span_roles
            .iter()
            .map(|role| {
                let target_layer = declared
                    .iter()
                    .find(|d| d.name == role.name)
                    .ok_or_else(|| ServiceError::UndeclaredRole {
                        layer: layer.name.clone(),
                        role: role.name.clone(),
                    })?;
                let scope = AnnotationScope {
                    layer_id: resolve_layer(store, project_name, &target_layer.target_layer_name)?,
                    document_id,
                    created_by: whoami,
                };
                store
                    .find_annotation_key(role.target_annotation_id, &scope)
                    .map_err(ServiceError::store)?
                    .ok_or_else(|| ServiceError::MissingRoleTarget {
                        role: role.name.clone(),
                        id: role.target_annotation_id,
                    })
            })
            .collect()
    }

    /// The caller's annotations in the (document, layer) named by `container`
    ///
    /// Unlike creation, an unknown project, document or layer is not an
    /// error here: it simply holds no annotations.
    pub fn get_all<S>(
        &self,
        store: &S,
        whoami: &str,
        container: &AnnotationContainer,
    ) -> Result<Vec<Annotation>, ServiceError>
    where
        S: ProjectRepository + DocumentRepository + AnnotationRepository,
    {
        debug!(
            project = %container.project_name,
            document = %container.document_name,
            layer = %container.layer_name,
            user = whoami,
            "Loading annotations"
        );

        let Some(project_id) = store
            .find_project_id_by_name(&container.project_name)
            .map_err(ServiceError::store)?
        else {
            return Ok(Vec::new());
        };
        let Some(document_id) = store
            .find_document_id(project_id, &container.document_name)
            .map_err(ServiceError::store)?
        else {
            return Ok(Vec::new());
        };
        let Some(layer_id) = store
            .find_layer_id(&container.project_name, &container.layer_name)
            .map_err(ServiceError::store)?
        else {
            return Ok(Vec::new());
        };

        let scope = AnnotationScope {
            layer_id,
            document_id,
            created_by: whoami,
        };
        store
            .find_all_annotations(&scope)
            .map_err(ServiceError::store)
    }

    /// Delete one of the caller's annotations unless others still point at it
    pub fn delete<S: AnnotationRepository>(
        &self,
        store: &mut S,
        whoami: &str,
        id: AnnotationId,
    ) -> Result<DeleteAnnotationResult, ServiceError> {
        if !store
            .exists_annotation_owned_by(id, whoami)
            .map_err(ServiceError::store)?
        {
            return Ok(DeleteAnnotationResult::AnnotationNotFound);
        }

        let mut seen = HashSet::new();
        let ids: Vec<AnnotationId> = store
            .find_all_annotations_referencing(id)
            .map_err(ServiceError::store)?
            .into_iter()
            .filter(|referencing| *referencing != id && seen.insert(*referencing))
            .collect();
        if !ids.is_empty() {
            debug!(annotation = %id, referenced_by = ids.len(), "Refused to delete referenced annotation");
            return Ok(DeleteAnnotationResult::AnnotationIsReferencedByOthers { ids });
        }

        store.delete_annotation(id).map_err(ServiceError::store)?;
        info!(annotation = %id, user = whoami, "Deleted annotation");
        Ok(DeleteAnnotationResult::AnnotationDeleted)
    }
}
