//! Trait definitions for external interactions
//!
//! These traits define the boundary between the orchestration layer and
//! storage. Infrastructure implementations live in other crates
//! (sestra-store). Every annotation lookup takes the owning user as a
//! mandatory argument: per-user ownership is part of each query, not an
//! ambient setting.

use crate::{
    Annotation, AnnotationId, AnnotationKey, Document, DocumentId, Layer, LayerId, Project,
    ProjectId,
};

/// Errors raised by a storage implementation
pub trait PersistenceError: std::error::Error + Send + Sync + 'static {
    /// Whether the failure is a uniqueness-constraint violation
    ///
    /// Two concurrent creates can both pass the existence check; the loser's
    /// save then fails with a conflict, which callers report as the matching
    /// `*AlreadyExists` outcome.
    fn is_conflict(&self) -> bool;
}

/// Common base of all repository traits
pub trait Repository {
    /// Error type for store operations
    type Error: PersistenceError;
}

/// Transaction boundary supplied by the store
///
/// Every public operation of the service runs between one `begin` and one
/// `commit` (or `rollback` when it fails).
pub trait Transactional: Repository {
    /// Open a transaction
    fn begin(&mut self) -> Result<(), Self::Error>;

    /// Commit the open transaction
    fn commit(&mut self) -> Result<(), Self::Error>;

    /// Roll back the open transaction
    fn rollback(&mut self) -> Result<(), Self::Error>;
}

/// Storage of project schemas
pub trait ProjectRepository: Repository {
    /// Look up a project's key by name
    fn find_project_id_by_name(&self, name: &str) -> Result<Option<ProjectId>, Self::Error>;

    /// Whether a project with this name exists
    fn exists_project_by_name(&self, name: &str) -> Result<bool, Self::Error>;

    /// Persist a validated project
    fn save_project(&mut self, project: &Project, created_by: &str)
        -> Result<ProjectId, Self::Error>;

    /// Load a project with all layers in declaration order
    fn find_project_by_name(&self, name: &str) -> Result<Option<Project>, Self::Error>;

    /// Names of all projects in creation order
    fn list_project_names(&self) -> Result<Vec<String>, Self::Error>;

    /// Look up a layer's key
    fn find_layer_id(&self, project_name: &str, layer_name: &str)
        -> Result<Option<LayerId>, Self::Error>;

    /// Load a layer together with its key
    fn find_layer_by_name(
        &self,
        project_name: &str,
        layer_name: &str,
    ) -> Result<Option<(LayerId, Layer)>, Self::Error>;
}

/// Storage of documents
pub trait DocumentRepository: Repository {
    /// Look up a document's key
    fn find_document_id(&self, project_id: ProjectId, name: &str)
        -> Result<Option<DocumentId>, Self::Error>;

    /// Load a document together with its key
    fn find_document(
        &self,
        project_id: ProjectId,
        name: &str,
    ) -> Result<Option<(DocumentId, Document)>, Self::Error>;

    /// Whether the project already has a document with this name
    fn exists_document(&self, project_id: ProjectId, name: &str) -> Result<bool, Self::Error>;

    /// Persist a validated document
    fn save_document(
        &mut self,
        project_id: ProjectId,
        document: &Document,
        created_by: &str,
    ) -> Result<DocumentId, Self::Error>;

    /// Names of the project's documents in creation order
    fn list_document_names(&self, project_id: ProjectId) -> Result<Vec<String>, Self::Error>;
}

/// The (layer, document, owner) an annotation lookup is restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotationScope<'a> {
    /// Layer the annotation must belong to
    pub layer_id: LayerId,

    /// Document the annotation must belong to
    pub document_id: DocumentId,

    /// User who must have created the annotation
    pub created_by: &'a str,
}

/// A validated annotation ready to be persisted
#[derive(Debug, Clone)]
pub struct NewAnnotation<'a> {
    /// The annotation itself
    pub annotation: &'a Annotation,

    /// Layer it belongs to
    pub layer_id: LayerId,

    /// Document it belongs to
    pub document_id: DocumentId,

    /// Creating user
    pub created_by: &'a str,

    /// Stored keys of the relation role targets, in the order of the
    /// annotation's roles (empty for spans)
    pub role_targets: Vec<AnnotationKey>,
}

/// Storage of annotations
pub trait AnnotationRepository: Repository {
    /// Whether an annotation with this id exists anywhere, for any user
    fn exists_annotation(&self, id: AnnotationId) -> Result<bool, Self::Error>;

    /// Whether the user owns an annotation with this id
    fn exists_annotation_owned_by(&self, id: AnnotationId, created_by: &str)
        -> Result<bool, Self::Error>;

    /// Whether an annotation with this id exists within the scope
    fn exists_annotation_in(&self, id: AnnotationId, scope: &AnnotationScope<'_>)
        -> Result<bool, Self::Error>;

    /// Stored key of an annotation within the scope
    fn find_annotation_key(
        &self,
        id: AnnotationId,
        scope: &AnnotationScope<'_>,
    ) -> Result<Option<AnnotationKey>, Self::Error>;

    /// All annotations within the scope, in persisted order
    fn find_all_annotations(&self, scope: &AnnotationScope<'_>)
        -> Result<Vec<Annotation>, Self::Error>;

    /// Ids of annotations whose relation roles point at `target`
    ///
    /// An annotation referencing the target through several roles appears
    /// once per role.
    fn find_all_annotations_referencing(&self, target: AnnotationId)
        -> Result<Vec<AnnotationId>, Self::Error>;

    /// Persist a validated annotation
    fn save_annotation(&mut self, annotation: &NewAnnotation<'_>)
        -> Result<AnnotationKey, Self::Error>;

    /// Remove an annotation along with its roles and attribute values
    fn delete_annotation(&mut self, id: AnnotationId) -> Result<(), Self::Error>;
}
