//! The public entry point: every operation in its own transaction

use crate::{AnnotationsCrud, DocumentsCrud, ProjectsCrud, ServiceError, SestraConfig};
use sestra_domain::traits::{
    AnnotationRepository, DocumentRepository, ProjectRepository, Transactional,
};
use sestra_domain::{
    Annotation, AnnotationContainer, AnnotationId, CreateAnnotationResult, CreateDocumentResult,
    CreateProjectResult, DeleteAnnotationResult, Document, DocumentContainer, Project,
};
use sestra_store::SqliteStore;
use tracing::warn;

/// Annotation projects backed by a transactional store
///
/// Each method runs between one `begin` and one `commit`. A fatal error
/// rolls the transaction back; domain outcomes such as `ProjectAlreadyExists`
/// commit normally.
///
/// # Examples
///
/// ```
/// use sestra_domain::{CreateProjectResult, Layer, Project};
/// use sestra_service::{Sestra, SestraConfig};
///
/// let mut sestra = Sestra::open(&SestraConfig::for_testing()).unwrap();
/// let project = Project::new("p", vec![Layer::span("layer1", vec![])]);
///
/// assert_eq!(
///     sestra.create_project("user1", &project).unwrap(),
///     CreateProjectResult::ProjectCreated
/// );
/// ```
pub struct Sestra<S> {
    store: S,
    projects: ProjectsCrud,
    documents: DocumentsCrud,
    annotations: AnnotationsCrud,
}

impl Sestra<SqliteStore> {
    /// Open the SQLite store described by `config`
    pub fn open(config: &SestraConfig) -> Result<Self, ServiceError> {
        let store = SqliteStore::open(&config.store).map_err(ServiceError::store)?;
        Ok(Self::new(store))
    }
}

impl<S> Sestra<S>
where
    S: Transactional + ProjectRepository + DocumentRepository + AnnotationRepository,
{
    /// Wrap an already opened store
    pub fn new(store: S) -> Self {
        Self {
            store,
            projects: ProjectsCrud::default(),
            documents: DocumentsCrud::default(),
            annotations: AnnotationsCrud::default(),
        }
    }

    /// Borrow the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the underlying store
    pub fn into_inner(self) -> S {
        self.store
    }

    fn atomically<T>(
        &mut self,
        operation: &'static str,
        op: impl FnOnce(&mut S) -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        self.store.begin().map_err(ServiceError::store)?;

        let result = op(&mut self.store).and_then(|value| {
            self.store.commit().map_err(ServiceError::store)?;
            Ok(value)
        });

        if let Err(e) = &result {
            warn!(operation, error = %e, "Rolling back");
            if let Err(rollback) = self.store.rollback() {
                warn!(operation, error = %rollback, "Rollback failed");
            }
        }
        result
    }

    /// Create a project owned by `whoami`
    pub fn create_project(
        &mut self,
        whoami: &str,
        project: &Project,
    ) -> Result<CreateProjectResult, ServiceError> {
        let projects = self.projects;
        self.atomically("create_project", |store| projects.create(store, whoami, project))
    }

    /// Load a project with its full schema
    pub fn get_project_by_name(
        &mut self,
        whoami: &str,
        name: &str,
    ) -> Result<Option<Project>, ServiceError> {
        let projects = self.projects;
        self.atomically("get_project_by_name", |store| {
            projects.get_by_name(store, whoami, name)
        })
    }

    /// Names of all projects in creation order
    pub fn get_project_names(&mut self, whoami: &str) -> Result<Vec<String>, ServiceError> {
        let projects = self.projects;
        self.atomically("get_project_names", |store| projects.get_names(store, whoami))
    }

    /// Attach a document to a project
    pub fn create_document(
        &mut self,
        whoami: &str,
        container: &DocumentContainer,
        document: &Document,
    ) -> Result<CreateDocumentResult, ServiceError> {
        let documents = self.documents;
        self.atomically("create_document", |store| {
            documents.create(store, whoami, container, document)
        })
    }

    /// Load a document of a project
    pub fn get_document_by_name(
        &mut self,
        whoami: &str,
        container: &DocumentContainer,
        name: &str,
    ) -> Result<Option<Document>, ServiceError> {
        let documents = self.documents;
        self.atomically("get_document_by_name", |store| {
            documents.get_by_name(store, whoami, container, name)
        })
    }

    /// Names of a project's documents in creation order
    pub fn get_document_names(
        &mut self,
        whoami: &str,
        container: &DocumentContainer,
    ) -> Result<Vec<String>, ServiceError> {
        let documents = self.documents;
        self.atomically("get_document_names", |store| {
            documents.get_names(store, whoami, container)
        })
    }

    /// Create an annotation owned by `whoami`
    pub fn create_annotation(
        &mut self,
        whoami: &str,
        container: &AnnotationContainer,
        annotation: &Annotation,
    ) -> Result<CreateAnnotationResult, ServiceError> {
        let annotations = self.annotations;
        self.atomically("create_annotation", |store| {
            annotations.create(store, whoami, container, annotation)
        })
    }

    /// The caller's annotations in one (document, layer)
    pub fn get_annotations(
        &mut self,
        whoami: &str,
        container: &AnnotationContainer,
    ) -> Result<Vec<Annotation>, ServiceError> {
        let annotations = self.annotations;
        self.atomically("get_annotations", |store| {
            annotations.get_all(store, whoami, container)
        })
    }

    /// Delete one of the caller's annotations
    pub fn delete_annotation(
        &mut self,
        whoami: &str,
        id: AnnotationId,
    ) -> Result<DeleteAnnotationResult, ServiceError> {
        let annotations = self.annotations;
        self.atomically("delete_annotation", |store| annotations.delete(store, whoami, id))
    }
}
