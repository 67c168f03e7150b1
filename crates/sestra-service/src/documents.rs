//! Document orchestration

use crate::ServiceError;
use sestra_domain::traits::{DocumentRepository, PersistenceError, ProjectRepository};
use sestra_domain::{CreateDocumentResult, Document, DocumentContainer};
use sestra_validator::DocumentValidator;
use tracing::{debug, info};

/// Creates and reads documents of a project
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentsCrud {
    validator: DocumentValidator,
}

impl DocumentsCrud {
    /// Attach a document to the project named by `container`
    pub fn create<S>(
        &self,
        store: &mut S,
        whoami: &str,
        container: &DocumentContainer,
        document: &Document,
    ) -> Result<CreateDocumentResult, ServiceError>
    where
        S: ProjectRepository + DocumentRepository,
    {
        let Some(project_id) = store
            .find_project_id_by_name(&container.project_name)
            .map_err(ServiceError::store)?
        else {
            return Ok(CreateDocumentResult::ProjectNotFound);
        };

        let errors = self.validator.validate(document);
        if !errors.is_empty() {
            debug!(document = %document.name, errors = errors.len(), "Rejected invalid document");
            return Ok(CreateDocumentResult::InvalidDocument { errors });
        }

        if store
            .exists_document(project_id, &document.name)
            .map_err(ServiceError::store)?
        {
            return Ok(CreateDocumentResult::DocumentAlreadyExists);
        }

        match store.save_document(project_id, document, whoami) {
            Ok(id) => {
                info!(
                    project = %container.project_name,
                    document = %document.name,
                    %id,
                    created_by = whoami,
                    "Created document"
                );
                Ok(CreateDocumentResult::DocumentCreated)
            }
            Err(e) if e.is_conflict() => Ok(CreateDocumentResult::DocumentAlreadyExists),
            Err(e) => Err(ServiceError::store(e)),
        }
    }

    /// Load a document; a missing project yields `None`
    pub fn get_by_name<S>(
        &self,
        store: &S,
        whoami: &str,
        container: &DocumentContainer,
        name: &str,
    ) -> Result<Option<Document>, ServiceError>
    where
        S: ProjectRepository + DocumentRepository,
    {
        debug!(project = %container.project_name, document = name, user = whoami, "Loading document");
        let Some(project_id) = store
            .find_project_id_by_name(&container.project_name)
            .map_err(ServiceError::store)?
        else {
            return Ok(None);
        };

        let found = store
            .find_document(project_id, name)
            .map_err(ServiceError::store)?;
        Ok(found.map(|(_, document)| document))
    }

    /// Names of the project's documents; a missing project yields no names
    pub fn get_names<S>(
        &self,
        store: &S,
        whoami: &str,
        container: &DocumentContainer,
    ) -> Result<Vec<String>, ServiceError>
    where
        S: ProjectRepository + DocumentRepository,
    {
        debug!(project = %container.project_name, user = whoami, "Listing documents");
        match store
            .find_project_id_by_name(&container.project_name)
            .map_err(ServiceError::store)?
        {
            Some(project_id) => store
                .list_document_names(project_id)
                .map_err(ServiceError::store),
            None => Ok(Vec::new()),
        }
    }
}
