//! Project orchestration

use crate::ServiceError;
use sestra_domain::traits::{PersistenceError, ProjectRepository};
use sestra_domain::{CreateProjectResult, Project};
use sestra_validator::ProjectValidator;
use tracing::{debug, info};

/// Creates and reads project schemas
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectsCrud {
    validator: ProjectValidator,
}

impl ProjectsCrud {
    /// Create a project owned by `whoami`
    ///
    /// Structural validation always runs before the existence check.
    pub fn create<S: ProjectRepository>(
        &self,
        store: &mut S,
        whoami: &str,
        project: &Project,
    ) -> Result<CreateProjectResult, ServiceError> {
        let errors = self.validator.validate(project);
        if !errors.is_empty() {
            debug!(project = %project.name, errors = errors.len(), "Rejected invalid project");
            return Ok(CreateProjectResult::InvalidProject { errors });
        }

        if store
            .exists_project_by_name(&project.name)
            .map_err(ServiceError::store)?
        {
            return Ok(CreateProjectResult::ProjectAlreadyExists);
        }

        match store.save_project(project, whoami) {
            Ok(id) => {
                info!(project = %project.name, %id, created_by = whoami, "Created project");
                Ok(CreateProjectResult::ProjectCreated)
            }
            Err(e) if e.is_conflict() => Ok(CreateProjectResult::ProjectAlreadyExists),
            Err(e) => Err(ServiceError::store(e)),
        }
    }

    /// Load a project by name
    pub fn get_by_name<S: ProjectRepository>(
        &self,
        store: &S,
        whoami: &str,
        name: &str,
    ) -> Result<Option<Project>, ServiceError> {
        debug!(project = name, user = whoami, "Loading project");
        store.find_project_by_name(name).map_err(ServiceError::store)
    }

    /// Names of all projects in creation order
    pub fn get_names<S: ProjectRepository>(
        &self,
        store: &S,
        whoami: &str,
    ) -> Result<Vec<String>, ServiceError> {
        debug!(user = whoami, "Listing projects");
        store.list_project_names().map_err(ServiceError::store)
    }
}
