use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use models::project::{NewProject, Project};

use crate::errors::{ServiceError, ValidationCode};
use crate::storage::{
    from_document, to_document, Document, IndexDef, KeyCondition, Storage, TableSpec,
};
use crate::validation::require_non_empty;

pub const PROJECTS_TABLE: &str = "projects";
pub const USER_ID_INDEX: &str = "user_id-index";

/// Table layout the storage backend must provide for projects.
pub fn table_spec() -> TableSpec {
    TableSpec {
        name: PROJECTS_TABLE.to_string(),
        indexes: vec![IndexDef {
            name: USER_ID_INDEX.to_string(),
            key_attr: "user_id".to_string(),
            sort_attr: None,
        }],
    }
}

/// Application service for projects: create-only records grouped per owner.
pub struct ProjectService<S: Storage> {
    storage: Arc<S>,
}

impl<S: Storage> ProjectService<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Validate and persist a new project.
    pub async fn create(&self, input: NewProject) -> Result<Project, ServiceError> {
        let description = require_non_empty(
            input.description.as_deref(),
            ValidationCode::DescriptionRequired,
            "a description for the project must be specified",
        )?;
        let user_id = require_non_empty(
            input.user_id.as_deref(),
            ValidationCode::UserIdRequired,
            "the user creating the project must be specified",
        )?;

        let project = Project { id: Uuid::new_v4(), description, user_id };
        self.storage.put(PROJECTS_TABLE, to_document(&project)?).await?;
        info!(id = %project.id, user_id = %project.user_id, "created project");
        Ok(project)
    }

    /// All projects, unordered.
    pub async fn list_all(&self) -> Result<Vec<Project>, ServiceError> {
        let docs = self.storage.scan(PROJECTS_TABLE, None, false).await?;
        collect_projects(docs)
    }

    /// The given user's projects.
    pub async fn get_by_user(&self, user_id: &str) -> Result<Vec<Project>, ServiceError> {
        let user_id = require_non_empty(
            Some(user_id),
            ValidationCode::UserIdRequired,
            "a user id must be specified",
        )?;
        let docs = self
            .storage
            .query(PROJECTS_TABLE, USER_ID_INDEX, KeyCondition::eq("user_id", user_id), false)
            .await?;
        collect_projects(docs)
    }

    /// The project with the given id, if any.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Project>, ServiceError> {
        let projects = self.list_all().await?;
        Ok(projects.into_iter().find(|p| p.id.to_string() == id))
    }
}

fn collect_projects(docs: Vec<Document>) -> Result<Vec<Project>, ServiceError> {
    docs.into_iter()
        .map(|d| from_document(d).map_err(ServiceError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::json_document_store::JsonDocumentStore;

    async fn service() -> Result<ProjectService<JsonDocumentStore>, anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("projects_{}.json", Uuid::new_v4()));
        let store = JsonDocumentStore::new(&tmp, vec![table_spec()]).await?;
        Ok(ProjectService::new(store))
    }

    fn new_project(description: &str, user_id: &str) -> NewProject {
        NewProject {
            description: Some(description.to_string()),
            user_id: Some(user_id.to_string()),
        }
    }

    #[tokio::test]
    async fn created_project_is_retrievable_by_owner() -> Result<(), anyhow::Error> {
        let svc = service().await?;
        let created = svc.create(new_project("Unit test project", "1")).await?;

        let owned = svc.get_by_user("1").await?;
        assert_eq!(owned, vec![created]);
        assert!(svc.get_by_user("2").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn create_rejects_missing_description_or_user() -> Result<(), anyhow::Error> {
        let svc = service().await?;

        let err = svc
            .create(NewProject { user_id: Some("1".into()), ..NewProject::default() })
            .await
            .unwrap_err();
        assert_eq!(err.validation_code(), Some(ValidationCode::DescriptionRequired));

        let err = svc
            .create(NewProject { description: Some("side project".into()), ..NewProject::default() })
            .await
            .unwrap_err();
        assert_eq!(err.validation_code(), Some(ValidationCode::UserIdRequired));

        assert!(svc.list_all().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn get_by_id_returns_only_the_matching_project() -> Result<(), anyhow::Error> {
        let svc = service().await?;
        let first = svc.create(new_project("first", "1")).await?;
        let second = svc.create(new_project("second", "2")).await?;

        let found = svc.get_by_id(&second.id.to_string()).await?;
        assert_eq!(found, Some(second));

        let found = svc.get_by_id(&first.id.to_string()).await?;
        assert_eq!(found.map(|p| p.description), Some("first".to_string()));

        assert!(svc.get_by_id(&Uuid::new_v4().to_string()).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn list_all_returns_every_project() -> Result<(), anyhow::Error> {
        let svc = service().await?;
        svc.create(new_project("a", "1")).await?;
        svc.create(new_project("b", "2")).await?;
        assert_eq!(svc.list_all().await?.len(), 2);
        Ok(())
    }
}
