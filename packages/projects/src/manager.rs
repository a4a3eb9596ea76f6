use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use planline_core::{
    validate_project_data, validate_project_update, Project, ProjectCreateInput, ProjectStatus,
    ProjectUpdateInput, ValidationError,
};

use crate::storage::{ProjectStorage, StorageError, StorageResult};

/// Manager errors
#[derive(Error, Debug)]
pub enum ManagerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Validation errors: {0:?}")]
    Validation(Vec<ValidationError>),
}

pub type ManagerResult<T> = Result<T, ManagerError>;

/// Validates inputs and delegates to project storage
pub struct ProjectsManager {
    storage: Arc<ProjectStorage>,
}

impl ProjectsManager {
    pub fn new(storage: Arc<ProjectStorage>) -> Self {
        Self { storage }
    }

    pub async fn list_projects(&self) -> ManagerResult<Vec<Project>> {
        let projects = self.storage.list_projects().await?;
        debug!("Listing {} projects", projects.len());
        Ok(projects)
    }

    pub async fn list_projects_paginated(
        &self,
        status: Option<ProjectStatus>,
        limit: i64,
        offset: i64,
    ) -> ManagerResult<(Vec<Project>, i64)> {
        Ok(self
            .storage
            .list_projects_paginated(status, limit, offset)
            .await?)
    }

    pub async fn get_project(&self, id: &str) -> ManagerResult<Option<Project>> {
        Ok(self.storage.get_project(id).await?)
    }

    pub async fn get_project_by_name(&self, name: &str) -> ManagerResult<Option<Project>> {
        Ok(self.storage.get_project_by_name(name).await?)
    }

    pub async fn get_project_by_code(&self, code: &str) -> ManagerResult<Option<Project>> {
        Ok(self.storage.get_project_by_code(code).await?)
    }

    pub async fn create_project(&self, data: ProjectCreateInput) -> ManagerResult<Project> {
        let validation_errors = validate_project_data(&data);
        if !validation_errors.is_empty() {
            return Err(ManagerError::Validation(validation_errors));
        }

        // Storage handles duplicate checks
        let project = self.storage.create_project(data).await?;

        info!("Created project '{}' with ID {}", project.name, project.id);
        Ok(project)
    }

    pub async fn update_project(
        &self,
        id: &str,
        updates: ProjectUpdateInput,
    ) -> ManagerResult<Project> {
        let validation_errors = validate_project_update(&updates);
        if !validation_errors.is_empty() {
            return Err(ManagerError::Validation(validation_errors));
        }

        let project = self.storage.update_project(id, updates).await?;

        info!("Updated project '{}' (ID: {})", project.name, project.id);
        Ok(project)
    }

    pub async fn delete_project(&self, id: &str) -> ManagerResult<bool> {
        // Get project info before deletion for logging
        if let Some(project) = self.storage.get_project(id).await? {
            self.storage.delete_project(id).await?;
            info!("Deleted project '{}' (ID: {})", project.name, project.id);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::SqlitePool;

    async fn create_test_manager() -> ProjectsManager {
        let pool = SqlitePool::connect(":memory:").await.unwrap();

        sqlx::query(
            r#"
            CREATE TABLE projects (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                code TEXT NOT NULL UNIQUE,
                description TEXT,
                status TEXT NOT NULL DEFAULT 'planning',
                priority TEXT NOT NULL DEFAULT 'medium',
                tags TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();

        ProjectsManager::new(Arc::new(ProjectStorage::new(pool)))
    }

    fn input(name: &str) -> ProjectCreateInput {
        ProjectCreateInput {
            name: name.to_string(),
            code: None,
            description: None,
            status: None,
            priority: None,
            tags: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_project() {
        let manager = create_test_manager().await;

        let project = manager.create_project(input("Test Project")).await.unwrap();
        assert_eq!(project.name, "Test Project");

        let retrieved = manager.get_project(&project.id).await.unwrap();
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().name, "Test Project");
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input() {
        let manager = create_test_manager().await;

        let result = manager.create_project(input("")).await;
        match result.unwrap_err() {
            ManagerError::Validation(errors) => {
                assert!(errors.iter().any(|e| e.field == "name"));
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }

        let result = manager
            .create_project(ProjectCreateInput {
                code: Some("lowercase".to_string()),
                ..input("Valid Name")
            })
            .await;
        match result.unwrap_err() {
            ManagerError::Validation(errors) => {
                assert!(errors.iter().any(|e| e.field == "code"));
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_duplicate_name_surfaces_storage_error() {
        let manager = create_test_manager().await;

        manager
            .create_project(ProjectCreateInput {
                code: Some("DUP1".to_string()),
                ..input("Duplicate")
            })
            .await
            .unwrap();

        let result = manager
            .create_project(ProjectCreateInput {
                code: Some("DUP2".to_string()),
                ..input("Duplicate")
            })
            .await;

        match result.unwrap_err() {
            ManagerError::Storage(StorageError::DuplicateName(name)) => {
                assert_eq!(name, "Duplicate")
            }
            other => panic!("Expected DuplicateName error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_input() {
        let manager = create_test_manager().await;

        let project = manager.create_project(input("Stable")).await.unwrap();
        let result = manager
            .update_project(
                &project.id,
                ProjectUpdateInput {
                    name: Some("".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(ManagerError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_project_reports_existence() {
        let manager = create_test_manager().await;

        let project = manager.create_project(input("Disposable")).await.unwrap();
        assert!(manager.delete_project(&project.id).await.unwrap());
        assert!(!manager.delete_project(&project.id).await.unwrap());
    }
}
