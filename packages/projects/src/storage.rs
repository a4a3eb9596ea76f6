// ABOUTME: SQLite storage for the project registry
// ABOUTME: Unique names and codes, JSON tag column, paginated listing

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use thiserror::Error;
use tracing::debug;

use planline_core::{
    generate_project_id, suggest_project_code, Priority, Project, ProjectCreateInput,
    ProjectStatus, ProjectUpdateInput,
};

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Project not found")]
    NotFound,
    #[error("Duplicate project name: {0}")]
    DuplicateName(String),
    #[error("Duplicate project code: {0}")]
    DuplicateCode(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

pub struct ProjectStorage {
    pool: SqlitePool,
}

impl ProjectStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Decodes one row, deserializing the JSON tag column
    fn row_to_project(&self, row: &SqliteRow) -> StorageResult<Project> {
        let tags_json: Option<String> = row.try_get("tags")?;
        let tags = if let Some(json) = tags_json {
            Some(serde_json::from_str(&json)?)
        } else {
            None
        };

        let status_str: String = row.try_get("status")?;
        let status = match status_str.as_str() {
            "planning" => ProjectStatus::Planning,
            "active" => ProjectStatus::Active,
            "on-hold" => ProjectStatus::OnHold,
            "completed" => ProjectStatus::Completed,
            "archived" => ProjectStatus::Archived,
            _ => ProjectStatus::Planning,
        };

        let priority_str: String = row.try_get("priority")?;
        let priority = match priority_str.as_str() {
            "low" => Priority::Low,
            "medium" => Priority::Medium,
            "high" => Priority::High,
            _ => Priority::Medium,
        };

        let created_at_str: String = row.try_get("created_at")?;
        let updated_at_str: String = row.try_get("updated_at")?;

        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|_| StorageError::Database("Invalid created_at timestamp".to_string()))?
            .with_timezone(&Utc);

        let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
            .map_err(|_| StorageError::Database("Invalid updated_at timestamp".to_string()))?
            .with_timezone(&Utc);

        Ok(Project {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            code: row.try_get("code")?,
            description: row.try_get("description")?,
            status,
            priority,
            tags,
            created_at,
            updated_at,
        })
    }

    fn status_to_string(status: &ProjectStatus) -> &'static str {
        match status {
            ProjectStatus::Planning => "planning",
            ProjectStatus::Active => "active",
            ProjectStatus::OnHold => "on-hold",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Archived => "archived",
        }
    }

    fn priority_to_string(priority: &Priority) -> &'static str {
        match priority {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub async fn create_project(&self, input: ProjectCreateInput) -> StorageResult<Project> {
        let id = generate_project_id();
        let now = Utc::now();

        let code = match &input.code {
            Some(code) => code.clone(),
            None => suggest_project_code(&input.name),
        };

        let tags_json = input.tags.as_ref().map(serde_json::to_string).transpose()?;
        let status_str = Self::status_to_string(&input.status.unwrap_or_default());
        let priority_str = Self::priority_to_string(&input.priority.unwrap_or_default());

        let result = sqlx::query(
            r#"
            INSERT INTO projects (
                id, name, code, description, status, priority, tags, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&input.name)
        .bind(&code)
        .bind(&input.description)
        .bind(status_str)
        .bind(priority_str)
        .bind(&tags_json)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                debug!("Inserted project '{}' as {}", input.name, id);
                self.get_project(&id).await?.ok_or(StorageError::NotFound)
            }
            Err(sqlx::Error::Database(db_err)) => {
                // SQLite UNIQUE constraint violation
                if let Some(sql_code) = db_err.code() {
                    if sql_code == "2067" || sql_code == "1555" {
                        let message = db_err.message();
                        if message.contains("name") {
                            return Err(StorageError::DuplicateName(input.name));
                        } else if message.contains("code") {
                            return Err(StorageError::DuplicateCode(code));
                        }
                    }
                }
                Err(StorageError::Sqlx(sqlx::Error::Database(db_err)))
            }
            Err(e) => Err(StorageError::Sqlx(e)),
        }
    }

    pub async fn get_project(&self, id: &str) -> StorageResult<Option<Project>> {
        let row = sqlx::query("SELECT * FROM projects WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(self.row_to_project(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_project_by_name(&self, name: &str) -> StorageResult<Option<Project>> {
        let row = sqlx::query("SELECT * FROM projects WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(self.row_to_project(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_project_by_code(&self, code: &str) -> StorageResult<Option<Project>> {
        let row = sqlx::query("SELECT * FROM projects WHERE code = ?")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(self.row_to_project(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_projects(&self) -> StorageResult<Vec<Project>> {
        let rows = sqlx::query("SELECT * FROM projects ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;

        let mut projects = Vec::new();
        for row in rows {
            projects.push(self.row_to_project(&row)?);
        }

        Ok(projects)
    }

    /// One page of projects plus the unpaged total, optionally filtered
    /// by status
    pub async fn list_projects_paginated(
        &self,
        status: Option<ProjectStatus>,
        limit: i64,
        offset: i64,
    ) -> StorageResult<(Vec<Project>, i64)> {
        let (where_clause, status_param) = match &status {
            Some(status) => ("WHERE status = ?", Some(Self::status_to_string(status))),
            None => ("", None),
        };

        let count_query = format!("SELECT COUNT(*) FROM projects {}", where_clause);
        let mut count = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(param) = &status_param {
            count = count.bind(param.clone());
        }
        let total = count.fetch_one(&self.pool).await?;

        let list_query = format!(
            "SELECT * FROM projects {} ORDER BY name ASC LIMIT ? OFFSET ?",
            where_clause
        );
        let mut query = sqlx::query(&list_query);
        if let Some(param) = status_param {
            query = query.bind(param);
        }
        let rows = query
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let mut projects = Vec::new();
        for row in rows {
            projects.push(self.row_to_project(&row)?);
        }

        Ok((projects, total))
    }

    pub async fn update_project(
        &self,
        id: &str,
        input: ProjectUpdateInput,
    ) -> StorageResult<Project> {
        let mut query_parts = Vec::new();

        if input.name.is_some() {
            query_parts.push("name = ?");
        }
        if input.description.is_some() {
            query_parts.push("description = ?");
        }
        if input.status.is_some() {
            query_parts.push("status = ?");
        }
        if input.priority.is_some() {
            query_parts.push("priority = ?");
        }
        if input.tags.is_some() {
            query_parts.push("tags = ?");
        }

        if query_parts.is_empty() {
            return self.get_project(id).await?.ok_or(StorageError::NotFound);
        }

        query_parts.push("updated_at = ?");

        let query_str = format!(
            "UPDATE projects SET {} WHERE id = ?",
            query_parts.join(", ")
        );

        let mut query = sqlx::query(&query_str);

        if let Some(ref name) = input.name {
            query = query.bind(name);
        }
        if let Some(ref description) = input.description {
            query = query.bind(description);
        }
        if let Some(ref status) = input.status {
            query = query.bind(Self::status_to_string(status));
        }
        if let Some(ref priority) = input.priority {
            query = query.bind(Self::priority_to_string(priority));
        }
        if let Some(ref tags) = input.tags {
            let tags_json = serde_json::to_string(tags)?;
            query = query.bind(tags_json);
        }

        query = query.bind(Utc::now().to_rfc3339()).bind(id);

        let result = query.execute(&self.pool).await;

        match result {
            Ok(result) => {
                if result.rows_affected() == 0 {
                    return Err(StorageError::NotFound);
                }
                debug!("Applied update to project {}", id);
                self.get_project(id).await?.ok_or(StorageError::NotFound)
            }
            Err(sqlx::Error::Database(db_err)) => {
                // SQLite UNIQUE constraint violation
                if let Some(sql_code) = db_err.code() {
                    if sql_code == "2067" || sql_code == "1555" {
                        let message = db_err.message();
                        if message.contains("name") {
                            return Err(StorageError::DuplicateName(
                                input.name.unwrap_or_default(),
                            ));
                        }
                    }
                }
                Err(StorageError::Sqlx(sqlx::Error::Database(db_err)))
            }
            Err(e) => Err(StorageError::Sqlx(e)),
        }
    }

    /// Deletes a project. Its baselines go with it via ON DELETE CASCADE.
    pub async fn delete_project(&self, id: &str) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        debug!("Removed project {}", id);
        Ok(())
    }
}
