// ABOUTME: HTTP request handlers for project CRUD operations
// ABOUTME: Pagination and status filtering on list, capability gate on delete

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use serde::Deserialize;
use tracing::{error, info};

use planline_core::{ProjectCreateInput, ProjectStatus, ProjectUpdateInput};
use planline_projects::DbState;
use planline_rbac::Capability;

use crate::auth::require_actor;
use crate::pagination::{PaginatedResponse, PaginationParams};
use crate::response::{ok_or_internal_error, ApiError, ApiResponse};

/// Optional filters for the project list
#[derive(Debug, Deserialize)]
pub struct ProjectFilterQuery {
    pub status: Option<ProjectStatus>,
}

/// Request body for deleting a project
#[derive(Deserialize)]
pub struct DeleteProjectRequest {
    #[serde(rename = "actorId")]
    pub actor_id: String,
}

/// List projects, paginated and optionally filtered by status
pub async fn list_projects(
    State(db): State<DbState>,
    Query(filter): Query<ProjectFilterQuery>,
    Query(pagination): Query<PaginationParams>,
) -> impl IntoResponse {
    info!("Listing projects (page: {})", pagination.page());

    let result = db
        .project_manager
        .list_projects_paginated(filter.status, pagination.limit(), pagination.offset())
        .await
        .map(|(projects, total)| PaginatedResponse::new(projects, &pagination, total));

    ok_or_internal_error(result, "Failed to list projects")
}

/// Fetch one project by id
pub async fn get_project(State(db): State<DbState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("Getting project with ID: {}", id);

    match db.project_manager.get_project(&id).await {
        Ok(Some(project)) => {
            (StatusCode::OK, ResponseJson(ApiResponse::success(project))).into_response()
        }
        Ok(None) => {
            info!("Project not found: {}", id);
            (
                StatusCode::NOT_FOUND,
                ResponseJson(ApiResponse::<()>::error("Project not found".to_string())),
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to get project {}: {}", id, e);
            ApiError::from(e).into_response()
        }
    }
}

/// Create a new project
pub async fn create_project(
    State(db): State<DbState>,
    Json(input): Json<ProjectCreateInput>,
) -> impl IntoResponse {
    info!("Creating project: {}", input.name);

    match db.project_manager.create_project(input).await {
        Ok(project) => {
            info!("Created project: {} (ID: {})", project.name, project.id);
            (
                StatusCode::CREATED,
                ResponseJson(ApiResponse::success(project)),
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to create project: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// Apply a partial update to a project
pub async fn update_project(
    State(db): State<DbState>,
    Path(id): Path<String>,
    Json(updates): Json<ProjectUpdateInput>,
) -> impl IntoResponse {
    info!("Updating project: {}", id);

    match db.project_manager.update_project(&id, updates).await {
        Ok(project) => {
            info!("Updated project: {} (ID: {})", project.name, project.id);
            (StatusCode::OK, ResponseJson(ApiResponse::success(project))).into_response()
        }
        Err(e) => {
            error!("Failed to update project {}: {}", id, e);
            ApiError::from(e).into_response()
        }
    }
}

/// Delete a project and, via cascade, its baselines
pub async fn delete_project(
    State(db): State<DbState>,
    Path(id): Path<String>,
    Json(request): Json<DeleteProjectRequest>,
) -> impl IntoResponse {
    info!("Deleting project: {}", id);

    let actor = match require_actor(&db, &request.actor_id, Capability::DeleteProject).await {
        Ok(actor) => actor,
        Err(e) => return e.into_response(),
    };

    match db.project_manager.delete_project(&id).await {
        Ok(true) => {
            // The cascade removed the baselines behind the service's back
            db.baseline_service.invalidate_project(&id).await;
            info!("Project {} deleted by {}", id, actor.email);
            (
                StatusCode::OK,
                ResponseJson(ApiResponse::success("Project deleted successfully")),
            )
                .into_response()
        }
        Ok(false) => {
            info!("Project not found for deletion: {}", id);
            (
                StatusCode::NOT_FOUND,
                ResponseJson(ApiResponse::<()>::error("Project not found".to_string())),
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to delete project {}: {}", id, e);
            ApiError::from(e).into_response()
        }
    }
}
