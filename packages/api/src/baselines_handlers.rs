// ABOUTME: HTTP request handlers for baseline workflow operations
// ABOUTME: Draft creation plus the submit/approve/reject/restore transitions

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use planline_baselines::{Baseline, BaselineCreateInput, FieldChange};
use planline_projects::DbState;
use planline_rbac::Capability;

use crate::auth::require_actor;
use crate::pagination::{PaginatedResponse, PaginationParams};
use crate::response::{ok_or_internal_error, ok_or_not_found, ApiError, ApiResponse};

/// Request body for creating a draft baseline
#[derive(Deserialize)]
pub struct CreateBaselineRequest {
    #[serde(rename = "actorId")]
    pub actor_id: String,
    pub label: Option<String>,
    pub description: Option<String>,
    pub changes: Option<Vec<FieldChange>>,
}

/// Request body for submit, approve, and restore
#[derive(Deserialize)]
pub struct TransitionRequest {
    #[serde(rename = "actorId")]
    pub actor_id: String,
}

/// Request body for rejecting a submitted baseline
#[derive(Deserialize)]
pub struct RejectBaselineRequest {
    #[serde(rename = "actorId")]
    pub actor_id: String,
    pub reason: String,
}

/// Response for the next-version endpoint
#[derive(Serialize)]
pub struct NextVersionResponse {
    #[serde(rename = "nextVersion")]
    pub next_version: String,
}

/// List a project's baselines, newest version first
pub async fn list_baselines(
    State(db): State<DbState>,
    Path(project_id): Path<String>,
    Query(pagination): Query<PaginationParams>,
) -> impl IntoResponse {
    info!(
        "Listing baselines for project: {} (page: {})",
        project_id,
        pagination.page()
    );

    // The service caches the full per-project list; pages are cut from it
    let result = db
        .baseline_service
        .list_baselines(&project_id)
        .await
        .map(|baselines| {
            let total = baselines.len() as i64;
            let page: Vec<Baseline> = baselines
                .iter()
                .skip(pagination.offset() as usize)
                .take(pagination.limit() as usize)
                .cloned()
                .collect();
            PaginatedResponse::new(page, &pagination, total)
        });

    ok_or_internal_error(result, "Failed to list baselines")
}

/// Get a single baseline by ID
pub async fn get_baseline(State(db): State<DbState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("Getting baseline: {}", id);

    match db.baseline_service.get_baseline(&id).await {
        Ok(baseline) => {
            (StatusCode::OK, ResponseJson(ApiResponse::success(baseline))).into_response()
        }
        Err(e) => {
            error!("Failed to get baseline {}: {}", id, e);
            ApiError::from(e).into_response()
        }
    }
}

/// Get the project's baseline of record, if any
pub async fn get_current_baseline(
    State(db): State<DbState>,
    Path(project_id): Path<String>,
) -> impl IntoResponse {
    info!("Getting current baseline for project: {}", project_id);

    let result = db.baseline_service.current_baseline(&project_id).await;
    ok_or_not_found(result, "No current baseline")
}

/// Get the canonical label the next baseline would carry
pub async fn get_next_version(
    State(db): State<DbState>,
    Path(project_id): Path<String>,
) -> impl IntoResponse {
    info!("Getting next version label for project: {}", project_id);

    let result = db
        .baseline_service
        .next_version_label(&project_id)
        .await
        .map(|next_version| NextVersionResponse { next_version });

    ok_or_internal_error(result, "Failed to get next version label")
}

/// Create a draft baseline for a project
pub async fn create_baseline(
    State(db): State<DbState>,
    Path(project_id): Path<String>,
    Json(request): Json<CreateBaselineRequest>,
) -> impl IntoResponse {
    info!("Creating baseline for project: {}", project_id);

    let actor = match require_actor(&db, &request.actor_id, Capability::EditScope).await {
        Ok(actor) => actor,
        Err(e) => return e.into_response(),
    };

    let input = BaselineCreateInput {
        label: request.label,
        description: request.description,
        changes: request.changes,
    };

    match db.baseline_service.create_baseline(&project_id, input).await {
        Ok(baseline) => {
            info!(
                "Created baseline {} ({}) by {}",
                baseline.label, baseline.id, actor.email
            );
            (
                StatusCode::CREATED,
                ResponseJson(ApiResponse::success(baseline)),
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to create baseline for {}: {}", project_id, e);
            ApiError::from(e).into_response()
        }
    }
}

/// Submit a draft baseline for validation
pub async fn submit_baseline(
    State(db): State<DbState>,
    Path(id): Path<String>,
    Json(request): Json<TransitionRequest>,
) -> impl IntoResponse {
    info!("Submitting baseline: {}", id);

    let actor = match require_actor(&db, &request.actor_id, Capability::EditScope).await {
        Ok(actor) => actor,
        Err(e) => return e.into_response(),
    };

    match db.baseline_service.submit_baseline(&id, &actor.id).await {
        Ok(baseline) => {
            info!("Baseline {} submitted by {}", baseline.id, actor.email);
            (StatusCode::OK, ResponseJson(ApiResponse::success(baseline))).into_response()
        }
        Err(e) => {
            error!("Failed to submit baseline {}: {}", id, e);
            ApiError::from(e).into_response()
        }
    }
}

/// Approve a submitted baseline, making it the baseline of record
pub async fn approve_baseline(
    State(db): State<DbState>,
    Path(id): Path<String>,
    Json(request): Json<TransitionRequest>,
) -> impl IntoResponse {
    info!("Approving baseline: {}", id);

    let actor = match require_actor(&db, &request.actor_id, Capability::ValidateBaseline).await {
        Ok(actor) => actor,
        Err(e) => return e.into_response(),
    };

    match db.baseline_service.approve_baseline(&id, &actor.id).await {
        Ok(baseline) => {
            info!("Baseline {} approved by {}", baseline.id, actor.email);
            (StatusCode::OK, ResponseJson(ApiResponse::success(baseline))).into_response()
        }
        Err(e) => {
            error!("Failed to approve baseline {}: {}", id, e);
            ApiError::from(e).into_response()
        }
    }
}

/// Reject a submitted baseline with a reason
pub async fn reject_baseline(
    State(db): State<DbState>,
    Path(id): Path<String>,
    Json(request): Json<RejectBaselineRequest>,
) -> impl IntoResponse {
    info!("Rejecting baseline: {}", id);

    let actor = match require_actor(&db, &request.actor_id, Capability::ValidateBaseline).await {
        Ok(actor) => actor,
        Err(e) => return e.into_response(),
    };

    match db
        .baseline_service
        .reject_baseline(&id, &actor.id, &request.reason)
        .await
    {
        Ok(baseline) => {
            info!("Baseline {} rejected by {}", baseline.id, actor.email);
            (StatusCode::OK, ResponseJson(ApiResponse::success(baseline))).into_response()
        }
        Err(e) => {
            error!("Failed to reject baseline {}: {}", id, e);
            ApiError::from(e).into_response()
        }
    }
}

/// Re-lock a superseded approved baseline as the baseline of record
pub async fn restore_baseline(
    State(db): State<DbState>,
    Path(id): Path<String>,
    Json(request): Json<TransitionRequest>,
) -> impl IntoResponse {
    info!("Restoring baseline: {}", id);

    let actor = match require_actor(&db, &request.actor_id, Capability::RestoreBaseline).await {
        Ok(actor) => actor,
        Err(e) => return e.into_response(),
    };

    match db.baseline_service.restore_baseline(&id, &actor.id).await {
        Ok(baseline) => {
            info!("Baseline {} restored by {}", baseline.id, actor.email);
            (StatusCode::OK, ResponseJson(ApiResponse::success(baseline))).into_response()
        }
        Err(e) => {
            error!("Failed to restore baseline {}: {}", id, e);
            ApiError::from(e).into_response()
        }
    }
}
