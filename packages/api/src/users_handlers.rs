// ABOUTME: HTTP request handlers for user accounts and role management
// ABOUTME: Serves the capability table so clients can gate their controls

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use planline_projects::DbState;
use planline_rbac::{Capability, CapabilityGrant, Role};

use crate::auth::require_actor;
use crate::response::{ok_or_internal_error, ApiError, ApiResponse};

/// Request body for changing a user's role
#[derive(Deserialize)]
pub struct UpdateRoleRequest {
    #[serde(rename = "actorId")]
    pub actor_id: String,
    pub role: Role,
}

/// A user's role together with its capability table row
#[derive(Serialize)]
pub struct UserCapabilitiesResponse {
    pub role: Role,
    pub capabilities: Vec<CapabilityGrant>,
}

/// List all users
pub async fn list_users(State(db): State<DbState>) -> impl IntoResponse {
    info!("Listing users");

    let result = db.user_storage.list_users().await;
    ok_or_internal_error(result, "Failed to list users")
}

/// Get a user by ID
pub async fn get_user(State(db): State<DbState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("Getting user: {}", id);

    match db.user_storage.get_user(&id).await {
        Ok(user) => (StatusCode::OK, ResponseJson(ApiResponse::success(user))).into_response(),
        Err(e) => {
            error!("Failed to get user {}: {}", id, e);
            ApiError::from(e).into_response()
        }
    }
}

/// Get the capability grants for a user's role
pub async fn get_user_capabilities(
    State(db): State<DbState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("Getting capabilities for user: {}", id);

    match db.user_storage.get_user(&id).await {
        Ok(user) => {
            let response = UserCapabilitiesResponse {
                role: user.role,
                capabilities: user.role.grants(),
            };
            (StatusCode::OK, ResponseJson(ApiResponse::success(response))).into_response()
        }
        Err(e) => {
            error!("Failed to get capabilities for {}: {}", id, e);
            ApiError::from(e).into_response()
        }
    }
}

/// Change a user's role
pub async fn update_user_role(
    State(db): State<DbState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateRoleRequest>,
) -> impl IntoResponse {
    info!("Updating role for user: {}", id);

    let actor = match require_actor(&db, &request.actor_id, Capability::ForceOverride).await {
        Ok(actor) => actor,
        Err(e) => return e.into_response(),
    };

    match db.user_storage.update_user_role(&id, request.role).await {
        Ok(user) => {
            info!("User {} role set to {} by {}", user.id, user.role, actor.email);
            (StatusCode::OK, ResponseJson(ApiResponse::success(user))).into_response()
        }
        Err(e) => {
            error!("Failed to update role for {}: {}", id, e);
            ApiError::from(e).into_response()
        }
    }
}
