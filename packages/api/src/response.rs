// ABOUTME: Shared API response types and error handling
// ABOUTME: Provides consistent response format across all API endpoints

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
};
use serde::Serialize;
use tracing::error;

use planline_baselines::BaselineError;
use planline_projects::{ManagerError, StorageError};
use planline_rbac::RbacError;

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Domain errors surfaced by handlers, each mapped to an HTTP status
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Baseline(#[from] BaselineError),
    #[error(transparent)]
    Rbac(#[from] RbacError),
    #[error(transparent)]
    Manager(#[from] ManagerError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            ApiError::Baseline(e) => match e {
                BaselineError::NotFound(_) | BaselineError::ProjectNotFound(_) => {
                    (StatusCode::NOT_FOUND, self.to_string())
                }
                BaselineError::InvalidTransition { .. } | BaselineError::AlreadyCurrent(_) => {
                    (StatusCode::CONFLICT, self.to_string())
                }
                BaselineError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),
                BaselineError::Sqlx(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                ),
            },
            ApiError::Rbac(e) => match e {
                RbacError::Forbidden { .. } => (StatusCode::FORBIDDEN, self.to_string()),
                RbacError::UserNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
                RbacError::DuplicateEmail(_) => (StatusCode::CONFLICT, self.to_string()),
                RbacError::Sqlx(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                ),
            },
            ApiError::Manager(e) => match e {
                ManagerError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
                ManagerError::Storage(StorageError::NotFound) => {
                    (StatusCode::NOT_FOUND, self.to_string())
                }
                ManagerError::Storage(StorageError::DuplicateName(_))
                | ManagerError::Storage(StorageError::DuplicateCode(_)) => {
                    (StatusCode::CONFLICT, self.to_string())
                }
                ManagerError::Storage(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Storage error".to_string(),
                ),
            },
        };

        (status, ResponseJson(ApiResponse::<()>::error(message))).into_response()
    }
}

/// Map a result to 200 OK, or log the failure and return 500
pub fn ok_or_internal_error<T: Serialize, E: std::fmt::Display>(
    result: Result<T, E>,
    context: &str,
) -> axum::response::Response {
    match result {
        Ok(data) => (StatusCode::OK, ResponseJson(ApiResponse::success(data))).into_response(),
        Err(e) => {
            error!("{}: {}", context, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ResponseJson(ApiResponse::<()>::error(context.to_string())),
            )
                .into_response()
        }
    }
}

/// Map a result to 201 Created, or log the failure and return 500
pub fn created_or_internal_error<T: Serialize, E: std::fmt::Display>(
    result: Result<T, E>,
    context: &str,
) -> axum::response::Response {
    match result {
        Ok(data) => (
            StatusCode::CREATED,
            ResponseJson(ApiResponse::success(data)),
        )
            .into_response(),
        Err(e) => {
            error!("{}: {}", context, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ResponseJson(ApiResponse::<()>::error(context.to_string())),
            )
                .into_response()
        }
    }
}

/// Map an optional result to 200 OK, 404, or 500
pub fn ok_or_not_found<T: Serialize, E: std::fmt::Display>(
    result: Result<Option<T>, E>,
    not_found_message: &str,
) -> axum::response::Response {
    match result {
        Ok(Some(data)) => {
            (StatusCode::OK, ResponseJson(ApiResponse::success(data))).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            ResponseJson(ApiResponse::<()>::error(not_found_message.to_string())),
        )
            .into_response(),
        Err(e) => {
            error!("{}: {}", not_found_message, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ResponseJson(ApiResponse::<()>::error(
                    "Internal server error".to_string(),
                )),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planline_baselines::BaselineStatus;
    use planline_rbac::{Capability, Role};

    #[test]
    fn test_baseline_error_statuses() {
        let cases = [
            (
                ApiError::from(BaselineError::NotFound("b-1".to_string())),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::from(BaselineError::InvalidTransition {
                    from: BaselineStatus::Approved,
                    action: "submit",
                }),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::from(BaselineError::AlreadyCurrent("b-1".to_string())),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::from(BaselineError::InvalidInput("bad".to_string())),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_rbac_error_statuses() {
        let forbidden = ApiError::from(RbacError::Forbidden {
            role: Role::TeamMember,
            capability: Capability::ValidateBaseline,
        });
        assert_eq!(forbidden.into_response().status(), StatusCode::FORBIDDEN);

        let unknown = ApiError::from(RbacError::UserNotFound("u-1".to_string()));
        assert_eq!(unknown.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_manager_error_statuses() {
        let duplicate = ApiError::from(ManagerError::Storage(StorageError::DuplicateName(
            "Atlas".to_string(),
        )));
        assert_eq!(duplicate.into_response().status(), StatusCode::CONFLICT);

        let missing = ApiError::from(ManagerError::Storage(StorageError::NotFound));
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);
    }
}
