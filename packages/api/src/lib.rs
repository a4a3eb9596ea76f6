// ABOUTME: HTTP API layer for Planline providing REST endpoints and routing
// ABOUTME: Integration layer that depends on all domain packages

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use planline_projects::DbState;

pub mod auth;
pub mod baselines_handlers;
pub mod pagination;
pub mod projects_handlers;
pub mod response;
pub mod users_handlers;

/// Creates the projects API router, including the per-project
/// baseline collection routes
pub fn create_projects_router() -> Router<DbState> {
    Router::new()
        .route("/", get(projects_handlers::list_projects))
        .route("/", post(projects_handlers::create_project))
        .route("/{id}", get(projects_handlers::get_project))
        .route("/{id}", put(projects_handlers::update_project))
        .route("/{id}", delete(projects_handlers::delete_project))
        .route("/{id}/baselines", get(baselines_handlers::list_baselines))
        .route("/{id}/baselines", post(baselines_handlers::create_baseline))
        .route(
            "/{id}/baselines/current",
            get(baselines_handlers::get_current_baseline),
        )
        .route(
            "/{id}/baselines/next-version",
            get(baselines_handlers::get_next_version),
        )
}

/// Creates the baselines API router for operations on a known baseline
pub fn create_baselines_router() -> Router<DbState> {
    Router::new()
        .route("/{id}", get(baselines_handlers::get_baseline))
        .route("/{id}/submit", post(baselines_handlers::submit_baseline))
        .route("/{id}/approve", post(baselines_handlers::approve_baseline))
        .route("/{id}/reject", post(baselines_handlers::reject_baseline))
        .route("/{id}/restore", post(baselines_handlers::restore_baseline))
}

/// Creates the users API router
pub fn create_users_router() -> Router<DbState> {
    Router::new()
        .route("/", get(users_handlers::list_users))
        .route("/{id}", get(users_handlers::get_user))
        .route(
            "/{id}/capabilities",
            get(users_handlers::get_user_capabilities),
        )
        .route("/{id}/role", put(users_handlers::update_user_role))
}
