use axum::{routing::get, Router};

use planline_projects::db::DbState;

pub mod health;

/// Assembles the full API surface over shared database state
pub fn create_router(db: DbState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_check))
        .nest("/api/projects", planline_api::create_projects_router())
        .nest("/api/baselines", planline_api::create_baselines_router())
        .nest("/api/users", planline_api::create_users_router())
        .with_state(db)
}
