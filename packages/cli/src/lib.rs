// ABOUTME: Server library for the planline binary
// ABOUTME: Wires configuration, database state, CORS, and the axum router

use axum::http::Method;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};

use planline_projects::db::DbState;

pub mod api;
pub mod config;
pub mod seed;

use config::Config;

/// Opens the configured database, honoring PLANLINE_DB
pub async fn open_database() -> anyhow::Result<DbState> {
    let config = Config::from_env()?;
    Ok(DbState::init_with_path(config.database_path).await?)
}

pub async fn run_server() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let db = DbState::init_with_path(config.database_path.clone()).await?;

    // The dashboard origin is the only one allowed by default
    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<axum::http::HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = api::create_router(db).layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    println!("✅ Planline API listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
