use axum::extract::State;
use axum::{response::Result, Json};
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

use planline_projects::DbState;

/// Liveness probe. Reports SQLite reachability instead of failing the
/// request when the database is down.
pub async fn health_check(State(db): State<DbState>) -> Result<Json<Value>> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();

    let database_reachable = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&db.pool)
        .await
        .is_ok();

    Ok(Json(json!({
        "status": if database_reachable { "healthy" } else { "unhealthy" },
        "database": if database_reachable { "reachable" } else { "unreachable" },
        "timestamp": timestamp,
        "version": env!("CARGO_PKG_VERSION"),
        "service": "planline-cli"
    })))
}
