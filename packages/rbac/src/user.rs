// ABOUTME: User account types
// ABOUTME: Each account carries a single role from the capability table

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::role::Role;

/// An account holding exactly one role; capabilities derive from the
/// role table, never from the user record itself
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreateInput {
    pub email: String,
    pub name: String,
    pub role: Role,
    pub avatar_url: Option<String>,
}
