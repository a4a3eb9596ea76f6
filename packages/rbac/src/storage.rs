// ABOUTME: User storage layer using SQLite
// ABOUTME: Handles CRUD operations for users and their role assignments

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{RbacError, RbacResult};
use crate::role::Role;
use crate::user::{User, UserCreateInput};

pub struct UserStorage {
    pool: SqlitePool,
}

impl UserStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_users(&self) -> RbacResult<Vec<User>> {
        debug!("Listing users");

        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    pub async fn get_user(&self, user_id: &str) -> RbacResult<User> {
        debug!("Fetching user: {}", user_id);

        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RbacError::UserNotFound(user_id.to_string()))
    }

    pub async fn get_user_by_email(&self, email: &str) -> RbacResult<User> {
        debug!("Fetching user by email: {}", email);

        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RbacError::UserNotFound(email.to_string()))
    }

    pub async fn create_user(&self, input: UserCreateInput) -> RbacResult<User> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, name, role, avatar_url, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&input.email)
        .bind(&input.name)
        .bind(input.role)
        .bind(&input.avatar_url)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => {
                info!("Created user '{}' with role {}", user.email, user.role);
                Ok(user)
            }
            Err(sqlx::Error::Database(db_err)) => {
                // SQLite UNIQUE constraint violation
                if let Some(code) = db_err.code() {
                    if code == "2067" || code == "1555" {
                        return Err(RbacError::DuplicateEmail(input.email));
                    }
                }
                Err(RbacError::Sqlx(sqlx::Error::Database(db_err)))
            }
            Err(e) => Err(RbacError::Sqlx(e)),
        }
    }

    pub async fn update_user_role(&self, user_id: &str, role: Role) -> RbacResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET role = ?, updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(role)
        .bind(Utc::now())
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RbacError::UserNotFound(user_id.to_string()))?;

        info!("Updated role of user '{}' to {}", user.email, user.role);
        Ok(user)
    }

    pub async fn delete_user(&self, user_id: &str) -> RbacResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RbacError::UserNotFound(user_id.to_string()));
        }

        info!("Deleted user {}", user_id);
        Ok(())
    }
}
