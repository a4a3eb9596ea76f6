use crate::role::{Capability, Role};

#[derive(Debug, thiserror::Error)]
pub enum RbacError {
    #[error("{role} is not allowed to {capability}")]
    Forbidden { role: Role, capability: Capability },

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("A user with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

pub type RbacResult<T> = Result<T, RbacError>;
