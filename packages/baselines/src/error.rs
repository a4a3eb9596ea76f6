use crate::types::BaselineStatus;

#[derive(Debug, thiserror::Error)]
pub enum BaselineError {
    #[error("Baseline not found: {0}")]
    NotFound(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Cannot {action} a baseline in {from} state")]
    InvalidTransition {
        from: BaselineStatus,
        action: &'static str,
    },

    #[error("Baseline {0} is already the current baseline")]
    AlreadyCurrent(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

pub type BaselineResult<T> = Result<T, BaselineError>;
