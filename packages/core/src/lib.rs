// ABOUTME: Core types, constants, and utilities for Planline
// ABOUTME: Foundational package providing shared functionality across all Planline packages

pub mod constants;
pub mod types;
pub mod utils;
pub mod validation;

// Re-export main types
pub use types::{
    Priority, Project, ProjectCreateInput, ProjectStatus, ProjectUpdateInput,
};

// Re-export constants
pub use constants::{database_file, planline_dir, DB_FILE};

// Re-export utilities
pub use utils::{generate_project_id, suggest_project_code};

// Re-export validation
pub use validation::{
    is_valid_project_code, truncate, validate_project_data, validate_project_update,
    ValidationError,
};
