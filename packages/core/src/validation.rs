use crate::types::{ProjectCreateInput, ProjectUpdateInput};
use regex::Regex;
use std::sync::OnceLock;

const MAX_NAME_LENGTH: usize = 120;
const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// Validation errors for input data
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn code_regex() -> &'static Regex {
    static CODE_RE: OnceLock<Regex> = OnceLock::new();
    CODE_RE.get_or_init(|| Regex::new(r"^[A-Z][A-Z0-9]{1,9}$").expect("valid code regex"))
}

/// Checks whether a project code has the expected shape:
/// 2-10 characters, uppercase alphanumeric, starting with a letter.
pub fn is_valid_project_code(code: &str) -> bool {
    code_regex().is_match(code)
}

/// Validates project data for creation
pub fn validate_project_data(data: &ProjectCreateInput) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    // Validate required fields
    if data.name.trim().is_empty() {
        errors.push(ValidationError::new("name", "Project name is required"));
    } else if data.name.len() > MAX_NAME_LENGTH {
        errors.push(ValidationError::new(
            "name",
            format!("Project name exceeds {} characters", MAX_NAME_LENGTH),
        ));
    }

    // Validate code shape if provided
    if let Some(ref code) = data.code {
        if !is_valid_project_code(code) {
            errors.push(ValidationError::new(
                "code",
                format!("Project code must match [A-Z][A-Z0-9]{{1,9}}: {}", code),
            ));
        }
    }

    if let Some(ref description) = data.description {
        if description.len() > MAX_DESCRIPTION_LENGTH {
            errors.push(ValidationError::new(
                "description",
                format!("Description exceeds {} characters", MAX_DESCRIPTION_LENGTH),
            ));
        }
    }

    // Validate tags if present
    if let Some(ref tags) = data.tags {
        for tag in tags {
            if tag.trim().is_empty() {
                errors.push(ValidationError::new("tags", "Tags cannot be empty"));
                break;
            }
        }
    }

    errors
}

/// Validates project update data
pub fn validate_project_update(data: &ProjectUpdateInput) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    // Validate name if provided
    if let Some(ref name) = data.name {
        if name.trim().is_empty() {
            errors.push(ValidationError::new("name", "Project name cannot be empty"));
        } else if name.len() > MAX_NAME_LENGTH {
            errors.push(ValidationError::new(
                "name",
                format!("Project name exceeds {} characters", MAX_NAME_LENGTH),
            ));
        }
    }

    if let Some(ref description) = data.description {
        if description.len() > MAX_DESCRIPTION_LENGTH {
            errors.push(ValidationError::new(
                "description",
                format!("Description exceeds {} characters", MAX_DESCRIPTION_LENGTH),
            ));
        }
    }

    // Validate tags if present
    if let Some(ref tags) = data.tags {
        for tag in tags {
            if tag.trim().is_empty() {
                errors.push(ValidationError::new("tags", "Tags cannot be empty"));
                break;
            }
        }
    }

    errors
}

/// Truncates a string to a maximum length with ellipsis
pub fn truncate(text: &str, max_length: usize) -> String {
    if text.len() <= max_length {
        text.to_string()
    } else {
        format!("{}...", &text[..max_length.saturating_sub(3)])
    }
}
