// ABOUTME: Shared helpers for CLI commands
// ABOUTME: Date formatting, status coloring, and acting-user resolution for --as

use colored::*;

use planline_baselines::BaselineStatus;
use planline_projects::db::DbState;
use planline_rbac::{Capability, User};

/// Resolves the acting user from an email and checks the capability,
/// mirroring what the API does for actorId payloads
pub async fn resolve_actor(
    db: &DbState,
    email: &str,
    capability: Capability,
) -> anyhow::Result<User> {
    let user = db.user_storage.get_user_by_email(email).await?;
    user.role.require(capability)?;
    Ok(user)
}

pub fn format_date(date_str: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(date_str) {
        Ok(dt) => dt.format("%-m/%-d/%Y").to_string(),
        Err(_) => date_str.to_string(),
    }
}

pub fn colored_status(status: BaselineStatus) -> ColoredString {
    match status {
        BaselineStatus::Draft => "draft".dimmed(),
        BaselineStatus::Submitted => "submitted".yellow(),
        BaselineStatus::Approved => "approved".green(),
        BaselineStatus::Rejected => "rejected".red(),
    }
}
