// ABOUTME: Actor resolution and capability checks for mutating endpoints
// ABOUTME: Request bodies carry an explicit actorId; there is no session layer

use planline_projects::DbState;
use planline_rbac::{Capability, User};

use crate::response::ApiError;

/// Resolves the acting user by id and checks the capability table.
///
/// An unknown actor surfaces as 404 and a denied capability as 403
/// through the `ApiError` status mapping.
pub async fn require_actor(
    db: &DbState,
    actor_id: &str,
    capability: Capability,
) -> Result<User, ApiError> {
    let actor = db.user_storage.get_user(actor_id).await?;
    actor.role.require(capability)?;
    Ok(actor)
}
