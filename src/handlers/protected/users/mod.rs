// handlers/protected/users/mod.rs - User account handlers

use uuid::Uuid;

use crate::access::{AccessLevel, AdminScope, Caller};
use crate::database::models::Profile;
use crate::error::ApiError;
use crate::state::AppState;

pub mod bulk; // POST /api/users/bulk
pub mod create; // POST /api/users
pub mod delete; // DELETE /api/users/:id
pub mod invite; // POST|GET /api/users/:id/invite
pub mod list; // GET /api/users
pub mod reset_password; // POST /api/users/:id/reset-password
pub mod show; // GET /api/users/:id
pub mod update; // PATCH /api/users/:id

pub use bulk::user_bulk_create;
pub use create::user_create;
pub use delete::user_delete;
pub use invite::{user_invite_create, user_invite_show};
pub use list::user_list;
pub use reset_password::user_reset_password;
pub use show::user_show;
pub use update::user_update;


pub(crate) async fn load_profile(state: &AppState, id: Uuid) -> Result<Profile, ApiError> {
    state
        .store()
        .get_profile(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))
}

/// Admin rights over `target`. Client admins never manage super admins.
pub(crate) fn authorize_manage(caller: &Caller, target: &Profile) -> Result<AdminScope, ApiError> {
    let scope = caller.require_admin_of(target.client_id)?;
    if target.effective_access_level() == AccessLevel::SuperAdmin && !caller.is_super_admin() {
        return Err(ApiError::forbidden("Insufficient permissions"));
    }
    Ok(scope)
}

/// Self, or an admin allowed to manage `target`
pub(crate) fn authorize_self_or_manage(caller: &Caller, target: &Profile) -> Result<(), ApiError> {
    if caller.id == target.id {
        return Ok(());
    }
    authorize_manage(caller, target).map(|_| ())
}
