// handlers/protected/users/show.rs - GET /api/users/:id handler

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Extension,
};
use uuid::Uuid;

use crate::access::{AccessLevel, Caller};
use crate::database::models::Profile;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

use super::load_profile;

/// GET /api/users/:id - self, super admins, or client admins of the same client
pub async fn user_show(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Profile> {
    let Path(id) = id?;
    let profile = load_profile(&state, id).await?;

    let allowed = caller.id == profile.id
        || caller.is_super_admin()
        || (caller.access_level == AccessLevel::ClientAdmin
            && caller.client_id.is_some()
            && caller.client_id == profile.client_id);

    if !allowed {
        return Err(ApiError::forbidden("Insufficient permissions"));
    }

    Ok(ApiResponse::ok("user", profile))
}
