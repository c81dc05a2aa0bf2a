// handlers/protected/auth/whoami.rs - GET /api/auth/whoami handler

use axum::{extract::State, Extension};

use crate::access::Caller;
use crate::database::models::Profile;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/auth/whoami - the caller's profile and effective access level
pub async fn whoami(State(state): State<AppState>, Extension(caller): Extension<Caller>) -> ApiResult<Profile> {
    let profile = state
        .store()
        .get_profile(caller.id)
        .await?
        .ok_or_else(|| ApiError::forbidden("User profile not found"))?;

    Ok(ApiResponse::ok("user", profile)
        .with("access_level", caller.access_level.as_str())
        .with("is_admin", caller.access_level.is_admin()))
}
