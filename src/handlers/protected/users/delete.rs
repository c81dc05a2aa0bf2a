// handlers/protected/users/delete.rs - DELETE /api/users/:id handler

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Extension,
};
use uuid::Uuid;

use crate::access::Caller;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::UserService;
use crate::state::AppState;

use super::{authorize_manage, load_profile};

/// DELETE /api/users/:id - admins in scope; never the caller themself
pub async fn user_delete(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<bool> {
    let Path(id) = id?;

    if id == caller.id {
        return Err(ApiError::bad_request("You cannot delete your own account"));
    }

    caller.require_admin()?;
    let target = load_profile(&state, id).await?;
    authorize_manage(&caller, &target)?;

    UserService::new(&state).delete(&target).await?;
    Ok(ApiResponse::ok("success", true))
}
