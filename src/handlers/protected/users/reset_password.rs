// handlers/protected/users/reset_password.rs - POST /api/users/:id/reset-password handler

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Extension,
};
use uuid::Uuid;

use crate::access::Caller;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::InviteService;
use crate::state::AppState;

use super::{authorize_self_or_manage, load_profile};

/// POST /api/users/:id/reset-password - mail a recovery link
pub async fn user_reset_password(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<bool> {
    let Path(id) = id?;
    let target = load_profile(&state, id).await?;
    authorize_self_or_manage(&caller, &target)?;

    InviteService::new(&state).send_password_reset(&target).await?;
    tracing::info!("Password reset for {} requested by {}", target.id, caller.email);

    Ok(ApiResponse::ok("success", true))
}
