// handlers/protected/users/invite.rs - POST|GET /api/users/:id/invite handlers

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Extension,
};
use uuid::Uuid;

use crate::access::Caller;
use crate::database::models::UserInvite;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::InviteService;
use crate::state::AppState;

use super::{authorize_manage, authorize_self_or_manage, load_profile};

/// POST /api/users/:id/invite - issue a fresh invite, revoking pending ones
pub async fn user_invite_create(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<UserInvite> {
    let Path(id) = id?;
    caller.require_admin()?;
    let target = load_profile(&state, id).await?;
    authorize_manage(&caller, &target)?;

    let issued = InviteService::new(&state).issue(Some(caller.id), &target).await?;

    let response = ApiResponse::created("invite", issued.invite);
    Ok(match issued.warning {
        Some(warning) => response.with("warning", warning),
        None => response,
    })
}

/// GET /api/users/:id/invite - latest invite or `null`
pub async fn user_invite_show(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Option<UserInvite>> {
    let Path(id) = id?;
    let target = load_profile(&state, id).await?;
    authorize_self_or_manage(&caller, &target)?;

    let invite = state.store().latest_invite(target.id).await?;
    Ok(ApiResponse::ok("invite", invite))
}
