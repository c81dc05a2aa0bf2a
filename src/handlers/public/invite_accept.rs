// handlers/public/invite_accept.rs - POST /api/invites/accept handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;

use crate::database::models::UserInvite;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::InviteService;
use crate::state::AppState;
use crate::validation::Fields;

/// POST /api/invites/accept - redeem an invite token and set a password
///
/// Body: `{ "token": "...", "password": "..." }`
pub async fn invite_accept(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<UserInvite> {
    let Json(body) = body?;
    let fields = Fields::from_body(&body)?;

    let token = fields.required_string("token", "token is required", 256)?;
    let password = fields.required_raw_string("password", "password is required", 256)?;

    let invite = InviteService::new(&state).accept(&token, &password).await?;
    Ok(ApiResponse::ok("invite", invite))
}
