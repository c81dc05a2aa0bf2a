// handlers/protected/users/create.rs - POST /api/users handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde_json::{json, Value};

use crate::access::Caller;
use crate::database::models::Profile;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{CreateUserInput, UserService};
use crate::state::AppState;
use crate::validation::Fields;

/// POST /api/users - create auth identity and profile, optionally inviting
///
/// Responds 201 `{ user, invite?, warning? }`. A failed invite email is
/// reported through `warning`, never as an error.
pub async fn user_create(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Profile> {
    caller.require_admin()?;

    let Json(body) = body?;
    let input = CreateUserInput::from_fields(&Fields::from_body(&body)?)?;

    let created = UserService::new(&state).create(&caller, input).await?;

    let mut response = ApiResponse::created("user", created.profile);
    if let Some(invite) = created.invite {
        response = response.with("invite", json!(invite));
    }
    if let Some(warning) = created.warning {
        response = response.with("warning", warning);
    }
    Ok(response)
}
