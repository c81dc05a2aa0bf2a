// handlers/protected/users/update.rs - PATCH /api/users/:id handler

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};
use serde_json::Value;
use uuid::Uuid;

use crate::access::{AccessLevel, AdminScope, Caller};
use crate::database::models::{Profile, ProfilePatch};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::user_service::{access_level_field, profile_write_error};
use crate::state::AppState;
use crate::validation::{validate_username_format, Fields, MAX_NAME_LENGTH};

use super::{authorize_manage, load_profile};

/// PATCH /api/users/:id
///
/// Anyone may edit their own `full_name` and `username`. `access_level`
/// (or legacy `role`) and `client_id` need admin rights over the target.
pub async fn user_update(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Profile> {
    let Path(id) = id?;
    let target = load_profile(&state, id).await?;
    let is_self = caller.id == target.id;

    let Json(body) = body?;
    let fields = Fields::from_body(&body)?;

    let username = fields.patch_string("username", 50)?;
    if let Some(Some(username)) = &username {
        validate_username_format(username).map_err(ApiError::bad_request)?;
    }

    let patch = ProfilePatch {
        username,
        full_name: fields.patch_string("full_name", MAX_NAME_LENGTH)?,
        access_level: access_level_field(&fields)?,
        client_id: fields.patch_uuid("client_id")?,
    };

    let privileged = patch.access_level.is_some() || patch.client_id.is_some();

    if !is_self || privileged {
        let scope = if is_self {
            if patch.access_level.is_some() {
                return Err(ApiError::forbidden("You cannot change your own access level"));
            }
            caller.require_admin()?
        } else {
            authorize_manage(&caller, &target)?
        };

        if let AdminScope::Client(own) = scope {
            if patch.access_level == Some(AccessLevel::SuperAdmin) {
                return Err(ApiError::forbidden("Client admins cannot grant super admin access"));
            }
            if let Some(client_id) = patch.client_id {
                if client_id != Some(own) {
                    return Err(ApiError::forbidden("You do not have access to this client"));
                }
            }
        }
    }

    if patch.is_empty() {
        return Err(ApiError::bad_request("No fields to update"));
    }

    let final_level = patch.access_level.unwrap_or_else(|| target.effective_access_level());
    let final_client = patch.client_id.unwrap_or(target.client_id);
    if final_level == AccessLevel::ClientAdmin && final_client.is_none() {
        return Err(ApiError::bad_request("client_id is required for client admins"));
    }

    if let Some(Some(client_id)) = patch.client_id {
        if state.store().get_client(client_id).await?.is_none() {
            return Err(ApiError::bad_request("Client does not exist"));
        }
    }

    let profile = state
        .store()
        .update_profile(id, &patch)
        .await
        .map_err(profile_write_error)?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    tracing::info!("User {} updated by {}", profile.id, caller.email);
    Ok(ApiResponse::ok("user", profile))
}
