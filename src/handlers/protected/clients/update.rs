// handlers/protected/clients/update.rs - PATCH /api/clients/:id handler

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};
use serde_json::Value;
use uuid::Uuid;

use crate::access::Caller;
use crate::database::models::Client;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation::Fields;

use super::client_patch_from_fields;

/// PATCH /api/clients/:id - super admins or the client's own admins.
/// `null` clears nullable fields.
pub async fn client_update(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Client> {
    let Path(id) = id?;
    caller.require_admin_of(Some(id))?;

    let Json(body) = body?;
    let patch = client_patch_from_fields(&Fields::from_body(&body)?)?;
    if patch.is_empty() {
        return Err(ApiError::bad_request("No fields to update"));
    }

    let client = state
        .store()
        .update_client(id, &patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Client not found"))?;

    tracing::info!("Client {} updated by {}", client.id, caller.email);
    Ok(ApiResponse::ok("client", client))
}
