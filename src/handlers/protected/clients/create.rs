// handlers/protected/clients/create.rs - POST /api/clients handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde_json::Value;

use crate::access::Caller;
use crate::database::models::Client;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation::Fields;

use super::new_client_from_fields;

/// POST /api/clients - super admins only
pub async fn client_create(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Client> {
    caller.require_super_admin()?;

    let Json(body) = body?;
    let new_client = new_client_from_fields(&Fields::from_body(&body)?)?;

    let client = state.store().insert_client(&new_client).await?;
    tracing::info!("Client {} ({}) created by {}", client.name, client.id, caller.email);

    Ok(ApiResponse::created("client", client))
}
