// handlers/protected/clients/show.rs - GET /api/clients/:id handler

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Extension,
};
use uuid::Uuid;

use crate::access::Caller;
use crate::database::models::Client;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/clients/:id - super admins or members of the client
pub async fn client_show(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Client> {
    let Path(id) = id?;

    if !caller.can_access_client(id) {
        return Err(ApiError::forbidden("You do not have access to this client"));
    }

    let client = state
        .store()
        .get_client(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Client not found"))?;

    Ok(ApiResponse::ok("client", client))
}
