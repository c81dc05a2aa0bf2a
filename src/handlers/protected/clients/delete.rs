// handlers/protected/clients/delete.rs - DELETE /api/clients/:id handler

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Extension,
};
use uuid::Uuid;

use crate::access::Caller;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::ClientAssetService;
use crate::state::AppState;

/// DELETE /api/clients/:id - super admins only; stored assets go too
pub async fn client_delete(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<bool> {
    let Path(id) = id?;
    caller.require_super_admin()?;

    if !state.store().delete_client(id).await? {
        return Err(ApiError::not_found("Client not found"));
    }

    ClientAssetService::new(&state).remove_all(id).await;
    tracing::info!("Client {} deleted by {}", id, caller.email);

    Ok(ApiResponse::ok("success", true))
}
