// handlers/protected/benchmarks/delete.rs - DELETE /api/benchmarks/:id handler

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Extension,
};
use uuid::Uuid;

use crate::access::Caller;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

use super::load_benchmark;

/// DELETE /api/benchmarks/:id - admins of the owning client
pub async fn benchmark_delete(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<bool> {
    let Path(id) = id?;
    caller.require_admin()?;
    let existing = load_benchmark(&state, id).await?;
    caller.require_admin_of(Some(existing.client_id))?;

    if !state.store().delete_benchmark(id).await? {
        return Err(ApiError::not_found("Benchmark not found"));
    }

    tracing::info!("Benchmark {} deleted by {}", id, caller.email);
    Ok(ApiResponse::ok("success", true))
}
