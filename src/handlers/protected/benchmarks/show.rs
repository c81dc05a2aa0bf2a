// handlers/protected/benchmarks/show.rs - GET /api/benchmarks/:id handler

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Extension,
};
use uuid::Uuid;

use crate::access::Caller;
use crate::database::models::Benchmark;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

use super::load_benchmark;

/// GET /api/benchmarks/:id
pub async fn benchmark_show(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Benchmark> {
    let Path(id) = id?;
    let benchmark = load_benchmark(&state, id).await?;

    if !caller.can_access_client(benchmark.client_id) {
        return Err(ApiError::forbidden("You do not have access to this client"));
    }

    Ok(ApiResponse::ok("benchmark", benchmark))
}
