// handlers/protected/benchmarks/create.rs - POST /api/benchmarks handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde_json::Value;

use crate::access::Caller;
use crate::database::models::Benchmark;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation::Fields;

use super::create_benchmark;

/// POST /api/benchmarks - admins; client admins write to their own client
pub async fn benchmark_create(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Benchmark> {
    caller.require_admin()?;

    let Json(body) = body?;
    let benchmark = create_benchmark(&state, &caller, &Fields::from_body(&body)?).await?;

    tracing::info!("Benchmark {} created for client {}", benchmark.id, benchmark.client_id);
    Ok(ApiResponse::created("benchmark", benchmark))
}
