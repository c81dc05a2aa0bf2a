// handlers/protected/benchmarks/update.rs - PATCH /api/benchmarks/:id handler

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
use crate::database::models::Benchmark;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation::Fields;

use super::{benchmark_patch_from_fields, load_benchmark};

/// PATCH /api/benchmarks/:id - admins of the owning client. The owning
/// client itself cannot change.
pub async fn benchmark_update(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Benchmark> {
    let Path(id) = id?;
    caller.require_admin()?;
    let existing = load_benchmark(&state, id).await?;
    caller.require_admin_of(Some(existing.client_id))?;

    let Json(body) = body?;
    let fields = Fields::from_body(&body)?;

    if let Some(client_id) = fields.patch_uuid("client_id")? {
        if client_id != Some(existing.client_id) {
            return Err(ApiError::bad_request("client_id cannot be changed"));
        }
    }

    let patch = benchmark_patch_from_fields(&fields)?;
    if patch.is_empty() {
        return Err(ApiError::bad_request("No fields to update"));
    }

    let benchmark = state
        .store()
        .update_benchmark(id, &patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Benchmark not found"))?;

    Ok(ApiResponse::ok("benchmark", benchmark))
}
