// handlers/protected/benchmarks/mod.rs - Benchmark metric handlers

use crate::access::{AdminScope, Caller};
use crate::database::models::{Benchmark, BenchmarkPatch, NewBenchmark, BENCHMARK_CATEGORIES};
use crate::database::StoreError;
use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::{check_range, Fields, MAX_NAME_LENGTH, MAX_TEXT_LENGTH};

pub mod bulk; // POST /api/benchmarks/bulk
pub mod create; // POST /api/benchmarks
pub mod delete; // DELETE /api/benchmarks/:id
pub mod list; // GET /api/benchmarks
pub mod show; // GET /api/benchmarks/:id
pub mod update; // PATCH /api/benchmarks/:id

pub use bulk::benchmark_bulk_create;
pub use create::benchmark_create;
pub use delete::benchmark_delete;
pub use list::benchmark_list;
pub use show::benchmark_show;
pub use update::benchmark_update;


const NAME_REQUIRED: &str = "Benchmark name is required";

fn check_percentile(value: Option<f64>) -> Result<(), ApiError> {
    match value {
        Some(p) => check_range("percentile", p, 0.0, 100.0),
        None => Ok(()),
    }
}

/// Validate one benchmark body and insert it for `caller`. Shared by the
/// single and bulk endpoints.
pub(crate) async fn create_benchmark(state: &AppState, caller: &Caller, fields: &Fields<'_>) -> Result<Benchmark, ApiError> {
    let scope = caller.require_admin()?;

    let name = fields.required_string("name", NAME_REQUIRED, MAX_NAME_LENGTH)?;
    let requested_client = fields.optional_uuid("client_id")?;
    let client_id = match scope {
        AdminScope::AllClients => {
            requested_client.ok_or_else(|| ApiError::bad_request("client_id is required"))?
        }
        AdminScope::Client(own) => match requested_client {
            Some(requested) if requested != own => {
                return Err(ApiError::forbidden("You do not have access to this client"));
            }
            _ => own,
        },
    };

    let value = fields.required_number("value")?;
    let percentile = fields.optional_number("percentile")?;
    check_percentile(percentile)?;

    let new_benchmark = NewBenchmark {
        client_id,
        name,
        description: fields.optional_string("description", MAX_TEXT_LENGTH)?,
        category: fields.optional_enum("category", BENCHMARK_CATEGORIES)?,
        value,
        unit: fields.optional_string("unit", MAX_NAME_LENGTH)?,
        target_value: fields.optional_number("target_value")?,
        percentile,
        period: fields.optional_string("period", MAX_NAME_LENGTH)?,
        created_by: Some(caller.id),
    };

    if state.store().get_client(client_id).await?.is_none() {
        return Err(ApiError::bad_request("Client does not exist"));
    }

    state.store().insert_benchmark(&new_benchmark).await.map_err(|e| match e {
        StoreError::ForeignKeyViolation(_) => ApiError::bad_request("Client does not exist"),
        other => other.into(),
    })
}

pub(crate) fn benchmark_patch_from_fields(fields: &Fields<'_>) -> Result<BenchmarkPatch, ApiError> {
    let name = match fields.patch_string("name", MAX_NAME_LENGTH)? {
        Some(Some(name)) => Some(name),
        Some(None) => return Err(ApiError::bad_request(NAME_REQUIRED)),
        None => None,
    };

    let value = match fields.patch_number("value")? {
        Some(Some(value)) => Some(value),
        Some(None) => return Err(ApiError::bad_request("value is required")),
        None => None,
    };

    let percentile = fields.patch_number("percentile")?;
    check_percentile(percentile.flatten())?;

    Ok(BenchmarkPatch {
        name,
        description: fields.patch_string("description", MAX_TEXT_LENGTH)?,
        category: fields.patch_enum("category", BENCHMARK_CATEGORIES)?,
        value,
        unit: fields.patch_string("unit", MAX_NAME_LENGTH)?,
        target_value: fields.patch_number("target_value")?,
        percentile,
        period: fields.patch_string("period", MAX_NAME_LENGTH)?,
    })
}

pub(crate) async fn load_benchmark(state: &AppState, id: uuid::Uuid) -> Result<Benchmark, ApiError> {
    state
        .store()
        .get_benchmark(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Benchmark not found"))
}
