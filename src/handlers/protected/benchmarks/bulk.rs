// handlers/protected/benchmarks/bulk.rs - POST /api/benchmarks/bulk handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde_json::Value;

use crate::access::Caller;
use crate::error::ApiError;
use crate::handlers::bulk::{bulk_items, BulkReport};
use crate::state::AppState;
use crate::validation::Fields;

use super::create_benchmark;

/// POST /api/benchmarks/bulk - `{ benchmarks: [...] }`
pub async fn benchmark_bulk_create(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<BulkReport, ApiError> {
    caller.require_admin()?;

    let Json(body) = body?;
    let items = bulk_items(&body, "benchmarks", state.config().limits.bulk_benchmarks_max)?;

    let mut report = BulkReport::new();
    for (index, item) in items.iter().enumerate() {
        let name = item.get("name").cloned().unwrap_or(Value::Null);

        let outcome = match Fields::from_body(item) {
            Ok(fields) => create_benchmark(&state, &caller, &fields).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(benchmark) => report.succeed(index, ("name", name), "benchmark", &benchmark),
            Err(e) => report.fail(index, ("name", name), &e),
        }
    }

    Ok(report)
}
