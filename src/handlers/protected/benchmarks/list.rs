// handlers/protected/benchmarks/list.rs - GET /api/benchmarks handler

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension,
};

use crate::access::Caller;
use crate::database::models::{Benchmark, BENCHMARK_CATEGORIES};
use crate::database::BenchmarkFilter;
use crate::error::ApiError;
use crate::handlers::ListQuery;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/benchmarks - filters: `client_id` (super admins), `category`
pub async fn benchmark_list(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Vec<Benchmark>> {
    let Query(query) = query?;

    let category = match query.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        Some(category) => {
            let category = category.to_ascii_lowercase();
            if !BENCHMARK_CATEGORIES.contains(&category.as_str()) {
                return Err(ApiError::bad_request(format!(
                    "category must be one of: {}",
                    BENCHMARK_CATEGORIES.join(", ")
                )));
            }
            Some(category)
        }
        None => None,
    };

    let client_id = if caller.is_super_admin() {
        query.client_id()?
    } else {
        match caller.client_id {
            Some(own) => Some(own),
            None => return Ok(ApiResponse::ok("benchmarks", Vec::new())),
        }
    };

    let filter = BenchmarkFilter {
        client_id,
        category,
        page: query.page(&state.config().limits),
    };

    let benchmarks = state.store().list_benchmarks(&filter).await?;
    Ok(ApiResponse::ok("benchmarks", benchmarks))
}
