// handlers/protected/users/list.rs - GET /api/users handler

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension,
};

use crate::access::Caller;
use crate::database::models::Profile;
use crate::database::ProfileFilter;
use crate::handlers::ListQuery;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/users - admins only; client admins are pinned to their client
pub async fn user_list(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Vec<Profile>> {
    let scope = caller.admin_scope()?;
    let Query(query) = query?;

    let filter = ProfileFilter {
        client_id: match scope {
            Some(own) => Some(own),
            None => query.client_id()?,
        },
        page: query.page(&state.config().limits),
    };

    let users = state.store().list_profiles(&filter).await?;
    Ok(ApiResponse::ok("users", users))
}
