// handlers/protected/clients/list.rs - GET /api/clients handler

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension,
};

use crate::access::Caller;
use crate::database::models::Client;
use crate::database::ClientFilter;
use crate::handlers::ListQuery;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/clients - every client for super admins, otherwise the caller's own
pub async fn client_list(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Vec<Client>> {
    let Query(query) = query?;
    let page = query.page(&state.config().limits);

    let filter = if caller.is_super_admin() {
        ClientFilter { id: None, page }
    } else {
        match caller.client_id {
            Some(own) => ClientFilter { id: Some(own), page },
            None => return Ok(ApiResponse::ok("clients", Vec::new())),
        }
    };

    let clients = state.store().list_clients(&filter).await?;
    Ok(ApiResponse::ok("clients", clients))
}
