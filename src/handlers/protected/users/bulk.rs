// handlers/protected/users/bulk.rs - POST /api/users/bulk handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde_json::Value;

use crate::access::Caller;
use crate::error::ApiError;
use crate::handlers::bulk::{bulk_items, BulkReport};
use crate::services::{CreateUserInput, UserService};
use crate::state::AppState;
use crate::validation::Fields;

/// POST /api/users/bulk - `{ users: [...] }`, each item created independently
pub async fn user_bulk_create(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<BulkReport, ApiError> {
    caller.require_admin()?;

    let Json(body) = body?;
    let items = bulk_items(&body, "users", state.config().limits.bulk_users_max)?;

    let service = UserService::new(&state);
    let mut report = BulkReport::new();

    for (index, item) in items.iter().enumerate() {
        let email = item.get("email").cloned().unwrap_or(Value::Null);

        let outcome = match Fields::from_body(item).and_then(|fields| CreateUserInput::from_fields(&fields)) {
            Ok(input) => service.create(&caller, input).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(created) => report.succeed(index, ("email", email), "user", &created.profile),
            Err(e) => report.fail(index, ("email", email), &e),
        }
    }

    tracing::info!(
        "Bulk user create by {}: {} item(s) processed",
        caller.email,
        report.total()
    );
    Ok(report)
}
