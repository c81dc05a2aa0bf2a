use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::access::Caller;
use crate::auth::Session;
use crate::error::ApiError;
use crate::state::AppState;

/// Middleware that resolves the session's profile row into a [`Caller`].
/// Runs after [`super::session_middleware`].
pub async fn caller_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session = request
        .extensions()
        .get::<Session>()
        .cloned()
        .ok_or_else(ApiError::unauthorized)?;

    let profile = state
        .store()
        .get_profile(session.user_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load profile {}: {}", session.user_id, e);
            ApiError::internal_server_error("Failed to load user profile")
        })?
        .ok_or_else(|| {
            tracing::warn!("Session for {} has no profile row", session.user_id);
            ApiError::forbidden("User profile not found")
        })?;

    let caller = Caller::from_profile(&profile);
    tracing::debug!(
        "Caller resolved: {} ({}) client={:?}",
        caller.email,
        caller.access_level,
        caller.client_id
    );

    request.extensions_mut().insert(caller);

    Ok(next.run(request).await)
}
