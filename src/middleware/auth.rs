use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::{verify_session_token, Session};
use crate::error::ApiError;
use crate::state::AppState;

/// Session middleware: verifies the bearer token and injects [`Session`].
/// Every failure is reported as a bare 401 `{"error": "Unauthorized"}`.
pub async fn session_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).map_err(|reason| {
        tracing::debug!("Rejecting request without session: {}", reason);
        ApiError::unauthorized()
    })?;

    let session: Session = verify_session_token(&state.config().platform.jwt_secret, token).map_err(|e| {
        tracing::debug!("Rejecting session token: {}", e);
        ApiError::unauthorized()
    })?;

    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}

/// Extract token from `Authorization: Bearer <token>`
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .or_else(|| auth_str.strip_prefix("bearer "))
        .ok_or("Authorization header must use Bearer token format")?
        .trim();

    if token.is_empty() {
        return Err("Empty bearer token");
    }
    Ok(token)
}
