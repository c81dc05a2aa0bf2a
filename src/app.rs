//! Router assembly: public routes, session-protected `/api` routes and the
//! global layers.

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{protected, public};
use crate::middleware::{caller_middleware, session_middleware};
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let body_limit = state.config().server.max_request_size_bytes;
    let cors = cors_layer(&state.config().security);

    let router = Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http());

    let router = match cors {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/api/invites/accept", post(public::invite_accept))
}

/// Everything here runs `session_middleware` then `caller_middleware`
fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{auth, benchmarks, clients, users};

    Router::new()
        .route("/api/auth/whoami", get(auth::whoami))
        // Clients
        .route("/api/clients", get(clients::client_list).post(clients::client_create))
        .route("/api/clients/upload", post(clients::client_upload))
        .route(
            "/api/clients/:id",
            get(clients::client_show)
                .patch(clients::client_update)
                .delete(clients::client_delete),
        )
        // Users
        .route("/api/users", get(users::user_list).post(users::user_create))
        .route("/api/users/bulk", post(users::user_bulk_create))
        .route(
            "/api/users/:id",
            get(users::user_show)
                .patch(users::user_update)
                .delete(users::user_delete),
        )
        .route(
            "/api/users/:id/invite",
            post(users::user_invite_create).get(users::user_invite_show),
        )
        .route("/api/users/:id/reset-password", post(users::user_reset_password))
        // Benchmarks
        .route(
            "/api/benchmarks",
            get(benchmarks::benchmark_list).post(benchmarks::benchmark_create),
        )
        .route("/api/benchmarks/bulk", post(benchmarks::benchmark_bulk_create))
        .route(
            "/api/benchmarks/:id",
            get(benchmarks::benchmark_show)
                .patch(benchmarks::benchmark_update)
                .delete(benchmarks::benchmark_delete),
        )
        .route_layer(from_fn_with_state(state.clone(), caller_middleware))
        .route_layer(from_fn_with_state(state, session_middleware))
}

fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if security.cors_origins.iter().any(|o| o == "*") {
        return Some(layer.allow_origin(Any));
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    Some(layer.allow_origin(AllowOrigin::list(origins)))
}
