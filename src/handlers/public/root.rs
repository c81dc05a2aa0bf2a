// handlers/public/root.rs - GET / handler

use axum::response::Json;
use serde_json::{json, Value};

/// GET / - service banner and endpoint index
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "Benchdesk API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health (public)",
            "invites": "/api/invites/accept (public)",
            "auth": "/api/auth/whoami (protected)",
            "clients": "/api/clients[/:id], /api/clients/upload (protected)",
            "users": "/api/users[/:id], /api/users/bulk, /api/users/:id/invite, /api/users/:id/reset-password (protected)",
            "benchmarks": "/api/benchmarks[/:id], /api/benchmarks/bulk (protected)",
        }
    }))
}
