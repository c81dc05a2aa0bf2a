// handlers/protected/mod.rs - Protected handlers (session required)
//
// Route Prefix: /api/*
// Middleware: session_middleware (bearer JWT) → caller_middleware (profile
// lookup). Every handler receives the resolved `Caller` as an extension.

pub mod auth; // GET /api/auth/whoami
pub mod benchmarks; // /api/benchmarks
pub mod clients; // /api/clients
pub mod users; // /api/users
