// handlers/public/mod.rs - Public handlers (no authentication required)

pub mod health; // GET /health
pub mod invite_accept; // POST /api/invites/accept
pub mod root; // GET /

pub use health::health;
pub use invite_accept::invite_accept;
pub use root::root;

#[cfg(test)]
mod tests;
