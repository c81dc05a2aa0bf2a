// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (session + caller profile)

pub mod bulk;
pub mod params;
pub mod protected;
pub mod public;

pub use bulk::BulkReport;
pub use params::ListQuery;
