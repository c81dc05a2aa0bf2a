pub mod auth;
pub mod caller;
pub mod response;

pub use auth::session_middleware;
pub use caller::caller_middleware;
pub use response::{ApiResponse, ApiResult};
