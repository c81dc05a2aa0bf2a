//! Clients for the hosted platform services the API delegates to.

pub mod email;
pub mod identity;
pub mod storage;

use std::time::Duration;

use serde_json::Value;

pub use email::{EmailMessage, Mailer};
pub use identity::{AuthIdentity, IdentityProvider, SupabaseAuthAdmin};
pub use storage::{ObjectStorage, SupabaseStorage};

/// Shared outbound HTTP client for platform and email provider calls
pub fn http_client(timeout_secs: u64) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("benchdesk-api/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Best-effort human message from a provider error body
pub(crate) fn error_message(body: &Value) -> Option<String> {
    ["msg", "message", "error_description", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}
