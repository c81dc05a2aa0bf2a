use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

use super::error_message;

/// Authentication identity created by the platform's auth service
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthIdentity {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("email already registered: {0}")]
    AlreadyRegistered(String),

    #[error("identity not found: {0}")]
    NotFound(String),

    #[error("auth service rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected auth service response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Admin operations on authentication identities
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn create_user(&self, email: &str, password: &str, metadata: Value) -> Result<AuthIdentity, IdentityError>;
    async fn delete_user(&self, id: Uuid) -> Result<(), IdentityError>;
    async fn update_password(&self, id: Uuid, password: &str) -> Result<(), IdentityError>;
    /// Create a one-time password recovery link for `email`
    async fn generate_recovery_link(&self, email: &str, redirect_to: &str) -> Result<String, IdentityError>;
}

/// GoTrue admin API (`/auth/v1/admin/*`) authenticated with the service role key
pub struct SupabaseAuthAdmin {
    http: reqwest::Client,
    base_url: String,
    service_role_key: String,
}

impl SupabaseAuthAdmin {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, service_role_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_role_key: service_role_key.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1/admin/{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
    }

    async fn rejected(response: reqwest::Response) -> (StatusCode, Value, String) {
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        let message = error_message(&body).unwrap_or_else(|| status.to_string());
        (status, body, message)
    }
}

fn is_duplicate_email(status: StatusCode, body: &Value, message: &str) -> bool {
    let code = body.get("error_code").and_then(Value::as_str).unwrap_or_default();
    matches!(status, StatusCode::UNPROCESSABLE_ENTITY | StatusCode::CONFLICT | StatusCode::BAD_REQUEST)
        && (code == "email_exists" || code == "user_already_exists" || message.contains("already been registered")
            || message.contains("already registered"))
}

#[async_trait]
impl IdentityProvider for SupabaseAuthAdmin {
    async fn create_user(&self, email: &str, password: &str, metadata: Value) -> Result<AuthIdentity, IdentityError> {
        let response = self
            .request(reqwest::Method::POST, "users")
            .json(&json!({
                "email": email,
                "password": password,
                "email_confirm": true,
                "user_metadata": metadata,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, body, message) = Self::rejected(response).await;
            if is_duplicate_email(status, &body, &message) {
                return Err(IdentityError::AlreadyRegistered(email.to_string()));
            }
            return Err(IdentityError::Rejected { status: status.as_u16(), message });
        }

        response
            .json::<AuthIdentity>()
            .await
            .map_err(|e| IdentityError::InvalidResponse(e.to_string()))
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), IdentityError> {
        let response = self
            .request(reqwest::Method::DELETE, &format!("users/{}", id))
            .send()
            .await?;

        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(IdentityError::NotFound(id.to_string())),
            _ => {
                let (status, _, message) = Self::rejected(response).await;
                Err(IdentityError::Rejected { status: status.as_u16(), message })
            }
        }
    }

    async fn update_password(&self, id: Uuid, password: &str) -> Result<(), IdentityError> {
        let response = self
            .request(reqwest::Method::PUT, &format!("users/{}", id))
            .json(&json!({ "password": password }))
            .send()
            .await?;

        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(IdentityError::NotFound(id.to_string())),
            _ => {
                let (status, _, message) = Self::rejected(response).await;
                Err(IdentityError::Rejected { status: status.as_u16(), message })
            }
        }
    }

    async fn generate_recovery_link(&self, email: &str, redirect_to: &str) -> Result<String, IdentityError> {
        let response = self
            .request(reqwest::Method::POST, "generate_link")
            .json(&json!({
                "type": "recovery",
                "email": email,
                "redirect_to": redirect_to,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, _, message) = Self::rejected(response).await;
            if status == StatusCode::NOT_FOUND {
                return Err(IdentityError::NotFound(email.to_string()));
            }
            return Err(IdentityError::Rejected { status: status.as_u16(), message });
        }

        let body: Value = response.json().await?;
        action_link(&body).ok_or_else(|| IdentityError::InvalidResponse("missing action_link".to_string()))
    }
}

/// Newer auth versions return `action_link` at the top level, older ones
/// under `properties`.
fn action_link(body: &Value) -> Option<String> {
    body.get("action_link")
        .or_else(|| body.pointer("/properties/action_link"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_email_detection() {
        let body = json!({ "error_code": "email_exists", "msg": "A user with this email address has already been registered" });
        assert!(is_duplicate_email(StatusCode::UNPROCESSABLE_ENTITY, &body, "A user with this email address has already been registered"));

        let legacy = json!({ "msg": "User already registered" });
        assert!(is_duplicate_email(StatusCode::BAD_REQUEST, &legacy, "User already registered"));

        let other = json!({ "msg": "Password should be at least 6 characters" });
        assert!(!is_duplicate_email(StatusCode::UNPROCESSABLE_ENTITY, &other, "Password should be at least 6 characters"));
    }

    #[test]
    fn action_link_in_either_position() {
        assert_eq!(action_link(&json!({ "action_link": "https://a" })).as_deref(), Some("https://a"));
        assert_eq!(
            action_link(&json!({ "properties": { "action_link": "https://b" } })).as_deref(),
            Some("https://b")
        );
        assert_eq!(action_link(&json!({})), None);
    }

    #[test]
    fn admin_urls_drop_trailing_slash() {
        let admin = SupabaseAuthAdmin::new(reqwest::Client::new(), "https://proj.example.co/", "key");
        assert_eq!(admin.url("users"), "https://proj.example.co/auth/v1/admin/users");
    }
}
