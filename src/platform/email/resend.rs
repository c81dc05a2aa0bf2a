use async_trait::async_trait;
use serde_json::{json, Value};

use super::{EmailError, EmailMessage, EmailProvider};
use crate::platform::error_message;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

pub struct ResendProvider {
    http: reqwest::Client,
    api_key: String,
}

impl ResendProvider {
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self { http, api_key }
    }
}

#[async_trait]
impl EmailProvider for ResendProvider {
    fn name(&self) -> &'static str {
        "resend"
    }

    async fn send(&self, from: &str, message: &EmailMessage) -> Result<(), EmailError> {
        let response = self
            .http
            .post(RESEND_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "from": from,
                "to": [message.to],
                "subject": message.subject,
                "html": message.html,
                "text": message.text,
            }))
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        Err(EmailError::Rejected {
            provider: self.name(),
            status: status.as_u16(),
            message: error_message(&body).unwrap_or_else(|| status.to_string()),
        })
    }
}
