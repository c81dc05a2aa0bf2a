use async_trait::async_trait;
use serde_json::{json, Value};

use super::{EmailError, EmailMessage, EmailProvider};

const SENDGRID_ENDPOINT: &str = "https://api.sendgrid.com/v3/mail/send";

pub struct SendgridProvider {
    http: reqwest::Client,
    api_key: String,
}

impl SendgridProvider {
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self { http, api_key }
    }
}

/// SendGrid nests messages as `{ "errors": [{ "message": ... }] }`
fn sendgrid_error(body: &Value) -> Option<String> {
    body.pointer("/errors/0/message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[async_trait]
impl EmailProvider for SendgridProvider {
    fn name(&self) -> &'static str {
        "sendgrid"
    }

    async fn send(&self, from: &str, message: &EmailMessage) -> Result<(), EmailError> {
        let response = self
            .http
            .post(SENDGRID_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "personalizations": [{ "to": [{ "email": message.to }] }],
                "from": { "email": from },
                "subject": message.subject,
                "content": [
                    { "type": "text/plain", "value": message.text },
                    { "type": "text/html", "value": message.html },
                ],
            }))
            .send()
            .await?;

        // 202 Accepted on success
        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        Err(EmailError::Rejected {
            provider: self.name(),
            status: status.as_u16(),
            message: sendgrid_error(&body).unwrap_or_else(|| status.to_string()),
        })
    }
}
