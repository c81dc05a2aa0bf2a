//! Transactional email with an ordered provider fallback chain.

pub mod resend;
pub mod sendgrid;
pub mod templates;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{EmailConfig, EmailProviderKind};

pub use resend::ResendProvider;
pub use sendgrid::SendgridProvider;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("{provider} rejected message ({status}): {message}")]
    Rejected {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("no email providers configured")]
    NoProviders,

    #[error("all email providers failed: {}", .0.join("; "))]
    AllProvidersFailed(Vec<String>),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// One delivery backend in the chain
#[async_trait]
pub trait EmailProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn send(&self, from: &str, message: &EmailMessage) -> Result<(), EmailError>;
}

/// Writes the message to the log instead of delivering it. Used as the last
/// link in development.
pub struct LogProvider;

#[async_trait]
impl EmailProvider for LogProvider {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn send(&self, from: &str, message: &EmailMessage) -> Result<(), EmailError> {
        tracing::info!(
            from = %from,
            to = %message.to,
            subject = %message.subject,
            "Email not delivered (log provider):\n{}",
            message.text
        );
        Ok(())
    }
}

/// Tries each provider in order and stops at the first success
pub struct Mailer {
    from: String,
    providers: Vec<Box<dyn EmailProvider>>,
}

impl Mailer {
    pub fn new(from: impl Into<String>, providers: Vec<Box<dyn EmailProvider>>) -> Self {
        Self {
            from: from.into(),
            providers,
        }
    }

    /// Build the chain from configuration, skipping providers without keys
    pub fn from_config(config: &EmailConfig, http: reqwest::Client) -> Self {
        let mut providers: Vec<Box<dyn EmailProvider>> = Vec::new();
        for kind in &config.providers {
            match kind {
                EmailProviderKind::Resend => match &config.resend_api_key {
                    Some(key) => providers.push(Box::new(ResendProvider::new(http.clone(), key.clone()))),
                    None => tracing::warn!("Resend listed in EMAIL_PROVIDERS but RESEND_API_KEY is not set"),
                },
                EmailProviderKind::Sendgrid => match &config.sendgrid_api_key {
                    Some(key) => providers.push(Box::new(SendgridProvider::new(http.clone(), key.clone()))),
                    None => tracing::warn!("SendGrid listed in EMAIL_PROVIDERS but SENDGRID_API_KEY is not set"),
                },
                EmailProviderKind::Log => providers.push(Box::new(LogProvider)),
            }
        }

        if providers.is_empty() {
            tracing::warn!("No email providers available; invite and reset emails will fail");
        }

        Self::new(config.from_address.clone(), providers)
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Returns the name of the provider that accepted the message
    pub async fn send(&self, message: &EmailMessage) -> Result<&'static str, EmailError> {
        if self.providers.is_empty() {
            return Err(EmailError::NoProviders);
        }

        let mut failures = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            match provider.send(&self.from, message).await {
                Ok(()) => {
                    tracing::info!("Email '{}' sent to {} via {}", message.subject, message.to, provider.name());
                    return Ok(provider.name());
                }
                Err(e) => {
                    tracing::warn!("Email provider {} failed: {}", provider.name(), e);
                    failures.push(format!("{}: {}", provider.name(), e));
                }
            }
        }

        Err(EmailError::AllProvidersFailed(failures))
    }
}
