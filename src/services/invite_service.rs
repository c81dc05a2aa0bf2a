use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::database::models::{InviteStatus, NewInvite, Profile, UserInvite};
use crate::error::ApiError;
use crate::platform::email::templates::{invite_email, password_reset_email};
use crate::state::AppState;
use crate::validation::validate_password;

pub const INVITE_EMAIL_WARNING: &str = "Invite created but email could not be sent";

/// Random invite token handed out in the accept link (64 hex chars)
pub fn generate_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

/// Stored form of an invite token
pub fn hash_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// `{app_url}/<path>?token=<token>`, query-encoded
pub fn link_with_token(app_url: &str, path: &str, token: &str) -> String {
    let base = format!("{}/{}", app_url.trim_end_matches('/'), path);
    match url::Url::parse_with_params(&base, &[("token", token)]) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{}?token={}", base, token),
    }
}

#[derive(Debug, Clone)]
pub struct IssuedInvite {
    pub invite: UserInvite,
    pub warning: Option<String>,
}

pub struct InviteService<'a> {
    state: &'a AppState,
}

impl<'a> InviteService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Replace any pending invite for `profile` with a fresh one and mail it.
    /// A mail failure leaves the invite in place with `sent_at` unset.
    pub async fn issue(&self, invited_by: Option<Uuid>, profile: &Profile) -> Result<IssuedInvite, ApiError> {
        let store = self.state.store();
        let email_config = &self.state.config().email;

        let revoked = store.revoke_pending_invites(profile.id).await?;
        if revoked > 0 {
            tracing::debug!("Revoked {} pending invite(s) for {}", revoked, profile.id);
        }

        let token = generate_token();
        let new_invite = NewInvite {
            user_id: profile.id,
            email: profile.email.clone(),
            token_hash: hash_token(&token),
            invited_by,
            expires_at: Utc::now() + Duration::hours(email_config.invite_expiry_hours),
        };
        let invite = store.insert_invite(&new_invite).await?;

        let accept_url = link_with_token(&email_config.app_url, "invite/accept", &token);
        let message = invite_email(&profile.email, profile.full_name.as_deref(), &accept_url, invite.expires_at);

        match self.state.mailer().send(&message).await {
            Ok(_) => {
                let invite = store.mark_invite_sent(invite.id).await?.unwrap_or(invite);
                Ok(IssuedInvite { invite, warning: None })
            }
            Err(e) => {
                tracing::warn!("Invite {} for {} was not delivered: {}", invite.id, profile.email, e);
                Ok(IssuedInvite {
                    invite,
                    warning: Some(INVITE_EMAIL_WARNING.to_string()),
                })
            }
        }
    }

    /// Redeem an emailed token: set the account password and close the invite
    pub async fn accept(&self, token: &str, password: &str) -> Result<UserInvite, ApiError> {
        let store = self.state.store();

        let invite = store
            .find_invite_by_token_hash(&hash_token(token))
            .await?
            .ok_or_else(|| ApiError::not_found("Invite not found"))?;

        if invite.status() != Some(InviteStatus::Pending) {
            return Err(ApiError::conflict("Invite has already been used"));
        }

        if invite.is_expired(Utc::now()) {
            return Err(ApiError::bad_request("Invite has expired"));
        }

        validate_password(password).map_err(ApiError::bad_request)?;

        self.state.identity().update_password(invite.user_id, password).await?;

        let accepted = store
            .set_invite_status(invite.id, InviteStatus::Accepted)
            .await?
            .ok_or_else(|| ApiError::not_found("Invite not found"))?;

        tracing::info!("Invite {} accepted by {}", accepted.id, accepted.user_id);
        Ok(accepted)
    }

    /// Mail a recovery link for `profile`. Unlike invites, delivery failure
    /// fails the request.
    pub async fn send_password_reset(&self, profile: &Profile) -> Result<(), ApiError> {
        let redirect_to = format!("{}/reset-password", self.state.config().email.app_url.trim_end_matches('/'));

        let link = self
            .state
            .identity()
            .generate_recovery_link(&profile.email, &redirect_to)
            .await
            .map_err(|e| {
                tracing::error!("Recovery link for {} could not be generated: {}", profile.id, e);
                ApiError::internal_server_error("Failed to generate password reset link")
            })?;

        let message = password_reset_email(&profile.email, profile.full_name.as_deref(), &link);
        self.state.mailer().send(&message).await.map_err(|e| {
            tracing::error!("Password reset email for {} failed: {}", profile.id, e);
            ApiError::internal_server_error("Failed to send password reset email")
        })?;

        Ok(())
    }
}
