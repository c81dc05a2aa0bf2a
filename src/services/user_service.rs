use serde_json::json;
use uuid::Uuid;

use crate::access::{AccessLevel, AdminScope, Caller};
use crate::database::models::{NewProfile, Profile, UserInvite};
use crate::database::StoreError;
use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::{
    validate_email_format, validate_password, validate_username_format, Fields, MAX_NAME_LENGTH,
};

use super::invite_service::InviteService;

/// Validated body of a user creation request
#[derive(Debug, Clone, PartialEq)]
pub struct CreateUserInput {
    pub email: String,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub username: Option<String>,
    pub access_level: AccessLevel,
    pub client_id: Option<Uuid>,
    pub send_invite: bool,
}

impl CreateUserInput {
    pub fn from_fields(fields: &Fields<'_>) -> Result<Self, ApiError> {
        let email = fields
            .required_string("email", "Email is required", MAX_NAME_LENGTH)?
            .to_ascii_lowercase();
        validate_email_format(&email).map_err(ApiError::bad_request)?;

        let password = fields.optional_raw_string("password", 256)?;
        if let Some(password) = &password {
            validate_password(password).map_err(ApiError::bad_request)?;
        }

        let username = fields.optional_string("username", 50)?;
        if let Some(username) = &username {
            validate_username_format(username).map_err(ApiError::bad_request)?;
        }

        Ok(Self {
            email,
            password,
            full_name: fields.optional_string("full_name", MAX_NAME_LENGTH)?,
            username,
            access_level: access_level_field(fields)?.unwrap_or(AccessLevel::Member),
            client_id: fields.optional_uuid("client_id")?,
            send_invite: fields.optional_bool("send_invite")?.unwrap_or(false),
        })
    }
}

/// `access_level` (strict) or the legacy `role` string, if either is present
pub fn access_level_field(fields: &Fields<'_>) -> Result<Option<AccessLevel>, ApiError> {
    if let Some(raw) = fields.optional_string("access_level", MAX_NAME_LENGTH)? {
        return AccessLevel::parse(&raw).map(Some).ok_or_else(|| {
            ApiError::bad_request("access_level must be one of: member, client_admin, super_admin")
        });
    }
    Ok(fields
        .optional_string("role", MAX_NAME_LENGTH)?
        .map(|role| AccessLevel::from_legacy_role(&role)))
}

#[derive(Debug, Clone)]
pub struct CreatedUser {
    pub profile: Profile,
    pub invite: Option<UserInvite>,
    pub warning: Option<String>,
}

/// Map profile write failures onto client-facing errors
pub fn profile_write_error(err: StoreError) -> ApiError {
    if err.is_unique_on("username") {
        ApiError::conflict("Username is already taken")
    } else if err.is_unique_on("email") {
        ApiError::conflict("A user with this email already exists")
    } else if matches!(err, StoreError::ForeignKeyViolation(_)) {
        ApiError::bad_request("Client does not exist")
    } else {
        tracing::error!("Profile write failed: {}", err);
        ApiError::internal_server_error("Failed to save user profile")
    }
}

/// Account lifecycle spanning the auth identity and the profile row
pub struct UserService<'a> {
    state: &'a AppState,
}

impl<'a> UserService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Apply the caller's scope to a creation request, filling in the
    /// client for client admins.
    pub async fn authorize_create(&self, caller: &Caller, input: &mut CreateUserInput) -> Result<(), ApiError> {
        match caller.require_admin()? {
            AdminScope::AllClients => {}
            AdminScope::Client(own) => {
                if input.access_level == AccessLevel::SuperAdmin {
                    return Err(ApiError::forbidden("Client admins cannot create super admins"));
                }
                match input.client_id {
                    None => input.client_id = Some(own),
                    Some(requested) if requested != own => {
                        return Err(ApiError::forbidden("You do not have access to this client"));
                    }
                    Some(_) => {}
                }
            }
        }

        if input.access_level == AccessLevel::ClientAdmin && input.client_id.is_none() {
            return Err(ApiError::bad_request("client_id is required for client admins"));
        }

        if let Some(client_id) = input.client_id {
            if self.state.store().get_client(client_id).await?.is_none() {
                return Err(ApiError::bad_request("Client does not exist"));
            }
        }

        Ok(())
    }

    /// Create identity then profile. A failed profile insert deletes the
    /// identity again; that cleanup is logged, never surfaced.
    pub async fn create(&self, caller: &Caller, mut input: CreateUserInput) -> Result<CreatedUser, ApiError> {
        self.authorize_create(caller, &mut input).await?;

        let password = input
            .password
            .clone()
            .unwrap_or_else(|| format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple()));

        let metadata = json!({
            "full_name": input.full_name,
            "username": input.username,
        });

        let identity = self
            .state
            .identity()
            .create_user(&input.email, &password, metadata)
            .await?;

        let new_profile = NewProfile {
            id: identity.id,
            email: input.email.clone(),
            username: input.username.clone(),
            full_name: input.full_name.clone(),
            access_level: input.access_level,
            client_id: input.client_id,
        };

        let profile = match self.state.store().insert_profile(&new_profile).await {
            Ok(profile) => profile,
            Err(err) => {
                tracing::warn!(
                    "Profile insert for {} failed, rolling back auth identity {}: {}",
                    input.email,
                    identity.id,
                    err
                );
                if let Err(cleanup) = self.state.identity().delete_user(identity.id).await {
                    tracing::error!("Failed to roll back auth identity {}: {}", identity.id, cleanup);
                }
                return Err(profile_write_error(err));
            }
        };

        tracing::info!(
            "Created user {} ({}) with {} access by {}",
            profile.email,
            profile.id,
            input.access_level,
            caller.email
        );

        let mut created = CreatedUser {
            profile,
            invite: None,
            warning: None,
        };

        if input.send_invite {
            match InviteService::new(self.state).issue(Some(caller.id), &created.profile).await {
                Ok(issued) => {
                    created.invite = Some(issued.invite);
                    created.warning = issued.warning;
                }
                Err(e) => {
                    tracing::warn!("User {} created but invite failed: {}", created.profile.id, e);
                    created.warning = Some("User created but the invite could not be created".to_string());
                }
            }
        }

        Ok(created)
    }

    /// Delete the profile, then the auth identity (identity failure is logged)
    pub async fn delete(&self, profile: &Profile) -> Result<(), ApiError> {
        if !self.state.store().delete_profile(profile.id).await? {
            return Err(ApiError::not_found("User not found"));
        }

        if let Err(e) = self.state.identity().delete_user(profile.id).await {
            tracing::warn!("Profile {} deleted but auth identity removal failed: {}", profile.id, e);
        }

        tracing::info!("Deleted user {} ({})", profile.email, profile.id);
        Ok(())
    }
}
