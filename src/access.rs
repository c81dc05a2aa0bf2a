//! Authorization tiers and the per-request caller context.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::Profile;
use crate::error::ApiError;

/// Authorization tier of a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    Member,
    ClientAdmin,
    SuperAdmin,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Member => "member",
            AccessLevel::ClientAdmin => "client_admin",
            AccessLevel::SuperAdmin => "super_admin",
        }
    }

    /// Value written to the legacy `role` column alongside `access_level`
    pub fn legacy_role(&self) -> &'static str {
        match self {
            AccessLevel::Member => "user",
            AccessLevel::ClientAdmin => "client_admin",
            AccessLevel::SuperAdmin => "admin",
        }
    }

    /// Strict parse of the `access_level` domain
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "member" => Some(AccessLevel::Member),
            "client_admin" => Some(AccessLevel::ClientAdmin),
            "super_admin" => Some(AccessLevel::SuperAdmin),
            _ => None,
        }
    }

    /// Map a legacy `role` string onto a tier. Unknown roles are members.
    pub fn from_legacy_role(role: &str) -> Self {
        match role.trim().to_ascii_lowercase().as_str() {
            "super_admin" | "superadmin" | "admin" | "owner" => AccessLevel::SuperAdmin,
            "client_admin" | "clientadmin" | "manager" => AccessLevel::ClientAdmin,
            _ => AccessLevel::Member,
        }
    }

    /// A recognised `access_level` wins; otherwise fall back to `role`.
    pub fn derive(access_level: Option<&str>, role: Option<&str>) -> Self {
        access_level
            .and_then(Self::parse)
            .or_else(|| role.map(Self::from_legacy_role))
            .unwrap_or(AccessLevel::Member)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, AccessLevel::ClientAdmin | AccessLevel::SuperAdmin)
    }
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which clients an admin may act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminScope {
    AllClients,
    Client(Uuid),
}

impl AdminScope {
    pub fn allows(&self, client_id: Option<Uuid>) -> bool {
        match self {
            AdminScope::AllClients => true,
            AdminScope::Client(own) => client_id == Some(*own),
        }
    }

    /// Client filter to apply to list queries
    pub fn client_filter(&self) -> Option<Uuid> {
        match self {
            AdminScope::AllClients => None,
            AdminScope::Client(id) => Some(*id),
        }
    }
}

/// Authenticated caller, resolved from the session and the profile row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: Uuid,
    pub email: String,
    pub access_level: AccessLevel,
    pub client_id: Option<Uuid>,
}

impl Caller {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            email: profile.email.clone(),
            access_level: profile.effective_access_level(),
            client_id: profile.client_id,
        }
    }

    pub fn is_super_admin(&self) -> bool {
        self.access_level == AccessLevel::SuperAdmin
    }

    pub fn require_super_admin(&self) -> Result<(), ApiError> {
        if self.is_super_admin() {
            Ok(())
        } else {
            Err(ApiError::forbidden("Insufficient permissions"))
        }
    }

    /// Admin gate. Client admins must be assigned to a client to act at all.
    pub fn require_admin(&self) -> Result<AdminScope, ApiError> {
        match (self.access_level, self.client_id) {
            (AccessLevel::SuperAdmin, _) => Ok(AdminScope::AllClients),
            (AccessLevel::ClientAdmin, Some(client_id)) => Ok(AdminScope::Client(client_id)),
            (AccessLevel::ClientAdmin, None) => {
                Err(ApiError::forbidden("Client admin is not assigned to a client"))
            }
            (AccessLevel::Member, _) => Err(ApiError::forbidden("Insufficient permissions")),
        }
    }

    /// Client filter an admin lists with: `None` for all clients
    pub fn admin_scope(&self) -> Result<Option<Uuid>, ApiError> {
        self.require_admin().map(|scope| scope.client_filter())
    }

    /// Read access to data belonging to `client_id`
    pub fn can_access_client(&self, client_id: Uuid) -> bool {
        self.is_super_admin() || self.client_id == Some(client_id)
    }

    /// Admin access to a specific client's data
    pub fn require_admin_of(&self, client_id: Option<Uuid>) -> Result<AdminScope, ApiError> {
        let scope = self.require_admin()?;
        if scope.allows(client_id) {
            Ok(scope)
        } else {
            Err(ApiError::forbidden("You do not have access to this client"))
        }
    }
}
