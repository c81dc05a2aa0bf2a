use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::access::AccessLevel;

/// Application-level user record; `id` is the auth identity id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub access_level: Option<String>,
    pub client_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Effective tier, falling back to the legacy `role` column
    pub fn effective_access_level(&self) -> AccessLevel {
        AccessLevel::derive(self.access_level.as_deref(), self.role.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProfile {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub access_level: AccessLevel,
    pub client_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfilePatch {
    pub username: Option<Option<String>>,
    pub full_name: Option<Option<String>>,
    pub access_level: Option<AccessLevel>,
    pub client_id: Option<Option<Uuid>>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        *self == ProfilePatch::default()
    }

    pub fn apply(&self, profile: &mut Profile) {
        if let Some(v) = &self.username {
            profile.username = v.clone();
        }
        if let Some(v) = &self.full_name {
            profile.full_name = v.clone();
        }
        if let Some(level) = self.access_level {
            profile.access_level = Some(level.as_str().to_string());
            profile.role = Some(level.legacy_role().to_string());
        }
        if let Some(v) = self.client_id {
            profile.client_id = v;
        }
    }
}
