use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A tenant organisation row from `clients`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub logo_url: Option<String>,
    pub background_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewClient {
    pub name: String,
    pub description: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub logo_url: Option<String>,
    pub background_url: Option<String>,
    pub is_active: Option<bool>,
}

/// Partial update; the outer `Option` means "leave unchanged", the inner
/// `None` clears a nullable column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub primary_color: Option<Option<String>>,
    pub secondary_color: Option<Option<String>>,
    pub logo_url: Option<Option<String>>,
    pub background_url: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl ClientPatch {
    pub fn is_empty(&self) -> bool {
        *self == ClientPatch::default()
    }

    pub fn apply(&self, client: &mut Client) {
        if let Some(name) = &self.name {
            client.name = name.clone();
        }
        if let Some(v) = &self.description {
            client.description = v.clone();
        }
        if let Some(v) = &self.primary_color {
            client.primary_color = v.clone();
        }
        if let Some(v) = &self.secondary_color {
            client.secondary_color = v.clone();
        }
        if let Some(v) = &self.logo_url {
            client.logo_url = v.clone();
        }
        if let Some(v) = &self.background_url {
            client.background_url = v.clone();
        }
        if let Some(v) = self.is_active {
            client.is_active = v;
        }
    }
}
