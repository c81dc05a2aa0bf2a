use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::models::{
    Benchmark, BenchmarkPatch, Client, ClientPatch, InviteStatus, NewBenchmark, NewClient,
    NewInvite, NewProfile, Profile, ProfilePatch, UserInvite,
};

/// Errors surfaced by a [`RecordStore`]
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("query error: {0}")]
    Query(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl StoreError {
    /// True when a unique constraint whose name contains `needle` was violated
    pub fn is_unique_on(&self, needle: &str) -> bool {
        matches!(self, StoreError::UniqueViolation(constraint) if constraint.contains(needle))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self { limit: 100, offset: 0 }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClientFilter {
    pub id: Option<Uuid>,
    pub page: Page,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileFilter {
    pub client_id: Option<Uuid>,
    pub page: Page,
}

#[derive(Debug, Clone, Default)]
pub struct BenchmarkFilter {
    pub client_id: Option<Uuid>,
    pub category: Option<String>,
    pub page: Page,
}

/// Row-level access to the hosted relational store.
///
/// Uniqueness (profile email/username, invite token) and foreign keys are
/// enforced by the store itself and reported as [`StoreError`] variants.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;

    // clients
    async fn list_clients(&self, filter: &ClientFilter) -> Result<Vec<Client>, StoreError>;
    async fn get_client(&self, id: Uuid) -> Result<Option<Client>, StoreError>;
    async fn insert_client(&self, client: &NewClient) -> Result<Client, StoreError>;
    async fn update_client(&self, id: Uuid, patch: &ClientPatch) -> Result<Option<Client>, StoreError>;
    async fn delete_client(&self, id: Uuid) -> Result<bool, StoreError>;

    // profiles
    async fn list_profiles(&self, filter: &ProfileFilter) -> Result<Vec<Profile>, StoreError>;
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, StoreError>;
    async fn insert_profile(&self, profile: &NewProfile) -> Result<Profile, StoreError>;
    async fn update_profile(&self, id: Uuid, patch: &ProfilePatch) -> Result<Option<Profile>, StoreError>;
    async fn delete_profile(&self, id: Uuid) -> Result<bool, StoreError>;

    // benchmarks
    async fn list_benchmarks(&self, filter: &BenchmarkFilter) -> Result<Vec<Benchmark>, StoreError>;
    async fn get_benchmark(&self, id: Uuid) -> Result<Option<Benchmark>, StoreError>;
    async fn insert_benchmark(&self, benchmark: &NewBenchmark) -> Result<Benchmark, StoreError>;
    async fn update_benchmark(&self, id: Uuid, patch: &BenchmarkPatch) -> Result<Option<Benchmark>, StoreError>;
    async fn delete_benchmark(&self, id: Uuid) -> Result<bool, StoreError>;

    // invites
    async fn insert_invite(&self, invite: &NewInvite) -> Result<UserInvite, StoreError>;
    async fn latest_invite(&self, user_id: Uuid) -> Result<Option<UserInvite>, StoreError>;
    async fn find_invite_by_token_hash(&self, token_hash: &str) -> Result<Option<UserInvite>, StoreError>;
    async fn mark_invite_sent(&self, id: Uuid) -> Result<Option<UserInvite>, StoreError>;
    async fn set_invite_status(&self, id: Uuid, status: InviteStatus) -> Result<Option<UserInvite>, StoreError>;
    /// Revoke every pending invite of a user, returning how many changed
    async fn revoke_pending_invites(&self, user_id: Uuid) -> Result<u64, StoreError>;
}
