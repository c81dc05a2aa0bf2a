//! In-memory collaborators and a router harness for handler tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crate::access::AccessLevel;
use crate::auth::{issue_session_token, Claims};
use crate::config::AppConfig;
use crate::database::models::{
    Benchmark, BenchmarkPatch, Client, ClientPatch, InviteStatus, NewBenchmark, NewClient,
    NewInvite, NewProfile, Profile, ProfilePatch, UserInvite,
};
use crate::database::{BenchmarkFilter, ClientFilter, Page, ProfileFilter, RecordStore, StoreError};
use crate::platform::email::{EmailError, EmailMessage, EmailProvider, Mailer};
use crate::platform::identity::{AuthIdentity, IdentityError, IdentityProvider};
use crate::platform::storage::{ObjectStorage, StorageError};
use crate::state::AppState;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";

fn paginate<T: Clone>(rows: Vec<T>, page: Page) -> Vec<T> {
    rows.into_iter()
        .skip(page.offset.max(0) as usize)
        .take(page.limit.max(0) as usize)
        .collect()
}

#[derive(Default)]
struct Tables {
    clients: Vec<Client>,
    profiles: Vec<Profile>,
    benchmarks: Vec<Benchmark>,
    invites: Vec<UserInvite>,
}

/// [`RecordStore`] over vectors, enforcing the same uniqueness and foreign
/// keys as the real schema.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    pub unavailable: AtomicBool,
    pub fail_profile_insert: AtomicBool,
    pub fail_client_update: AtomicBool,
}

impl MemoryStore {
    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }

    fn tables(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    pub fn clients(&self) -> Vec<Client> {
        self.tables().clients.clone()
    }

    pub fn profiles(&self) -> Vec<Profile> {
        self.tables().profiles.clone()
    }

    pub fn benchmarks(&self) -> Vec<Benchmark> {
        self.tables().benchmarks.clone()
    }

    pub fn invites(&self) -> Vec<UserInvite> {
        self.tables().invites.clone()
    }

    pub fn profile(&self, id: Uuid) -> Option<Profile> {
        self.tables().profiles.iter().find(|p| p.id == id).cloned()
    }

    pub fn client(&self, id: Uuid) -> Option<Client> {
        self.tables().clients.iter().find(|c| c.id == id).cloned()
    }

    pub fn delete_profile_row(&self, id: Uuid) {
        self.tables().profiles.retain(|p| p.id != id);
    }

    pub fn put_invite(&self, invite: UserInvite) {
        self.tables().invites.push(invite);
    }

    fn build_client(client: &NewClient) -> Client {
        let now = Utc::now();
        Client {
            id: Uuid::new_v4(),
            name: client.name.clone(),
            description: client.description.clone(),
            primary_color: client.primary_color.clone(),
            secondary_color: client.secondary_color.clone(),
            logo_url: client.logo_url.clone(),
            background_url: client.background_url.clone(),
            is_active: client.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }

    async fn list_clients(&self, filter: &ClientFilter) -> Result<Vec<Client>, StoreError> {
        self.check()?;
        let mut rows: Vec<Client> = self
            .tables()
            .clients
            .iter()
            .filter(|c| filter.id.map_or(true, |id| c.id == id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(paginate(rows, filter.page))
    }

    async fn get_client(&self, id: Uuid) -> Result<Option<Client>, StoreError> {
        self.check()?;
        Ok(self.client(id))
    }

    async fn insert_client(&self, client: &NewClient) -> Result<Client, StoreError> {
        self.check()?;
        let row = Self::build_client(client);
        self.tables().clients.push(row.clone());
        Ok(row)
    }

    async fn update_client(&self, id: Uuid, patch: &ClientPatch) -> Result<Option<Client>, StoreError> {
        self.check()?;
        if self.fail_client_update.load(Ordering::SeqCst) {
            return Err(StoreError::Query("update rejected".to_string()));
        }
        let mut tables = self.tables();
        Ok(tables.clients.iter_mut().find(|c| c.id == id).map(|client| {
            patch.apply(client);
            client.updated_at = Utc::now();
            client.clone()
        }))
    }

    async fn delete_client(&self, id: Uuid) -> Result<bool, StoreError> {
        self.check()?;
        let mut tables = self.tables();
        let before = tables.clients.len();
        tables.clients.retain(|c| c.id != id);
        if tables.clients.len() == before {
            return Ok(false);
        }
        tables.benchmarks.retain(|b| b.client_id != id);
        for profile in tables.profiles.iter_mut().filter(|p| p.client_id == Some(id)) {
            profile.client_id = None;
        }
        Ok(true)
    }

    async fn list_profiles(&self, filter: &ProfileFilter) -> Result<Vec<Profile>, StoreError> {
        self.check()?;
        let rows = self
            .tables()
            .profiles
            .iter()
            .filter(|p| filter.client_id.map_or(true, |id| p.client_id == Some(id)))
            .cloned()
            .collect();
        Ok(paginate(rows, filter.page))
    }

    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        self.check()?;
        Ok(self.profile(id))
    }

    async fn insert_profile(&self, profile: &NewProfile) -> Result<Profile, StoreError> {
        self.check()?;
        if self.fail_profile_insert.load(Ordering::SeqCst) {
            return Err(StoreError::Query("insert rejected".to_string()));
        }

        let mut tables = self.tables();
        if tables.profiles.iter().any(|p| p.email == profile.email) {
            return Err(StoreError::UniqueViolation("profiles_email_key".to_string()));
        }
        if profile.username.is_some() && tables.profiles.iter().any(|p| p.username == profile.username) {
            return Err(StoreError::UniqueViolation("profiles_username_key".to_string()));
        }
        if let Some(client_id) = profile.client_id {
            if !tables.clients.iter().any(|c| c.id == client_id) {
                return Err(StoreError::ForeignKeyViolation("profiles_client_id_fkey".to_string()));
            }
        }

        let now = Utc::now();
        let row = Profile {
            id: profile.id,
            email: profile.email.clone(),
            username: profile.username.clone(),
            full_name: profile.full_name.clone(),
            role: Some(profile.access_level.legacy_role().to_string()),
            access_level: Some(profile.access_level.as_str().to_string()),
            client_id: profile.client_id,
            created_at: now,
            updated_at: now,
        };
        tables.profiles.push(row.clone());
        Ok(row)
    }

    async fn update_profile(&self, id: Uuid, patch: &ProfilePatch) -> Result<Option<Profile>, StoreError> {
        self.check()?;
        let mut tables = self.tables();
        if let Some(Some(username)) = &patch.username {
            if tables
                .profiles
                .iter()
                .any(|p| p.id != id && p.username.as_deref() == Some(username.as_str()))
            {
                return Err(StoreError::UniqueViolation("profiles_username_key".to_string()));
            }
        }
        if let Some(Some(client_id)) = patch.client_id {
            if !tables.clients.iter().any(|c| c.id == client_id) {
                return Err(StoreError::ForeignKeyViolation("profiles_client_id_fkey".to_string()));
            }
        }
        Ok(tables.profiles.iter_mut().find(|p| p.id == id).map(|profile| {
            patch.apply(profile);
            profile.updated_at = Utc::now();
            profile.clone()
        }))
    }

    async fn delete_profile(&self, id: Uuid) -> Result<bool, StoreError> {
        self.check()?;
        let mut tables = self.tables();
        let before = tables.profiles.len();
        tables.profiles.retain(|p| p.id != id);
        tables.invites.retain(|i| i.user_id != id);
        Ok(tables.profiles.len() != before)
    }

    async fn list_benchmarks(&self, filter: &BenchmarkFilter) -> Result<Vec<Benchmark>, StoreError> {
        self.check()?;
        let rows = self
            .tables()
            .benchmarks
            .iter()
            .filter(|b| filter.client_id.map_or(true, |id| b.client_id == id))
            .filter(|b| {
                filter
                    .category
                    .as_deref()
                    .map_or(true, |category| b.category.as_deref() == Some(category))
            })
            .cloned()
            .collect();
        Ok(paginate(rows, filter.page))
    }

    async fn get_benchmark(&self, id: Uuid) -> Result<Option<Benchmark>, StoreError> {
        self.check()?;
        Ok(self.tables().benchmarks.iter().find(|b| b.id == id).cloned())
    }

    async fn insert_benchmark(&self, benchmark: &NewBenchmark) -> Result<Benchmark, StoreError> {
        self.check()?;
        let mut tables = self.tables();
        if !tables.clients.iter().any(|c| c.id == benchmark.client_id) {
            return Err(StoreError::ForeignKeyViolation("benchmarks_client_id_fkey".to_string()));
        }
        let now = Utc::now();
        let row = Benchmark {
            id: Uuid::new_v4(),
            client_id: benchmark.client_id,
            name: benchmark.name.clone(),
            description: benchmark.description.clone(),
            category: benchmark.category.clone(),
            value: benchmark.value,
            unit: benchmark.unit.clone(),
            target_value: benchmark.target_value,
            percentile: benchmark.percentile,
            period: benchmark.period.clone(),
            created_by: benchmark.created_by,
            created_at: now,
            updated_at: now,
        };
        tables.benchmarks.push(row.clone());
        Ok(row)
    }

    async fn update_benchmark(&self, id: Uuid, patch: &BenchmarkPatch) -> Result<Option<Benchmark>, StoreError> {
        self.check()?;
        let mut tables = self.tables();
        Ok(tables.benchmarks.iter_mut().find(|b| b.id == id).map(|benchmark| {
            patch.apply(benchmark);
            benchmark.updated_at = Utc::now();
            benchmark.clone()
        }))
    }

    async fn delete_benchmark(&self, id: Uuid) -> Result<bool, StoreError> {
        self.check()?;
        let mut tables = self.tables();
        let before = tables.benchmarks.len();
        tables.benchmarks.retain(|b| b.id != id);
        Ok(tables.benchmarks.len() != before)
    }

    async fn insert_invite(&self, invite: &NewInvite) -> Result<UserInvite, StoreError> {
        self.check()?;
        let mut tables = self.tables();
        if tables.invites.iter().any(|i| i.token_hash == invite.token_hash) {
            return Err(StoreError::UniqueViolation("user_invites_token_hash_key".to_string()));
        }
        let row = UserInvite {
            id: Uuid::new_v4(),
            user_id: invite.user_id,
            email: invite.email.clone(),
            token_hash: invite.token_hash.clone(),
            status: InviteStatus::Pending.as_str().to_string(),
            invited_by: invite.invited_by,
            expires_at: invite.expires_at,
            sent_at: None,
            accepted_at: None,
            created_at: Utc::now(),
        };
        tables.invites.push(row.clone());
        Ok(row)
    }

    async fn latest_invite(&self, user_id: Uuid) -> Result<Option<UserInvite>, StoreError> {
        self.check()?;
        Ok(self.tables().invites.iter().rev().find(|i| i.user_id == user_id).cloned())
    }

    async fn find_invite_by_token_hash(&self, token_hash: &str) -> Result<Option<UserInvite>, StoreError> {
        self.check()?;
        Ok(self.tables().invites.iter().find(|i| i.token_hash == token_hash).cloned())
    }

    async fn mark_invite_sent(&self, id: Uuid) -> Result<Option<UserInvite>, StoreError> {
        self.check()?;
        let mut tables = self.tables();
        Ok(tables.invites.iter_mut().find(|i| i.id == id).map(|invite| {
            invite.sent_at = Some(Utc::now());
            invite.clone()
        }))
    }

    async fn set_invite_status(&self, id: Uuid, status: InviteStatus) -> Result<Option<UserInvite>, StoreError> {
        self.check()?;
        let mut tables = self.tables();
        Ok(tables.invites.iter_mut().find(|i| i.id == id).map(|invite| {
            invite.status = status.as_str().to_string();
            if status == InviteStatus::Accepted {
                invite.accepted_at = Some(Utc::now());
            }
            invite.clone()
        }))
    }

    async fn revoke_pending_invites(&self, user_id: Uuid) -> Result<u64, StoreError> {
        self.check()?;
        let mut tables = self.tables();
        let mut revoked = 0;
        for invite in tables
            .invites
            .iter_mut()
            .filter(|i| i.user_id == user_id && i.status == InviteStatus::Pending.as_str())
        {
            invite.status = InviteStatus::Revoked.as_str().to_string();
            revoked += 1;
        }
        Ok(revoked)
    }
}

/// Identity admin double: email → id, plus the passwords that were set
#[derive(Default)]
pub struct MemoryIdentity {
    users: Mutex<HashMap<Uuid, String>>,
    passwords: Mutex<HashMap<Uuid, String>>,
    deleted: Mutex<Vec<Uuid>>,
    pub fail_recovery_link: AtomicBool,
}

impl MemoryIdentity {
    pub fn register(&self, id: Uuid, email: &str) {
        self.users.lock().unwrap().insert(id, email.to_string());
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.users.lock().unwrap().contains_key(&id)
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn deleted(&self) -> Vec<Uuid> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn password_of(&self, id: Uuid) -> Option<String> {
        self.passwords.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentity {
    async fn create_user(&self, email: &str, password: &str, _metadata: Value) -> Result<AuthIdentity, IdentityError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|existing| existing == email) {
            return Err(IdentityError::AlreadyRegistered(email.to_string()));
        }
        let id = Uuid::new_v4();
        users.insert(id, email.to_string());
        self.passwords.lock().unwrap().insert(id, password.to_string());
        Ok(AuthIdentity {
            id,
            email: Some(email.to_string()),
        })
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), IdentityError> {
        if self.users.lock().unwrap().remove(&id).is_none() {
            return Err(IdentityError::NotFound(id.to_string()));
        }
        self.deleted.lock().unwrap().push(id);
        Ok(())
    }

    async fn update_password(&self, id: Uuid, password: &str) -> Result<(), IdentityError> {
        if !self.contains(id) {
            return Err(IdentityError::NotFound(id.to_string()));
        }
        self.passwords.lock().unwrap().insert(id, password.to_string());
        Ok(())
    }

    async fn generate_recovery_link(&self, email: &str, redirect_to: &str) -> Result<String, IdentityError> {
        if self.fail_recovery_link.load(Ordering::SeqCst) {
            return Err(IdentityError::Rejected {
                status: 500,
                message: "recovery disabled".to_string(),
            });
        }
        Ok(format!("https://auth.test/recover?email={}&redirect_to={}", email, redirect_to))
    }
}

/// Object storage double keyed by path
#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<String, (String, usize)>>,
    pub fail_uploads: AtomicBool,
}

impl MemoryStorage {
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
        paths.sort();
        paths
    }

    pub fn content_type(&self, path: &str) -> Option<String> {
        self.objects.lock().unwrap().get(path).map(|(ct, _)| ct.clone())
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::Rejected {
                operation: "upload",
                status: 500,
                message: "bucket unavailable".to_string(),
            });
        }
        self.objects
            .lock()
            .unwrap()
            .insert(path.to_string(), (content_type.to_string(), bytes.len()));
        Ok(())
    }

    async fn remove(&self, paths: &[String]) -> Result<(), StorageError> {
        let mut objects = self.objects.lock().unwrap();
        for path in paths {
            objects.remove(path);
        }
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let prefix = format!("{}/", prefix.trim_end_matches('/'));
        Ok(self
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter_map(|path| path.strip_prefix(&prefix))
            .filter(|rest| !rest.contains('/'))
            .map(str::to_string)
            .collect())
    }

    fn public_url(&self, path: &str) -> String {
        format!("https://storage.test/public/{}", path)
    }
}

/// Email provider that records or rejects every message
pub struct MemoryEmailProvider {
    name: &'static str,
    fail: bool,
    outbox: Arc<Mutex<Vec<EmailMessage>>>,
}

impl MemoryEmailProvider {
    pub fn working(name: &'static str) -> Self {
        Self {
            name,
            fail: false,
            outbox: Arc::default(),
        }
    }

    pub fn failing(name: &'static str) -> Self {
        Self {
            name,
            fail: true,
            outbox: Arc::default(),
        }
    }

    pub fn outbox(&self) -> Arc<Mutex<Vec<EmailMessage>>> {
        self.outbox.clone()
    }
}

#[async_trait]
impl EmailProvider for MemoryEmailProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn send(&self, _from: &str, message: &EmailMessage) -> Result<(), EmailError> {
        if self.fail {
            return Err(EmailError::Rejected {
                provider: self.name,
                status: 503,
                message: "provider down".to_string(),
            });
        }
        self.outbox.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// One part of a multipart request built by [`TestApp::multipart`]
pub enum FormPart<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        filename: &'a str,
        content_type: &'a str,
        bytes: Vec<u8>,
    },
}

const BOUNDARY: &str = "benchdesk-test-boundary";

fn multipart_body(parts: &[FormPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            FormPart::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n", name, value).as_bytes(),
                );
            }
            FormPart::File {
                name,
                filename,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, filename, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Router wired to in-memory collaborators
pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub identity: Arc<MemoryIdentity>,
    pub storage: Arc<MemoryStorage>,
    pub outbox: Arc<Mutex<Vec<EmailMessage>>>,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_mail_provider(MemoryEmailProvider::working("memory"))
    }

    /// Every email send fails
    pub fn with_failing_mail() -> Self {
        Self::with_mail_provider(MemoryEmailProvider::failing("memory"))
    }

    fn with_mail_provider(provider: MemoryEmailProvider) -> Self {
        let mut config = AppConfig::development();
        config.platform.jwt_secret = TEST_JWT_SECRET.to_string();

        let store = Arc::new(MemoryStore::default());
        let identity = Arc::new(MemoryIdentity::default());
        let storage = Arc::new(MemoryStorage::default());
        let outbox = provider.outbox();
        let mailer = Arc::new(Mailer::new(config.email.from_address.clone(), vec![Box::new(provider)]));

        let state = AppState::new(config, store.clone(), identity.clone(), storage.clone(), mailer);
        let router = crate::app::app(state.clone());

        Self {
            state,
            store,
            identity,
            storage,
            outbox,
            router,
        }
    }

    pub fn sent_emails(&self) -> Vec<EmailMessage> {
        self.outbox.lock().unwrap().clone()
    }

    pub fn seed_client(&self, name: &str) -> Client {
        let client = MemoryStore::build_client(&NewClient {
            name: name.to_string(),
            ..NewClient::default()
        });
        self.store.tables().clients.push(client.clone());
        client
    }

    /// Profile row plus matching auth identity
    pub fn seed_profile(&self, email: &str, level: AccessLevel, client_id: Option<Uuid>) -> Profile {
        let now = Utc::now();
        let profile = Profile {
            id: Uuid::new_v4(),
            email: email.to_string(),
            username: None,
            full_name: None,
            role: Some(level.legacy_role().to_string()),
            access_level: Some(level.as_str().to_string()),
            client_id,
            created_at: now,
            updated_at: now,
        };
        self.store.tables().profiles.push(profile.clone());
        self.identity.register(profile.id, email);
        profile
    }

    /// Insert a profile row as-is (legacy `role` only rows, for instance)
    pub fn seed_raw_profile(&self, profile: Profile) {
        self.identity.register(profile.id, &profile.email);
        self.store.tables().profiles.push(profile);
    }

    pub fn seed_benchmark(&self, client_id: Uuid, name: &str, category: Option<&str>) -> Benchmark {
        let now = Utc::now();
        let benchmark = Benchmark {
            id: Uuid::new_v4(),
            client_id,
            name: name.to_string(),
            description: None,
            category: category.map(str::to_string),
            value: 42.0,
            unit: None,
            target_value: None,
            percentile: None,
            period: None,
            created_by: None,
            created_at: now,
            updated_at: now,
        };
        self.store.tables().benchmarks.push(benchmark.clone());
        benchmark
    }

    pub fn token_for(&self, profile: &Profile) -> String {
        let claims = Claims::new(profile.id, Some(profile.email.clone()), Duration::hours(1));
        issue_session_token(TEST_JWT_SECRET, &claims).unwrap()
    }

    pub async fn request(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    pub async fn multipart(&self, uri: &str, token: &str, parts: &[FormPart<'_>]) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap();
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, body)
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
