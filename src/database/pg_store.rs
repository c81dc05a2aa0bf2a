use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::models::{
    Benchmark, BenchmarkPatch, Client, ClientPatch, InviteStatus, NewBenchmark, NewClient,
    NewInvite, NewProfile, Profile, ProfilePatch, UserInvite,
};
use super::store::{BenchmarkFilter, ClientFilter, Page, ProfileFilter, RecordStore, StoreError};

const CLIENT_COLUMNS: &str = "id, name, description, primary_color, secondary_color, logo_url, \
     background_url, is_active, created_at, updated_at";

const PROFILE_COLUMNS: &str =
    "id, email, username, full_name, role, access_level, client_id, created_at, updated_at";

const BENCHMARK_COLUMNS: &str = "id, client_id, name, description, category, value, unit, \
     target_value, percentile, period, created_by, created_at, updated_at";

const INVITE_COLUMNS: &str = "id, user_id, email, token_hash, status, invited_by, expires_at, \
     sent_at, accepted_at, created_at";

/// [`RecordStore`] backed by the hosted Postgres database
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Map SQLSTATE codes onto store errors handlers can branch on
fn classify(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        let constraint = db.constraint().unwrap_or("unknown").to_string();
        match db.code().as_deref() {
            Some("23505") => return StoreError::UniqueViolation(constraint),
            Some("23503") => return StoreError::ForeignKeyViolation(constraint),
            _ => {}
        }
    }
    match err {
        e @ (sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)) => {
            StoreError::Unavailable(e.to_string())
        }
        other => StoreError::Sqlx(other),
    }
}

fn push_page(qb: &mut QueryBuilder<'_, Postgres>, page: Page) {
    qb.push(" LIMIT ").push_bind(page.limit);
    qb.push(" OFFSET ").push_bind(page.offset);
}

#[async_trait]
impl RecordStore for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await.map_err(classify)?;
        Ok(())
    }

    async fn list_clients(&self, filter: &ClientFilter) -> Result<Vec<Client>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE true"));
        if let Some(id) = filter.id {
            qb.push(" AND id = ").push_bind(id);
        }
        qb.push(" ORDER BY name ASC");
        push_page(&mut qb, filter.page);

        qb.build_query_as::<Client>()
            .fetch_all(&self.pool)
            .await
            .map_err(classify)
    }

    async fn get_client(&self, id: Uuid) -> Result<Option<Client>, StoreError> {
        sqlx::query_as::<_, Client>(&format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)
    }

    async fn insert_client(&self, client: &NewClient) -> Result<Client, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO clients (name, description, primary_color, secondary_color, logo_url, background_url, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, true))
            RETURNING {CLIENT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Client>(&sql)
            .bind(&client.name)
            .bind(&client.description)
            .bind(&client.primary_color)
            .bind(&client.secondary_color)
            .bind(&client.logo_url)
            .bind(&client.background_url)
            .bind(client.is_active)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)
    }

    async fn update_client(&self, id: Uuid, patch: &ClientPatch) -> Result<Option<Client>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE clients SET updated_at = now()");
        if let Some(v) = &patch.name {
            qb.push(", name = ").push_bind(v.clone());
        }
        if let Some(v) = &patch.description {
            qb.push(", description = ").push_bind(v.clone());
        }
        if let Some(v) = &patch.primary_color {
            qb.push(", primary_color = ").push_bind(v.clone());
        }
        if let Some(v) = &patch.secondary_color {
            qb.push(", secondary_color = ").push_bind(v.clone());
        }
        if let Some(v) = &patch.logo_url {
            qb.push(", logo_url = ").push_bind(v.clone());
        }
        if let Some(v) = &patch.background_url {
            qb.push(", background_url = ").push_bind(v.clone());
        }
        if let Some(v) = patch.is_active {
            qb.push(", is_active = ").push_bind(v);
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(format!(" RETURNING {CLIENT_COLUMNS}"));

        qb.build_query_as::<Client>()
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)
    }

    async fn delete_client(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_profiles(&self, filter: &ProfileFilter) -> Result<Vec<Profile>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE true"));
        if let Some(client_id) = filter.client_id {
            qb.push(" AND client_id = ").push_bind(client_id);
        }
        qb.push(" ORDER BY created_at DESC");
        push_page(&mut qb, filter.page);

        qb.build_query_as::<Profile>()
            .fetch_all(&self.pool)
            .await
            .map_err(classify)
    }

    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        sqlx::query_as::<_, Profile>(&format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)
    }

    async fn insert_profile(&self, profile: &NewProfile) -> Result<Profile, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO profiles (id, email, username, full_name, role, access_level, client_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PROFILE_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Profile>(&sql)
            .bind(profile.id)
            .bind(&profile.email)
            .bind(&profile.username)
            .bind(&profile.full_name)
            .bind(profile.access_level.legacy_role())
            .bind(profile.access_level.as_str())
            .bind(profile.client_id)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)
    }

    async fn update_profile(&self, id: Uuid, patch: &ProfilePatch) -> Result<Option<Profile>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE profiles SET updated_at = now()");
        if let Some(v) = &patch.username {
            qb.push(", username = ").push_bind(v.clone());
        }
        if let Some(v) = &patch.full_name {
            qb.push(", full_name = ").push_bind(v.clone());
        }
        if let Some(level) = patch.access_level {
            qb.push(", access_level = ").push_bind(level.as_str());
            qb.push(", role = ").push_bind(level.legacy_role());
        }
        if let Some(v) = patch.client_id {
            qb.push(", client_id = ").push_bind(v);
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(format!(" RETURNING {PROFILE_COLUMNS}"));

        qb.build_query_as::<Profile>()
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)
    }

    async fn delete_profile(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_benchmarks(&self, filter: &BenchmarkFilter) -> Result<Vec<Benchmark>, StoreError> {
        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT {BENCHMARK_COLUMNS} FROM benchmarks WHERE true"));
        if let Some(client_id) = filter.client_id {
            qb.push(" AND client_id = ").push_bind(client_id);
        }
        if let Some(category) = &filter.category {
            qb.push(" AND category = ").push_bind(category.clone());
        }
        qb.push(" ORDER BY created_at DESC");
        push_page(&mut qb, filter.page);

        qb.build_query_as::<Benchmark>()
            .fetch_all(&self.pool)
            .await
            .map_err(classify)
    }

    async fn get_benchmark(&self, id: Uuid) -> Result<Option<Benchmark>, StoreError> {
        sqlx::query_as::<_, Benchmark>(&format!("SELECT {BENCHMARK_COLUMNS} FROM benchmarks WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)
    }

    async fn insert_benchmark(&self, benchmark: &NewBenchmark) -> Result<Benchmark, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO benchmarks
                (client_id, name, description, category, value, unit, target_value, percentile, period, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {BENCHMARK_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Benchmark>(&sql)
            .bind(benchmark.client_id)
            .bind(&benchmark.name)
            .bind(&benchmark.description)
            .bind(&benchmark.category)
            .bind(benchmark.value)
            .bind(&benchmark.unit)
            .bind(benchmark.target_value)
            .bind(benchmark.percentile)
            .bind(&benchmark.period)
            .bind(benchmark.created_by)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)
    }

    async fn update_benchmark(&self, id: Uuid, patch: &BenchmarkPatch) -> Result<Option<Benchmark>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE benchmarks SET updated_at = now()");
        if let Some(v) = &patch.name {
            qb.push(", name = ").push_bind(v.clone());
        }
        if let Some(v) = &patch.description {
            qb.push(", description = ").push_bind(v.clone());
        }
        if let Some(v) = &patch.category {
            qb.push(", category = ").push_bind(v.clone());
        }
        if let Some(v) = patch.value {
            qb.push(", value = ").push_bind(v);
        }
        if let Some(v) = &patch.unit {
            qb.push(", unit = ").push_bind(v.clone());
        }
        if let Some(v) = patch.target_value {
            qb.push(", target_value = ").push_bind(v);
        }
        if let Some(v) = patch.percentile {
            qb.push(", percentile = ").push_bind(v);
        }
        if let Some(v) = &patch.period {
            qb.push(", period = ").push_bind(v.clone());
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(format!(" RETURNING {BENCHMARK_COLUMNS}"));

        qb.build_query_as::<Benchmark>()
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)
    }

    async fn delete_benchmark(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM benchmarks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_invite(&self, invite: &NewInvite) -> Result<UserInvite, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO user_invites (user_id, email, token_hash, status, invited_by, expires_at)
            VALUES ($1, $2, $3, 'pending', $4, $5)
            RETURNING {INVITE_COLUMNS}
            "#
        );
        sqlx::query_as::<_, UserInvite>(&sql)
            .bind(invite.user_id)
            .bind(&invite.email)
            .bind(&invite.token_hash)
            .bind(invite.invited_by)
            .bind(invite.expires_at)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)
    }

    async fn latest_invite(&self, user_id: Uuid) -> Result<Option<UserInvite>, StoreError> {
        let sql = format!(
            "SELECT {INVITE_COLUMNS} FROM user_invites WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1"
        );
        sqlx::query_as::<_, UserInvite>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)
    }

    async fn find_invite_by_token_hash(&self, token_hash: &str) -> Result<Option<UserInvite>, StoreError> {
        sqlx::query_as::<_, UserInvite>(&format!("SELECT {INVITE_COLUMNS} FROM user_invites WHERE token_hash = $1"))
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)
    }

    async fn mark_invite_sent(&self, id: Uuid) -> Result<Option<UserInvite>, StoreError> {
        sqlx::query_as::<_, UserInvite>(&format!(
            "UPDATE user_invites SET sent_at = now() WHERE id = $1 RETURNING {INVITE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)
    }

    async fn set_invite_status(&self, id: Uuid, status: InviteStatus) -> Result<Option<UserInvite>, StoreError> {
        let sql = format!(
            r#"
            UPDATE user_invites
            SET status = $2,
                accepted_at = CASE WHEN $2 = 'accepted' THEN now() ELSE accepted_at END
            WHERE id = $1
            RETURNING {INVITE_COLUMNS}
            "#
        );
        sqlx::query_as::<_, UserInvite>(&sql)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)
    }

    async fn revoke_pending_invites(&self, user_id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE user_invites SET status = 'revoked' WHERE user_id = $1 AND status = 'pending'",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(classify)?;
        Ok(result.rows_affected())
    }
}
