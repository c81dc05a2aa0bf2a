use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use super::error_message;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage rejected {operation} ({status}): {message}")]
    Rejected {
        operation: &'static str,
        status: u16,
        message: String,
    },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// A single bucket in the hosted object store
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError>;
    async fn remove(&self, paths: &[String]) -> Result<(), StorageError>;
    /// Object names directly under `prefix`
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
    fn public_url(&self, path: &str) -> String;
}

/// Storage API (`/storage/v1/object/*`) for one public bucket
pub struct SupabaseStorage {
    http: reqwest::Client,
    base_url: String,
    service_role_key: String,
    bucket: String,
}

#[derive(Debug, Deserialize)]
struct ListedObject {
    name: String,
}

impl SupabaseStorage {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        service_role_key: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_role_key: service_role_key.into(),
            bucket: bucket.into(),
        }
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
    }

    async fn check(operation: &'static str, response: reqwest::Response) -> Result<reqwest::Response, StorageError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        Err(StorageError::Rejected {
            operation,
            status: status.as_u16(),
            message: error_message(&body).unwrap_or_else(|| status.to_string()),
        })
    }
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        let url = format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path);
        let response = self
            .request(reqwest::Method::POST, url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await?;
        Self::check("upload", response).await?;
        Ok(())
    }

    async fn remove(&self, paths: &[String]) -> Result<(), StorageError> {
        if paths.is_empty() {
            return Ok(());
        }
        let url = format!("{}/storage/v1/object/{}", self.base_url, self.bucket);
        let response = self
            .request(reqwest::Method::DELETE, url)
            .json(&json!({ "prefixes": paths }))
            .send()
            .await?;
        Self::check("remove", response).await?;
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let url = format!("{}/storage/v1/object/list/{}", self.base_url, self.bucket);
        let response = self
            .request(reqwest::Method::POST, url)
            .json(&json!({ "prefix": prefix, "limit": 100, "offset": 0 }))
            .send()
            .await?;
        let objects: Vec<ListedObject> = Self::check("list", response).await?.json().await?;
        Ok(objects.into_iter().map(|o| o.name).collect())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/public/{}/{}", self.base_url, self.bucket, path)
    }
}
