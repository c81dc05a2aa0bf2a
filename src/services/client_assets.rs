//! Client branding assets (logo, background) kept in object storage under
//! `clients/<id>/`.

use uuid::Uuid;

use crate::config::LimitsConfig;
use crate::database::models::{Client, ClientPatch, NewClient};
use crate::error::ApiError;
use crate::state::AppState;

pub const UPLOAD_FAILED: &str = "Failed to upload client assets";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Logo,
    Background,
}

impl AssetKind {
    /// Multipart field name carrying this asset
    pub fn from_field(name: &str) -> Option<Self> {
        match name {
            "logo" => Some(AssetKind::Logo),
            "background" => Some(AssetKind::Background),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Logo => "logo",
            AssetKind::Background => "background",
        }
    }

    pub fn max_bytes(&self, limits: &LimitsConfig) -> usize {
        match self {
            AssetKind::Logo => limits.logo_max_bytes,
            AssetKind::Background => limits.background_max_bytes,
        }
    }

    pub fn allowed_types(&self) -> &'static [&'static str] {
        match self {
            AssetKind::Logo => &["image/png", "image/jpeg", "image/svg+xml", "image/webp"],
            AssetKind::Background => &["image/png", "image/jpeg", "image/webp"],
        }
    }
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/svg+xml" => "svg",
        "image/webp" => "webp",
        _ => "bin",
    }
}

/// A file taken from the multipart body, not yet checked
#[derive(Debug, Clone)]
pub struct AssetUpload {
    pub kind: AssetKind,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl AssetUpload {
    pub fn validate(&self, limits: &LimitsConfig) -> Result<(), ApiError> {
        let name = self.kind.as_str();
        let max = self.kind.max_bytes(limits);

        if self.bytes.is_empty() {
            return Err(ApiError::bad_request(format!("{} file is empty", name)));
        }

        if self.bytes.len() > max {
            return Err(ApiError::bad_request(format!(
                "{} must be {} MB or smaller",
                name,
                max / (1024 * 1024)
            )));
        }

        let allowed = self.kind.allowed_types();
        if !allowed.contains(&self.content_type.as_str()) {
            return Err(ApiError::bad_request(format!(
                "{} must be one of: {}",
                name,
                allowed.join(", ")
            )));
        }

        Ok(())
    }

    pub fn object_path(&self, client_id: Uuid) -> String {
        format!(
            "clients/{}/{}.{}",
            client_id,
            self.kind.as_str(),
            extension_for(&self.content_type)
        )
    }
}

pub struct ClientAssetService<'a> {
    state: &'a AppState,
}

impl<'a> ClientAssetService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Insert the client, upload its assets and attach their public URLs.
    /// Assets must already be validated. After the insert, any failure
    /// removes what was written and reports a single 500.
    pub async fn create_with_assets(&self, client: NewClient, assets: Vec<AssetUpload>) -> Result<Client, ApiError> {
        let store = self.state.store();
        let created = store.insert_client(&client).await?;

        if assets.is_empty() {
            return Ok(created);
        }

        let mut uploaded: Vec<String> = Vec::with_capacity(assets.len());
        let mut patch = ClientPatch::default();

        for asset in assets {
            let path = asset.object_path(created.id);
            let kind = asset.kind;
            if let Err(e) = self.state.storage().upload(&path, asset.bytes, &asset.content_type).await {
                tracing::error!("Upload of {} for client {} failed: {}", path, created.id, e);
                self.rollback(created.id, &uploaded).await;
                return Err(ApiError::internal_server_error(UPLOAD_FAILED));
            }

            let url = self.state.storage().public_url(&path);
            match kind {
                AssetKind::Logo => patch.logo_url = Some(Some(url)),
                AssetKind::Background => patch.background_url = Some(Some(url)),
            }
            uploaded.push(path);
        }

        match store.update_client(created.id, &patch).await {
            Ok(Some(client)) => {
                tracing::info!("Created client {} with {} asset(s)", client.id, uploaded.len());
                Ok(client)
            }
            Ok(None) => {
                tracing::error!("Client {} disappeared before its asset URLs were saved", created.id);
                self.rollback(created.id, &uploaded).await;
                Err(ApiError::internal_server_error(UPLOAD_FAILED))
            }
            Err(e) => {
                tracing::error!("Saving asset URLs for client {} failed: {}", created.id, e);
                self.rollback(created.id, &uploaded).await;
                Err(ApiError::internal_server_error(UPLOAD_FAILED))
            }
        }
    }

    async fn rollback(&self, client_id: Uuid, uploaded: &[String]) {
        if !uploaded.is_empty() {
            if let Err(e) = self.state.storage().remove(uploaded).await {
                tracing::error!("Cleanup of {:?} failed: {}", uploaded, e);
            }
        }
        if let Err(e) = self.state.store().delete_client(client_id).await {
            tracing::error!("Cleanup of client {} failed: {}", client_id, e);
        }
    }

    /// Remove everything stored under the client's prefix. Failures are logged.
    pub async fn remove_all(&self, client_id: Uuid) {
        let prefix = format!("clients/{}", client_id);
        let names = match self.state.storage().list(&prefix).await {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!("Listing assets of client {} failed: {}", client_id, e);
                return;
            }
        };

        if names.is_empty() {
            return;
        }

        let paths: Vec<String> = names.iter().map(|name| format!("{}/{}", prefix, name)).collect();
        if let Err(e) = self.state.storage().remove(&paths).await {
            tracing::warn!("Removing assets of client {} failed: {}", client_id, e);
        }
    }
}
