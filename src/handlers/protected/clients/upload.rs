// handlers/protected/clients/upload.rs - POST /api/clients/upload handler

use axum::extract::{
    multipart::{Field, MultipartRejection},
    Multipart, State,
};
use axum::Extension;
use serde_json::{Map, Value};

use crate::access::Caller;
use crate::database::models::Client;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{AssetKind, AssetUpload, ClientAssetService};
use crate::state::AppState;
use crate::validation::Fields;

use super::new_client_from_fields;

/// POST /api/clients/upload - create a client with logo/background files
///
/// Multipart form: the client text fields plus optional `logo` and
/// `background` file parts. Everything is validated before any write.
pub async fn client_upload(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Client> {
    caller.require_super_admin()?;

    let mut multipart =
        multipart.map_err(|e| ApiError::bad_request(format!("Expected multipart/form-data body: {}", e)))?;

    let mut text_fields = Map::new();
    let mut assets: Vec<AssetUpload> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        match AssetKind::from_field(&name) {
            Some(kind) => {
                if let Some(asset) = read_asset(kind, field).await? {
                    if assets.iter().any(|a| a.kind == kind) {
                        return Err(ApiError::bad_request(format!("Only one {} file is allowed", kind.as_str())));
                    }
                    assets.push(asset);
                }
            }
            None => {
                let text = field.text().await.map_err(multipart_error)?;
                text_fields.insert(name.clone(), text_value(&name, text));
            }
        }
    }

    let new_client = new_client_from_fields(&Fields::new(&text_fields))?;
    let limits = &state.config().limits;
    for asset in &assets {
        asset.validate(limits)?;
    }

    let client = ClientAssetService::new(&state)
        .create_with_assets(new_client, assets)
        .await?;

    tracing::info!("Client {} ({}) uploaded by {}", client.name, client.id, caller.email);
    Ok(ApiResponse::created("client", client))
}

/// Empty file inputs are submitted as a part with no filename and no bytes
async fn read_asset(kind: AssetKind, field: Field<'_>) -> Result<Option<AssetUpload>, ApiError> {
    let has_filename = field.file_name().map_or(false, |f| !f.is_empty());
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_ascii_lowercase();
    let bytes = field.bytes().await.map_err(multipart_error)?;

    if bytes.is_empty() && !has_filename {
        return Ok(None);
    }

    Ok(Some(AssetUpload {
        kind,
        content_type,
        bytes: bytes.to_vec(),
    }))
}

/// Form values are strings; `is_active` is coerced so the JSON validators apply
fn text_value(name: &str, text: String) -> Value {
    if name == "is_active" {
        match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "on" => return Value::Bool(true),
            "false" | "0" | "off" => return Value::Bool(false),
            _ => {}
        }
    }
    Value::String(text)
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::bad_request(format!("Invalid multipart body: {}", e.body_text()))
}
