// handlers/protected/clients/mod.rs - Client (tenant organisation) handlers

use crate::database::models::{ClientPatch, NewClient};
use crate::error::ApiError;
use crate::validation::{Fields, MAX_NAME_LENGTH, MAX_TEXT_LENGTH};

pub mod create; // POST /api/clients
pub mod delete; // DELETE /api/clients/:id
pub mod list; // GET /api/clients
pub mod show; // GET /api/clients/:id
pub mod update; // PATCH /api/clients/:id
pub mod upload; // POST /api/clients/upload

pub use create::client_create;
pub use delete::client_delete;
pub use list::client_list;
pub use show::client_show;
pub use update::client_update;
pub use upload::client_upload;


const NAME_REQUIRED: &str = "Client name is required";

/// Creation fields shared by the JSON and multipart endpoints
pub(crate) fn new_client_from_fields(fields: &Fields<'_>) -> Result<NewClient, ApiError> {
    Ok(NewClient {
        name: fields.required_string("name", NAME_REQUIRED, MAX_NAME_LENGTH)?,
        description: fields.optional_string("description", MAX_TEXT_LENGTH)?,
        primary_color: fields.optional_hex_color("primary_color")?,
        secondary_color: fields.optional_hex_color("secondary_color")?,
        logo_url: fields.optional_string("logo_url", MAX_TEXT_LENGTH)?,
        background_url: fields.optional_string("background_url", MAX_TEXT_LENGTH)?,
        is_active: fields.optional_bool("is_active")?,
    })
}

pub(crate) fn client_patch_from_fields(fields: &Fields<'_>) -> Result<ClientPatch, ApiError> {
    let name = match fields.patch_string("name", MAX_NAME_LENGTH)? {
        Some(Some(name)) => Some(name),
        Some(None) => return Err(ApiError::bad_request(NAME_REQUIRED)),
        None => None,
    };

    Ok(ClientPatch {
        name,
        description: fields.patch_string("description", MAX_TEXT_LENGTH)?,
        primary_color: fields.patch_hex_color("primary_color")?,
        secondary_color: fields.patch_hex_color("secondary_color")?,
        logo_url: fields.patch_string("logo_url", MAX_TEXT_LENGTH)?,
        background_url: fields.patch_string("background_url", MAX_TEXT_LENGTH)?,
        is_active: fields.optional_bool("is_active")?,
    })
}
