pub mod client_assets;
pub mod invite_service;
pub mod user_service;

pub use client_assets::{AssetKind, AssetUpload, ClientAssetService};
pub use invite_service::{InviteService, IssuedInvite};
pub use user_service::{CreateUserInput, CreatedUser, UserService};
