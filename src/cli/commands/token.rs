use anyhow::Context;
use clap::Args;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{issue_session_token, Claims};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::config;

#[derive(Debug, Args)]
pub struct TokenArgs {
    #[arg(long, help = "Profile id to put in the token subject")]
    pub user: Uuid,

    #[arg(long, help = "Email claim")]
    pub email: Option<String>,

    #[arg(long, default_value_t = 24, help = "Lifetime in hours")]
    pub hours: i64,
}

pub fn handle(args: TokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let secret = &config().platform.jwt_secret;
    let claims = Claims::new(args.user, args.email, chrono::Duration::hours(args.hours));
    let token = issue_session_token(secret, &claims).context("SUPABASE_JWT_SECRET must be set to mint tokens")?;

    output_success(
        &output_format,
        &format!("Session token for {} (expires in {}h)", args.user, args.hours),
        Some(json!({ "token": token })),
    )
}
