use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::config;

pub fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let redacted = config().redacted();
    output_success(
        &output_format,
        &format!("Configuration ({:?})", redacted.environment),
        Some(json!({ "config": redacted })),
    )
}
