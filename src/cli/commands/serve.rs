use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::config::config;
use crate::database::{DatabaseManager, PgStore};
use crate::platform::{http_client, Mailer, SupabaseAuthAdmin, SupabaseStorage};
use crate::state::AppState;

#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    #[arg(long, help = "Port to listen on (overrides PORT / API_PORT)")]
    pub port: Option<u16>,
}

pub async fn handle(args: ServeArgs) -> anyhow::Result<()> {
    let config = config().clone();
    info!("Starting Benchdesk API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database).context("failed to configure database pool")?;
    let http = http_client(config.platform.http_timeout_secs).context("failed to build HTTP client")?;

    let identity = SupabaseAuthAdmin::new(http.clone(), &config.platform.url, &config.platform.service_role_key);
    let storage = SupabaseStorage::new(
        http.clone(),
        &config.platform.url,
        &config.platform.service_role_key,
        &config.platform.storage_bucket,
    );
    let mailer = Mailer::from_config(&config.email, http);
    info!("Email providers: {:?}", mailer.provider_names());

    let port = args.port.unwrap_or(config.server.port);
    let state = AppState::new(
        config,
        Arc::new(PgStore::new(pool.clone())),
        Arc::new(identity),
        Arc::new(storage),
        Arc::new(mailer),
    );

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Benchdesk API listening on http://{}", bind_addr);

    axum::serve(listener, crate::app::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    DatabaseManager::close(&pool).await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
