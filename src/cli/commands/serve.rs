use anyhow::Context;
use clap::Args;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::handlers::{router, AppState};
use crate::services::HttpMediaClient;

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    #[arg(long, help = "Port to listen on (overrides PORT / MEDIA_RELAY_PORT)")]
    pub port: Option<u16>,
}

pub async fn handle(args: ServeArgs, mut config: AppConfig) -> anyhow::Result<()> {
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!("Starting media relay in {:?} mode", config.environment);

    let accounts = Arc::new(config.account_table());
    tracing::info!(
        accounts = accounts.len(),
        default_account = accounts.default_account().is_some(),
        "Loaded media accounts"
    );

    let media = HttpMediaClient::new(&config.media.api_base_url)
        .with_context(|| format!("invalid MEDIA_API_BASE_URL {:?}", config.media.api_base_url))?;
    let media = Arc::new(media);
    let mut app = router(AppState::new(accounts, media));
    if config.security.enable_cors {
        app = app.layer(CorsLayer::permissive());
    }
    let app = app.layer(TraceLayer::new_for_http());

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Media relay listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Media relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
