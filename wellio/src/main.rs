use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wellio::api::{create_router, AppState};
use wellio::config::Config;
use wellio::db::{Database, DatabaseBackend, LibSqlBackend};
use wellio::llm::LlmProvider;
use wellio::services::{EngagementMonitor, ProgressRefreshManager};

#[derive(Parser)]
#[command(name = "wellio")]
#[command(about = "Client progress tracking and engagement triggers for coaches")]
struct Args {
    /// Recalculate every active client's progress score before serving
    #[arg(long)]
    recalculate_on_start: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wellio=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    if config.server.api_keys.is_empty() {
        tracing::warn!(
            "WELLIO_API_KEYS is not set, every route except /health and the docs is locked"
        );
    }

    tracing::info!("Initializing database...");
    let raw_db = Database::new(&config.database).await?;
    let db: Arc<dyn DatabaseBackend> = Arc::new(LibSqlBackend::new(raw_db));

    if let Some(llm_config) = &config.llm {
        tracing::info!("Initializing LLM provider: {}...", llm_config.model);
    }
    let llm = LlmProvider::new(config.llm.as_ref());
    if !llm.is_available() {
        tracing::warn!("LLM unavailable, smart logs will fail until one is configured");
    }

    let state = AppState::new(config.clone(), db, llm);

    if args.recalculate_on_start {
        tracing::info!("Recalculating progress for all active clients...");
        let result = state.progress.update_all(None).await?;
        tracing::info!(
            updated = result.updated,
            failed = result.failed.len(),
            "Startup recalculation complete"
        );
    }

    let cancel_token = CancellationToken::new();

    tracing::info!(
        "Starting progress refresh manager... (interval={}s)",
        config.progress.refresh_interval_secs
    );
    let refresh = ProgressRefreshManager::new(
        state.progress.clone(),
        config.progress.refresh_interval_secs,
    );
    let token = cancel_token.child_token();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::info!("Progress refresh manager shutting down...");
                    break;
                }
                _ = tokio::time::sleep(tokio::time::Duration::from_secs(refresh.interval_secs())) => {
                    if let Err(e) = refresh.run_once().await {
                        tracing::error!("Progress refresh error: {}", e);
                    }
                }
            }
        }
    });

    if config.engagement.enabled {
        tracing::info!(
            "Starting engagement monitor... (interval={}s)",
            config.engagement.interval_secs
        );
        let monitor = EngagementMonitor::new(
            state.db.clone(),
            state.engagement.clone(),
            config.engagement.interval_secs,
        );
        let token = cancel_token.child_token();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        tracing::info!("Engagement monitor shutting down...");
                        break;
                    }
                    _ = tokio::time::sleep(tokio::time::Duration::from_secs(monitor.interval_secs())) => {
                        if let Err(e) = monitor.run_once().await {
                            tracing::error!("Engagement monitor error: {}", e);
                        }
                    }
                }
            }
        });
    }

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Wellio starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/api/v1/health", addr);
    tracing::info!("  API docs:     http://{}/api/v1/docs", addr);
    tracing::info!("  OpenAPI spec: http://{}/api/v1/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel_token))
        .await?;

    Ok(())
}

async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, cancelling background tasks...");
    cancel_token.cancel();
}
