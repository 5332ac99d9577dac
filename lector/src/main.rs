use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lector::api::{create_router, AppState};
use lector::config::Config;
use lector::db::Database;
use lector::engine::EngineProvider;
use lector::storage::ArtifactStore;

#[derive(Parser)]
#[command(name = "lector")]
#[command(about = "Self-hostable OCR scan service")]
struct Args {
    /// Skip the eager retention sweep normally run at startup
    #[arg(long)]
    skip_startup_sweep: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lector=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    if config.server.api_keys.is_empty() {
        tracing::warn!(
            "LECTOR_API_KEYS is not set — admin endpoints are locked. Set LECTOR_API_KEYS to enable /admin/* routes."
        );
    }

    tracing::info!("Initializing database...");
    let db = Database::new(&config.database).await?;

    tracing::info!("Initializing artifact storage...");
    let artifacts = ArtifactStore::new(&config.storage).await?;

    tracing::info!("Initializing recognition engine adapter...");
    let engine = EngineProvider::new(&config.engine);
    if !engine.is_available() {
        tracing::warn!("Recognition engine unavailable - scan requests will fail until ENGINE_BASE_URL is configured");
    }

    let state = AppState::new(config.clone(), db, engine, artifacts);

    let cancel_token = CancellationToken::new();

    tracing::info!(
        "Starting retention sweeper... (max_age={}s, interval={}s)",
        state.config.retention.max_age_secs,
        state.config.retention.sweep_interval_secs
    );
    let sweeper = state.retention.clone();
    if !args.skip_startup_sweep {
        // Eager pass clears any backlog accumulated while the process
        // was down.
        if let Err(e) = sweeper.run_once().await {
            tracing::error!("Startup retention sweep error: {}", e);
        }
    }
    let token = cancel_token.child_token();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::info!("Retention sweeper shutting down...");
                    break;
                }
                _ = tokio::time::sleep(tokio::time::Duration::from_secs(sweeper.interval_secs())) => {
                    if let Err(e) = sweeper.run_once().await {
                        tracing::error!("Retention sweep error: {}", e);
                    }
                }
            }
        }
    });

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Lector starting on http://{}", addr);
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
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
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
