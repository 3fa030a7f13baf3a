use std::net::SocketAddr;

use anyhow::{anyhow, Context};
use backend::config::{self, RunMode};
use backend::{build_router, db, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load configuration
    let cfg = config::load().map_err(|e| anyhow!(e))?;
    info!("Starting backend in {:?} mode ({:?})", cfg.env, cfg.mode);

    // 3. Open the SQLite pool
    let pool = db::create_pool(&cfg.database_url, cfg.db_max_connections)
        .await
        .with_context(|| format!("failed to open database {}", cfg.database_url))?;
    info!("Connected to {}", cfg.database_url);

    if cfg.mode == RunMode::InitDb {
        db::reset_schema(&pool).await.context("failed to initialize database")?;
        return Ok(());
    }
    db::ensure_schema(&pool).await.context("failed to create tables")?;

    // 4. Build application state
    let state = AppState {
        db: pool,
        config: cfg.clone(),
    };

    // 5. Build router
    let app = build_router(state);

    // 6. Start HTTP server
    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.http_port));
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
