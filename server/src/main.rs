//! record-server: HTTP front end for record-service.
//!
//! Run from repo root: `cargo run -p record-server`
//! Configuration comes from the environment or a `.env` file (see `AppConfig`).

use record_service::{app, apply_migrations, connect, AppConfig, AppState};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("record_service=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    let pool = connect(&config.database_url, config.max_connections).await?;
    apply_migrations(&pool).await?;
    tracing::info!("database schema ready");

    let addr = config.bind_addr();
    let state = AppState::new(pool, config);
    let router = app(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
