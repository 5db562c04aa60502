use std::net::SocketAddr;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use auto_marketplace::{
    config::EnvironmentConfig, create_app, database, repositories::Repositories,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = EnvironmentConfig::from_env().context("Invalid configuration")?;
    info!("🚗 Auto marketplace API ({})", config.environment);

    let pool = match database::connect(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Could not reach the database: {:#}", e);
            return Err(e);
        }
    };

    if config.is_production() && config.allows_any_origin() {
        warn!("⚠️ CORS allows any origin in production");
    }

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .context("HOST/PORT do not form a valid socket address")?;

    let state = AppState::new(config, Repositories::postgres(pool.clone()));
    let app = create_app(state);

    info!("🌐 Listening on http://{}", addr);
    info!("   GET  /health");
    info!("   POST /auth/register | /auth/login, GET /auth/me");
    info!("   GET|POST /vehicles, GET|PUT|DELETE /vehicles/:id");
    info!("   GET /users/favorites, POST|DELETE /users/favorites/:vehicleId");
    info!("   PUT /users/profile, GET /users/vehicles");
    info!("   POST|GET /contact, PUT /contact/:id/status");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Could not bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("🛑 Ctrl+C received, shutting down"),
        _ = terminate => info!("🛑 SIGTERM received, shutting down"),
    }
}
