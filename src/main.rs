use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};

use billing_tracker::config::AppConfig;
use billing_tracker::database::{connect, run_migrations};
use billing_tracker::services::document_storage::{S3Config, S3DocumentStore};
use billing_tracker::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env
    dotenv().ok();

    let config = AppConfig::load().context("Error loading configuration")?;

    tracing_subscriber::fmt()
        .with_max_level(config.environment.log_level)
        .init();

    info!("🧾 Billing Tracker API");
    info!("================================================");
    info!("🌍 Environment: {}", config.environment.environment);
    if config.environment.is_development() {
        info!(
            "🔧 Secrets loaded from {}",
            config.environment.secrets_file.display()
        );
    }

    let database = config.database()?;
    let pool = match connect(&database).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error connecting to the database: {}", e);
            return Err(anyhow::anyhow!("Database error: {}", e));
        }
    };
    run_migrations(&pool)
        .await
        .context("Error applying migrations")?;

    let documents = S3DocumentStore::new(S3Config::from(&config.secrets))
        .map_err(|e| anyhow::anyhow!("Document storage error: {}", e))?;

    let addr: SocketAddr = config
        .environment
        .server_url()
        .parse()
        .context("Invalid HOST/PORT")?;

    let app = create_router(AppState::new(pool, config, Arc::new(documents)));

    info!("🌐 Server starting on http://{}", addr);
    info!("🔍 Available endpoints:");
    info!("   GET  /health");
    info!("📊 Workflow:");
    info!("   GET  /api/dashboard-data/?year=&month=");
    info!("   GET  /api/mis-reports/?year=");
    info!("   POST /api/mis-reports/");
    info!("📍 Localities:");
    info!("   GET  /api/localities/?page=&search=");
    info!("   GET  /api/dropdown-localities/");
    info!("   GET  /api/next-pending/");
    info!("   GET  /api/search-pending/?q=&page=");
    info!("   POST /api/save-mapping/");
    info!("   POST /api/bulk-save/");
    info!("   POST /api/add-master-locality/");
    info!("🚗 Vehicles:");
    info!("   GET  /api/vehicles/");
    info!("   POST /api/add-vehicle/");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Server error: {}", e);
        return Err(e.into());
    }

    info!("👋 Server stopped");
    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Ctrl+C received, shutting down...");
        },
        _ = terminate => {
            info!("🛑 Termination signal received, shutting down...");
        },
    }
}
