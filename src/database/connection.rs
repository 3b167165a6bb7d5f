//! PostgreSQL connection
//!
//! Opens the pool, applies the embedded migrations and masks credentials
//! before a URL reaches the logs.

use sqlx::PgPool;
use tracing::info;

use crate::config::DatabaseConfig;

/// Open the pool described by `config`
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    info!("🔌 Connecting to {}", mask_database_url(&config.url));
    let pool = config.create_pool().await?;
    ping(&pool).await?;
    info!("✅ Database connection established");
    Ok(pool)
}

/// Round-trip a trivial query
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the migrations under `migrations/`
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("✅ Migrations applied");
    Ok(())
}

/// Hide user and password in a connection URL
pub fn mask_database_url(url: &str) -> String {
    let Some(at_pos) = url.rfind('@') else {
        return url.to_string();
    };
    let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
    if scheme_end > at_pos {
        return url.to_string();
    }
    format!("{}***:***@{}", &url[..scheme_end], &url[at_pos + 1..])
}
