//! SQLite connection setup.

use crate::config::Settings;
use crate::error::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;

/// Create the parent directory of a file-backed database URL. In-memory URLs are left alone.
pub fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path.starts_with(":memory:") {
        return Ok(());
    }
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Pool for the configured database, created if missing, with foreign keys enforced.
pub async fn connect(settings: &Settings) -> Result<SqlitePool, AppError> {
    ensure_database_exists(&settings.database_url)?;
    let options = SqliteConnectOptions::from_str(&settings.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(settings.database_max_connections.max(1))
        .connect_with(options)
        .await?;
    tracing::info!(url = %settings.database_url, "database connected");
    Ok(pool)
}

/// Private in-memory database on a single long-lived connection.
/// Every connection to `:memory:` is a separate database, so the pool must never open a second one.
pub async fn connect_in_memory() -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    Ok(pool)
}
