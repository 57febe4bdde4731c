//! SQLite pool setup and the embedded schema migration.

use anyhow::Result;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::path::Path;

const INIT_MIGRATION: &str = include_str!("../migrations/0001_init.sql");

/// Open a pool for `database_url`, creating the database file and its parent
/// directory when they are missing.
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    tracing::debug!("Connecting using raw URL => {}", database_url);

    let db_path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .trim_start_matches("file:");

    if !db_path.starts_with(":memory:") {
        let db_path_obj = Path::new(db_path);
        if let Some(parent) = db_path_obj.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
                tracing::info!("Created missing directory {:?}", parent);
            }
        }

        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(db_path_obj)
        {
            Ok(_) => tracing::debug!("Database file {} can be created/opened.", db_path),
            Err(e) => tracing::warn!("Failed to open {} manually: {}", db_path, e),
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Run the embedded migration statement by statement. Every statement is
/// `IF NOT EXISTS`, so running it twice is harmless.
pub async fn run_migrations(db: &SqlitePool) -> Result<()> {
    let statements = INIT_MIGRATION
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>();

    tracing::info!("Running {} migration statements...", statements.len());

    for stmt in statements {
        tracing::debug!("Executing migration SQL: {}", stmt);
        sqlx::query(stmt).execute(db).await?;
    }

    Ok(())
}
