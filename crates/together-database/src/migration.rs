//! Embedded membership schema and its migration runner.

use serde::Serialize;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::{debug, info};

use together_core::error::{AppError, ErrorKind};
use together_core::result::AppResult;

/// Migrations under the workspace `migrations/` directory, compiled in.
static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// One embedded migration and whether the database has applied it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationEntry {
    /// Version prefix of the migration file.
    pub version: i64,
    /// Description derived from the file name.
    pub description: String,
    /// Whether `_sqlx_migrations` records a successful run.
    pub applied: bool,
}

/// Apply every pending migration.
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    let before = applied_versions(pool).await?;

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(ErrorKind::Database, format!("Failed to run migrations: {e}"), e)
    })?;

    let mut newly_applied = 0usize;
    for migration in MIGRATOR.iter().filter(|m| !before.contains(&m.version)) {
        newly_applied += 1;
        info!(
            version = migration.version,
            description = %migration.description,
            "Applied membership schema migration"
        );
    }
    debug!(
        embedded = MIGRATOR.iter().count(),
        newly_applied, "Membership schema is up to date"
    );
    Ok(())
}

/// Report every embedded migration with its applied flag.
pub async fn migration_status(pool: &PgPool) -> AppResult<Vec<MigrationEntry>> {
    let applied = applied_versions(pool).await?;
    Ok(MIGRATOR
        .iter()
        .map(|m| MigrationEntry {
            version: m.version,
            description: m.description.to_string(),
            applied: applied.contains(&m.version),
        })
        .collect())
}

/// Versions recorded as successful; empty before the first run.
async fn applied_versions(pool: &PgPool) -> AppResult<Vec<i64>> {
    let tracked: bool =
        sqlx::query_scalar("SELECT to_regclass('_sqlx_migrations') IS NOT NULL")
            .fetch_one(pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to inspect schema history", e)
            })?;
    if !tracked {
        return Ok(Vec::new());
    }

    sqlx::query_scalar("SELECT version FROM _sqlx_migrations WHERE success ORDER BY version")
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to read schema history", e))
}
