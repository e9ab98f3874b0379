//! Connection pools and schema bootstrap.
//!
//! Pools are built with raw sqlx options so every physical connection gets
//! its session settings in `after_connect`, then handed to SeaORM.
//!
//! SQLite in-memory databases live and die with their connection, so that
//! pool is pinned to exactly one connection that never idles out, and the
//! schema is migrated on that same pool.

use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use migration::MigrationCommand;
use sea_orm::{DatabaseConnection, SqlxPostgresConnector, SqlxSqliteConnector};
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{info, warn};

use crate::config::db::{db_url, DbKind, DbOwner, RuntimeEnv};
use crate::error::AppError;

const SQLITE_BUSY_TIMEOUT_MS: u64 = 5_000;
const POSTGRES_APP_NAME: &str = "milsim-backend";

#[derive(Debug, Clone, Copy)]
struct PoolSettings {
    min: u32,
    max: u32,
    acquire_timeout: Duration,
}

fn pool_settings(kind: DbKind, owner: DbOwner) -> PoolSettings {
    match (kind, owner) {
        (DbKind::SqliteMemory, _) | (_, DbOwner::Owner) => PoolSettings {
            min: 1,
            max: 1,
            acquire_timeout: Duration::from_secs(5),
        },
        (DbKind::SqliteFile, DbOwner::App) => PoolSettings {
            min: 1,
            max: 4,
            acquire_timeout: Duration::from_secs(5),
        },
        (DbKind::Postgres, DbOwner::App) => PoolSettings {
            min: 1,
            max: 10,
            acquire_timeout: Duration::from_secs(5),
        },
    }
}

fn session_statements(kind: DbKind) -> Vec<String> {
    match kind {
        DbKind::SqliteFile | DbKind::SqliteMemory => vec![
            "PRAGMA foreign_keys = ON;".to_string(),
            format!("PRAGMA busy_timeout = {SQLITE_BUSY_TIMEOUT_MS};"),
        ],
        DbKind::Postgres => vec![
            format!("SET application_name = '{POSTGRES_APP_NAME}';"),
            "SET timezone = 'UTC';".to_string(),
        ],
    }
}

/// Retry a connection attempt with a fixed delay between attempts.
async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval: Duration,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 1;
    loop {
        match connect_fn().await {
            Ok(value) => {
                if attempt > 1 {
                    info!(attempts = attempt, "connection_retry=success");
                }
                return Ok(value);
            }
            Err(e) if attempt < max_attempts => {
                warn!(attempt, max_attempts, error = %e, "connection_retry=failed");
                tokio::time::sleep(interval).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Open a pool for `kind`. Does NOT run migrations.
pub async fn connect_db(
    env: RuntimeEnv,
    kind: DbKind,
    owner: DbOwner,
) -> Result<DatabaseConnection, AppError> {
    let url = db_url(env, kind, owner)?;
    let settings = pool_settings(kind, owner);

    match kind {
        DbKind::SqliteFile | DbKind::SqliteMemory => {
            let connect_opts = SqliteConnectOptions::from_str(&url)
                .map_err(|e| AppError::config(format!("invalid SQLite connection options: {e}")))?
                .create_if_missing(true);

            let mut pool_opts = SqlitePoolOptions::new()
                .min_connections(settings.min)
                .max_connections(settings.max)
                .acquire_timeout(settings.acquire_timeout);
            if kind == DbKind::SqliteMemory {
                pool_opts = pool_opts.idle_timeout(None).max_lifetime(None);
            }

            let pool = pool_opts
                .after_connect(move |conn, _meta| {
                    Box::pin(async move {
                        for stmt in session_statements(kind) {
                            sqlx::query(&stmt).execute(&mut *conn).await?;
                        }
                        Ok::<_, sqlx::Error>(())
                    })
                })
                .connect_with(connect_opts)
                .await
                .map_err(|e| AppError::config(format!("failed to create SQLite pool: {e}")))?;

            info!(
                engine = "sqlite",
                db_kind = ?kind,
                min = settings.min,
                max = settings.max,
                "pool=create"
            );
            Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
        }
        DbKind::Postgres => {
            let pool = retry_connection(
                || {
                    let url = url.clone();
                    async move {
                        PgPoolOptions::new()
                            .min_connections(settings.min)
                            .max_connections(settings.max)
                            .acquire_timeout(settings.acquire_timeout)
                            .idle_timeout(Duration::from_secs(30))
                            .after_connect(|conn, _meta| {
                                Box::pin(async move {
                                    for stmt in session_statements(DbKind::Postgres) {
                                        sqlx::query(&stmt).execute(&mut *conn).await?;
                                    }
                                    Ok::<_, sqlx::Error>(())
                                })
                            })
                            .connect(&url)
                            .await
                            .map_err(|e| {
                                AppError::config(format!("failed to connect to Postgres: {e}"))
                            })
                    }
                },
                5,
                Duration::from_millis(500),
            )
            .await?;

            info!(
                engine = "postgres",
                owner = ?owner,
                min = settings.min,
                max = settings.max,
                "pool=create"
            );
            Ok(SqlxPostgresConnector::from_sqlx_postgres_pool(pool))
        }
    }
}

/// Run a migration command with owner credentials (app pool for in-memory).
pub async fn run_migrations(
    env: RuntimeEnv,
    kind: DbKind,
    command: MigrationCommand,
) -> Result<(), AppError> {
    let conn = connect_db(env, kind, DbOwner::Owner).await?;
    migration::migrate(&conn, command).await?;
    Ok(())
}

/// Build the application pool *and* guarantee the schema is current.
pub async fn bootstrap_db(env: RuntimeEnv, kind: DbKind) -> Result<DatabaseConnection, AppError> {
    info!(env = ?env, db_kind = ?kind, "bootstrap=start");

    let pool = if kind == DbKind::SqliteMemory {
        let pool = connect_db(env, kind, DbOwner::App).await?;
        migration::migrate(&pool, MigrationCommand::Up).await?;
        pool
    } else {
        run_migrations(env, kind, MigrationCommand::Up).await?;
        connect_db(env, kind, DbOwner::App).await?
    };

    info!("bootstrap=ready");
    Ok(pool)
}
