use std::str::FromStr;

use sqlx::{
    PgPool, SqlitePool,
    postgres::PgPoolOptions,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use tracing::info;

use super::{InfraError, config::StorageBackend};

const POSTGRES_SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS waitlist (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        created_at TIMESTAMP NOT NULL DEFAULT (NOW() AT TIME ZONE 'UTC')
    )
    "#,
    "CREATE INDEX IF NOT EXISTS waitlist_created_at_idx ON waitlist (created_at DESC)",
];

const SQLITE_SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS waitlist (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    )
    "#,
    "CREATE INDEX IF NOT EXISTS waitlist_created_at_idx ON waitlist (created_at DESC)",
];

/// Connection pool for whichever backend was configured.
#[derive(Clone)]
pub enum DbPool {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

impl DbPool {
    /// Wait for in-flight queries and close every connection.
    pub async fn close(&self) {
        match self {
            DbPool::Postgres(pool) => pool.close().await,
            DbPool::Sqlite(pool) => pool.close().await,
        }
    }
}

/// Connect to the configured backend and make sure the schema exists.
pub async fn init_db(
    backend: &StorageBackend,
    max_connections: u32,
) -> Result<DbPool, InfraError> {
    let pool = match backend {
        StorageBackend::Postgres { url } => {
            DbPool::Postgres(init_postgres(url, max_connections).await?)
        }
        StorageBackend::Sqlite { url } => DbPool::Sqlite(init_sqlite(url, max_connections).await?),
    };

    info!(backend = backend.kind(), "Connected to database!");
    Ok(pool)
}

pub async fn init_postgres(database_url: &str, max_connections: u32) -> Result<PgPool, InfraError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(InfraError::DatabaseConnection)?;

    ensure_postgres_schema(&pool).await?;
    Ok(pool)
}

pub async fn init_sqlite(database_url: &str, max_connections: u32) -> Result<SqlitePool, InfraError> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(InfraError::DatabaseConnection)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .map_err(InfraError::DatabaseConnection)?;

    ensure_sqlite_schema(&pool).await?;
    Ok(pool)
}

pub async fn ensure_postgres_schema(pool: &PgPool) -> Result<(), InfraError> {
    for statement in POSTGRES_SCHEMA {
        sqlx::query(*statement)
            .execute(pool)
            .await
            .map_err(InfraError::Schema)?;
    }
    Ok(())
}

pub async fn ensure_sqlite_schema(pool: &SqlitePool) -> Result<(), InfraError> {
    for statement in SQLITE_SCHEMA {
        sqlx::query(*statement)
            .execute(pool)
            .await
            .map_err(InfraError::Schema)?;
    }
    Ok(())
}
