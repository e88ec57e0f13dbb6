use sqlx::{PgPool, SqlitePool};

use crate::app_error::AppError;

pub mod waitlist_entry;

#[derive(Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    pub fn new(pool: PgPool) -> Self {
        PostgresPersistence { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Local file-backed store, used when no networked database is configured.
#[derive(Clone)]
pub struct SqlitePersistence {
    pool: SqlitePool,
}

impl SqlitePersistence {
    pub fn new(pool: SqlitePool) -> Self {
        SqlitePersistence { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::NotFound,
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();
                // Postgres: "duplicate key value violates unique constraint"
                // SQLite: "UNIQUE constraint failed: waitlist.email"
                if db_err.is_unique_violation()
                    || msg.contains("duplicate key")
                    || msg.contains("UNIQUE constraint failed")
                {
                    AppError::DuplicateEmail
                } else {
                    // Log the actual error for debugging, but don't expose details
                    tracing::error!(error = %err, "Database error");
                    AppError::Database("Database operation failed".into())
                }
            }
            _ => {
                tracing::error!(error = %err, "Database error");
                AppError::Database("Database operation failed".into())
            }
        }
    }
}
