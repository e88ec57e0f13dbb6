use async_trait::async_trait;
use sqlx::{Row, postgres::PgRow, sqlite::SqliteRow};

use crate::{
    adapters::persistence::{PostgresPersistence, SqlitePersistence},
    app_error::{AppError, AppResult},
    application::use_cases::waitlist::WaitlistRepoTrait,
    domain::entities::waitlist_entry::WaitlistEntry,
};

// Tables created by earlier deployments use `id SERIAL` (INT4), so the
// Postgres queries cast the id to BIGINT before decoding.
fn pg_row_to_entry(row: PgRow) -> AppResult<WaitlistEntry> {
    Ok(WaitlistEntry {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        created_at: row.try_get("created_at")?,
    })
}

fn sqlite_row_to_entry(row: SqliteRow) -> AppResult<WaitlistEntry> {
    Ok(WaitlistEntry {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl WaitlistRepoTrait for PostgresPersistence {
    async fn insert(&self, name: &str, email: &str) -> AppResult<WaitlistEntry> {
        let row = sqlx::query(
            r#"
            INSERT INTO waitlist (name, email)
            VALUES ($1, $2)
            RETURNING id::BIGINT AS id, name, email, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .fetch_one(self.pool())
        .await
        .map_err(AppError::from)?;

        pg_row_to_entry(row)
    }

    async fn count(&self) -> AppResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM waitlist")
            .fetch_one(self.pool())
            .await
            .map_err(AppError::from)?;

        Ok(row.try_get("count")?)
    }

    async fn list(&self, limit: Option<i64>) -> AppResult<Vec<WaitlistEntry>> {
        let rows = match limit {
            Some(limit) => {
                sqlx::query(
                    r#"
                    SELECT id::BIGINT AS id, name, email, created_at
                    FROM waitlist
                    ORDER BY created_at DESC, id DESC
                    LIMIT $1
                    "#,
                )
                .bind(limit)
                .fetch_all(self.pool())
                .await
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id::BIGINT AS id, name, email, created_at
                    FROM waitlist
                    ORDER BY created_at DESC, id DESC
                    "#,
                )
                .fetch_all(self.pool())
                .await
            }
        }
        .map_err(AppError::from)?;

        rows.into_iter().map(pg_row_to_entry).collect()
    }
}

#[async_trait]
impl WaitlistRepoTrait for SqlitePersistence {
    async fn insert(&self, name: &str, email: &str) -> AppResult<WaitlistEntry> {
        let row = sqlx::query(
            r#"
            INSERT INTO waitlist (name, email)
            VALUES (?, ?)
            RETURNING id, name, email, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .fetch_one(self.pool())
        .await
        .map_err(AppError::from)?;

        sqlite_row_to_entry(row)
    }

    async fn count(&self) -> AppResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM waitlist")
            .fetch_one(self.pool())
            .await
            .map_err(AppError::from)?;

        Ok(row.try_get("count")?)
    }

    async fn list(&self, limit: Option<i64>) -> AppResult<Vec<WaitlistEntry>> {
        // created_at is stored as 'YYYY-MM-DD HH:MM:SS' text, which sorts chronologically
        let rows = match limit {
            Some(limit) => {
                sqlx::query(
                    r#"
                    SELECT id, name, email, created_at
                    FROM waitlist
                    ORDER BY created_at DESC, id DESC
                    LIMIT ?
                    "#,
                )
                .bind(limit)
                .fetch_all(self.pool())
                .await
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, name, email, created_at
                    FROM waitlist
                    ORDER BY created_at DESC, id DESC
                    "#,
                )
                .fetch_all(self.pool())
                .await
            }
        }
        .map_err(AppError::from)?;

        rows.into_iter().map(sqlite_row_to_entry).collect()
    }
}
