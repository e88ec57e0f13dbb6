use std::sync::Arc;

use crate::{
    adapters::persistence::{PostgresPersistence, SqlitePersistence},
    application::use_cases::waitlist::WaitlistRepoTrait,
    infra::db::DbPool,
};

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod setup;

pub use error::InfraError;

/// Wrap the pool in the persistence adapter for its backend.
pub fn waitlist_persistence(pool: &DbPool) -> Arc<dyn WaitlistRepoTrait> {
    match pool {
        DbPool::Postgres(pool) => Arc::new(PostgresPersistence::new(pool.clone())),
        DbPool::Sqlite(pool) => Arc::new(SqlitePersistence::new(pool.clone())),
    }
}
