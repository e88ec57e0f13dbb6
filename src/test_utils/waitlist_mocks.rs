//! In-memory mock implementations for the waitlist repository trait.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::waitlist::WaitlistRepoTrait,
    domain::entities::waitlist_entry::WaitlistEntry,
};

/// In-memory implementation of WaitlistRepoTrait for testing.
/// Enforces email uniqueness like the UNIQUE constraint in the real schema.
#[derive(Default)]
pub struct InMemoryWaitlistRepo {
    pub entries: Mutex<Vec<WaitlistEntry>>,
    insert_calls: AtomicUsize,
}

impl InMemoryWaitlistRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repo with initial entries for testing.
    pub fn with_entries(entries: Vec<WaitlistEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
            insert_calls: AtomicUsize::new(0),
        }
    }

    /// Get all entries in insertion order (for test assertions).
    pub fn get_all(&self) -> Vec<WaitlistEntry> {
        self.entries.lock().unwrap().clone()
    }

    /// Number of insert attempts, including rejected duplicates.
    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WaitlistRepoTrait for InMemoryWaitlistRepo {
    async fn insert(&self, name: &str, email: &str) -> AppResult<WaitlistEntry> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        let mut entries = self.entries.lock().unwrap();

        if entries.iter().any(|e| e.email == email) {
            return Err(AppError::DuplicateEmail);
        }

        let id = entries.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        let entry = WaitlistEntry {
            id,
            name: name.to_string(),
            email: email.to_string(),
            created_at: chrono::Utc::now().naive_utc(),
        };
        entries.push(entry.clone());
        Ok(entry)
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.entries.lock().unwrap().len() as i64)
    }

    async fn list(&self, limit: Option<i64>) -> AppResult<Vec<WaitlistEntry>> {
        let mut entries = self.get_all();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        if let Some(limit) = limit {
            entries.truncate(usize::try_from(limit).unwrap_or(0));
        }
        Ok(entries)
    }
}

/// Repo whose every call fails like an unreachable database.
#[derive(Default)]
pub struct FailingWaitlistRepo;

#[async_trait]
impl WaitlistRepoTrait for FailingWaitlistRepo {
    async fn insert(&self, _name: &str, _email: &str) -> AppResult<WaitlistEntry> {
        Err(AppError::Database("Database operation failed".into()))
    }

    async fn count(&self) -> AppResult<i64> {
        Err(AppError::Database("Database operation failed".into()))
    }

    async fn list(&self, _limit: Option<i64>) -> AppResult<Vec<WaitlistEntry>> {
        Err(AppError::Database("Database operation failed".into()))
    }
}
