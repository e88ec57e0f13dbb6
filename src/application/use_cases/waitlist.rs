use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use crate::app_error::{AppError, AppResult};
use crate::application::helpers::csv::entries_to_csv;
use crate::application::validators::{sanitize_email, sanitize_name};
use crate::domain::entities::waitlist_entry::WaitlistEntry;

pub const INVALID_NAME_MESSAGE: &str = "Please share your name so we can personalize the rollout.";
pub const INVALID_EMAIL_MESSAGE: &str = "A valid email is required to join the waitlist.";

// ============================================================================
// Repository Trait
// ============================================================================

#[async_trait]
pub trait WaitlistRepoTrait: Send + Sync {
    /// Insert a new entry. Fails with `AppError::DuplicateEmail` when the
    /// email is already stored; the existing row is left untouched.
    async fn insert(&self, name: &str, email: &str) -> AppResult<WaitlistEntry>;

    async fn count(&self) -> AppResult<i64>;

    /// Newest first. `None` returns every entry.
    async fn list(&self, limit: Option<i64>) -> AppResult<Vec<WaitlistEntry>>;
}

// ============================================================================
// Outcome Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined { entry: WaitlistEntry, count: i64 },
    AlreadyJoined { count: i64 },
}

// ============================================================================
// Use Cases
// ============================================================================

#[derive(Clone)]
pub struct WaitlistUseCases {
    repo: Arc<dyn WaitlistRepoTrait>,
}

impl WaitlistUseCases {
    pub fn new(repo: Arc<dyn WaitlistRepoTrait>) -> Self {
        Self { repo }
    }

    /// Validate and store a signup. Input is checked before the repo is touched.
    #[instrument(skip_all)]
    pub async fn join(&self, name: &str, email: &str) -> AppResult<JoinOutcome> {
        let name =
            sanitize_name(name).ok_or_else(|| AppError::InvalidInput(INVALID_NAME_MESSAGE.into()))?;
        let email = sanitize_email(email)
            .ok_or_else(|| AppError::InvalidInput(INVALID_EMAIL_MESSAGE.into()))?;

        match self.repo.insert(&name, &email).await {
            Ok(entry) => {
                let count = self.repo.count().await?;
                tracing::info!(entry_id = entry.id, count, "Waitlist entry created");
                Ok(JoinOutcome::Joined { entry, count })
            }
            Err(AppError::DuplicateEmail) => {
                let count = self.repo.count().await?;
                tracing::debug!(count, "Duplicate waitlist signup");
                Ok(JoinOutcome::AlreadyJoined { count })
            }
            Err(err) => Err(err),
        }
    }

    #[instrument(skip(self))]
    pub async fn count(&self) -> AppResult<i64> {
        self.repo.count().await
    }

    /// List entries newest first. A non-positive limit means no limit.
    #[instrument(skip(self))]
    pub async fn list_entries(&self, limit: Option<i64>) -> AppResult<Vec<WaitlistEntry>> {
        self.repo.list(effective_limit(limit)).await
    }

    /// Same selection as `list_entries`, rendered as CSV.
    #[instrument(skip(self))]
    pub async fn export_csv(&self, limit: Option<i64>) -> AppResult<String> {
        let entries = self.list_entries(limit).await?;
        Ok(entries_to_csv(&entries))
    }
}

pub fn effective_limit(limit: Option<i64>) -> Option<i64> {
    limit.filter(|l| *l > 0)
}
