//! Test app state builder for HTTP-level integration testing.
//!
//! `TestAppStateBuilder` creates a minimal `AppState` backed by an
//! in-memory repository unless a different repo is supplied.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use secrecy::SecretString;

use crate::{
    adapters::http::app_state::AppState,
    application::use_cases::waitlist::{WaitlistRepoTrait, WaitlistUseCases},
    domain::entities::waitlist_entry::WaitlistEntry,
    infra::config::{AppConfig, StorageBackend},
    test_utils::InMemoryWaitlistRepo,
};

/// Builder for creating `AppState` with in-memory mocks for testing.
///
/// # Example
///
/// ```ignore
/// let app_state = TestAppStateBuilder::new()
///     .with_entries(vec![create_test_entry(|e| e.email = "a@example.com".into())])
///     .with_admin_token("s3cret")
///     .build();
/// ```
pub struct TestAppStateBuilder {
    entries: Vec<WaitlistEntry>,
    repo: Option<Arc<dyn WaitlistRepoTrait>>,
    admin_token: Option<String>,
    cors_origin: Option<HeaderValue>,
    csv_filename: String,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self {
            entries: vec![],
            repo: None,
            admin_token: None,
            cors_origin: None,
            csv_filename: "waitlist.csv".to_string(),
        }
    }

    /// Seed the in-memory repo. Ignored when `with_repo` is used.
    pub fn with_entries(mut self, entries: Vec<WaitlistEntry>) -> Self {
        self.entries = entries;
        self
    }

    /// Use a custom repository (e.g. a failing mock or SQLite in memory).
    pub fn with_repo(mut self, repo: Arc<dyn WaitlistRepoTrait>) -> Self {
        self.repo = Some(repo);
        self
    }

    pub fn with_admin_token(mut self, token: &str) -> Self {
        self.admin_token = Some(token.to_string());
        self
    }

    pub fn with_cors_origin(mut self, origin: &'static str) -> Self {
        self.cors_origin = Some(HeaderValue::from_static(origin));
        self
    }

    pub fn with_csv_filename(mut self, filename: &str) -> Self {
        self.csv_filename = filename.to_string();
        self
    }

    pub fn build(self) -> AppState {
        self.build_with_repo().0
    }

    /// Build the state and also return the in-memory repo for assertions.
    /// When a custom repo was supplied, the returned in-memory repo is unused.
    pub fn build_with_repo(self) -> (AppState, Arc<InMemoryWaitlistRepo>) {
        let memory_repo = Arc::new(InMemoryWaitlistRepo::with_entries(self.entries));
        let repo = self
            .repo
            .unwrap_or_else(|| memory_repo.clone() as Arc<dyn WaitlistRepoTrait>);

        let config = Arc::new(AppConfig {
            bind_addr: "127.0.0.1:8000".parse::<SocketAddr>().unwrap(),
            storage: StorageBackend::Sqlite {
                url: "sqlite::memory:".to_string(),
            },
            db_max_connections: 1,
            admin_token: self.admin_token.map(|t| SecretString::new(t.into())),
            cors_origin: self.cors_origin,
            csv_filename: self.csv_filename,
            log_file: None,
        });

        let app_state = AppState {
            config,
            waitlist_use_cases: Arc::new(WaitlistUseCases::new(repo)),
        };

        (app_state, memory_repo)
    }
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
