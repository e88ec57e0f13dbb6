//! Test data factories for creating valid test fixtures.
//!
//! Each factory function creates a complete, valid object with sensible defaults.
//! Use the closure parameter to override specific fields as needed.

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::entities::waitlist_entry::WaitlistEntry;

/// Fixed timestamp for reproducible tests.
pub fn test_datetime() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// Create a test waitlist entry with sensible defaults.
pub fn create_test_entry(overrides: impl FnOnce(&mut WaitlistEntry)) -> WaitlistEntry {
    let mut entry = WaitlistEntry {
        id: 1,
        name: "Test User".to_string(),
        email: "test@example.com".to_string(),
        created_at: test_datetime(),
    };
    overrides(&mut entry);
    entry
}
