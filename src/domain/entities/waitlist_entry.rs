use chrono::NaiveDateTime;

/// Format used for `created_at` in JSON and CSV output.
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One signup record. Created once, never updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitlistEntry {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Server-assigned at insert time, UTC.
    pub created_at: NaiveDateTime,
}

impl WaitlistEntry {
    pub fn created_at_display(&self) -> String {
        self.created_at.format(CREATED_AT_FORMAT).to_string()
    }
}
