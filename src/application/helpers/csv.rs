//! CSV rendering for waitlist exports.

use crate::domain::entities::waitlist_entry::WaitlistEntry;

pub const CSV_HEADER: &str = "name,email,created_at";

/// Render entries as CSV: a header line followed by one line per entry.
pub fn entries_to_csv(entries: &[WaitlistEntry]) -> String {
    let mut csv = String::with_capacity((entries.len() + 1) * 64);
    csv.push_str(CSV_HEADER);
    csv.push('\n');

    for entry in entries {
        csv.push_str(&format!(
            "{},{},{}\n",
            escape_csv_field(&entry.name),
            escape_csv_field(&entry.email),
            entry.created_at_display(),
        ));
    }

    csv
}

/// Escape a field for CSV output, including formula injection prevention.
/// Spreadsheet applications will execute formulas starting with =, +, -, @,
/// tab, or carriage return, so such values are prefixed with a single quote.
pub fn escape_csv_field(field: &str) -> String {
    let needs_quoting =
        field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r');

    let is_formula = field
        .chars()
        .next()
        .is_some_and(|c| matches!(c, '=' | '+' | '-' | '@' | '\t' | '\r'));

    let escaped = if is_formula {
        format!("'{field}")
    } else {
        field.to_string()
    };

    if needs_quoting || is_formula {
        format!("\"{}\"", escaped.replace('"', "\"\""))
    } else {
        escaped
    }
}
