//! SQL schema generation for the races table.
//!
//! The table name is configurable so several isolated race sets can share
//! one SQLite database. Names are validated before they are interpolated
//! into any statement.
//!
//! # Table structure
//!
//! - `id` — unique race identifier (text primary key)
//! - `meeting_id` — grouping identifier, indexed for membership filters
//! - `name`, `number`, `visible` — race metadata
//! - `advertised_start_time` — RFC 3339 text; status is derived from it

use crate::error::{Result, StoreError};

/// Columns read by every race query, in row-mapper order.
pub(crate) const RACE_COLUMNS: &str =
    "id, meeting_id, name, number, visible, advertised_start_time";

/// Validates that a table name contains only ASCII alphanumerics and underscores.
pub(crate) fn validate_table_name(table: &str) -> Result<()> {
    if table.is_empty() {
        return Err(StoreError::InvalidTableName(table.to_string()));
    }
    if !table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(StoreError::InvalidTableName(table.to_string()));
    }
    Ok(())
}

/// Generates the `CREATE TABLE` and `CREATE INDEX` statements for `table`.
///
/// Uses `IF NOT EXISTS` so the batch is safe to run repeatedly.
///
/// # Errors
///
/// Returns [`StoreError::InvalidTableName`] if the name is empty or contains
/// characters other than ASCII alphanumerics and underscores.
pub fn generate_schema_sql(table: &str) -> Result<String> {
    validate_table_name(table)?;

    Ok(format!(
        r#"
CREATE TABLE IF NOT EXISTS {table} (
    id TEXT PRIMARY KEY,
    meeting_id TEXT NOT NULL,
    name TEXT NOT NULL,
    number INTEGER NOT NULL,
    visible INTEGER NOT NULL DEFAULT 0,
    advertised_start_time TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_{table}_meeting_id ON {table}(meeting_id);
"#
    ))
}

/// Generates the base projection every list and point lookup starts from.
pub(crate) fn select_races_sql(table: &str) -> Result<String> {
    validate_table_name(table)?;
    Ok(format!("SELECT {RACE_COLUMNS} FROM {table}"))
}
