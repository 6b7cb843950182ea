//! Conversion from SQLite rows to [`Race`] values.
//!
//! Rows are read positionally in the order given by the base projection:
//! id, meeting id, name, number, visible, advertised start time. The status
//! is derived while mapping, so two reads of the same row at different
//! times may disagree.

use chrono::{DateTime, NaiveDateTime, Utc};
use racing_core::{Race, RaceStatus};
use rusqlite::types::{FromSql, ValueRef};
use rusqlite::{Row, Rows};
use tracing::warn;

use crate::error::{Result, StoreError};

/// Naive layouts accepted for stored timestamps, interpreted as UTC.
const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Advances the cursor and maps the next row.
///
/// Returns `Ok(None)` once the cursor is exhausted. That is the "no
/// matching row" signal and is never an error at this level.
pub(crate) fn next_race(rows: &mut Rows<'_>) -> Result<Option<Race>> {
    match rows.next()? {
        Some(row) => map_row(row).map(Some),
        None => Ok(None),
    }
}

/// Drains the cursor into a vector, preserving store order.
///
/// The first row that fails to map aborts the scan and no partial result is
/// returned.
pub(crate) fn collect_races(rows: &mut Rows<'_>) -> Result<Vec<Race>> {
    let mut races = Vec::new();
    while let Some(race) = next_race(rows)? {
        races.push(race);
    }
    Ok(races)
}

/// Maps a row, deriving its status against the current time.
pub fn map_row(row: &Row<'_>) -> Result<Race> {
    map_row_at(row, Utc::now())
}

/// Maps a row, deriving its status against `now`.
pub fn map_row_at(row: &Row<'_>, now: DateTime<Utc>) -> Result<Race> {
    let id: String = column(row, 0, "id")?;
    let meeting_id = column(row, 1, "meeting_id")?;
    let name = column(row, 2, "name")?;
    let number = column(row, 3, "number")?;
    let visible = column(row, 4, "visible")?;

    let raw = row
        .get_ref(5)
        .map_err(|e| StoreError::Mapping(format!("column advertised_start_time: {e}")))?;
    let advertised_start_time = parse_timestamp(raw).inspect_err(|e| {
        warn!(race = %id, error = %e, "Failed to convert advertised start time");
    })?;

    Ok(Race {
        id,
        meeting_id,
        name,
        number,
        visible,
        advertised_start_time,
        status: RaceStatus::at(advertised_start_time, now),
    })
}

fn column<T: FromSql>(row: &Row<'_>, idx: usize, name: &str) -> Result<T> {
    row.get(idx)
        .map_err(|e| StoreError::Mapping(format!("column {name}: {e}")))
}

/// Interprets a stored timestamp.
///
/// Text may be RFC 3339 or one of the naive layouts in
/// [`NAIVE_TIMESTAMP_FORMATS`]. Integers are Unix seconds.
pub(crate) fn parse_timestamp(raw: ValueRef<'_>) -> Result<DateTime<Utc>> {
    match raw {
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes).map_err(|e| {
                StoreError::Conversion(format!("timestamp is not valid UTF-8: {e}"))
            })?;
            parse_timestamp_text(text)
        }
        ValueRef::Integer(secs) => DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| StoreError::Conversion(format!("timestamp out of range: {secs}"))),
        other => Err(StoreError::Conversion(format!(
            "unsupported timestamp type: {}",
            other.data_type()
        ))),
    }
}

fn parse_timestamp_text(text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Ok(ts.with_timezone(&Utc));
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| StoreError::Conversion(format!("unrecognized timestamp: '{text}'")))
}

/// Formats an instant the way the seeder stores it.
pub(crate) fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
