//! Table creation and dummy-data seeding.
//!
//! [`Seeder`] is the seam [`RaceStore::init`](crate::RaceStore::init) runs
//! behind its one-time gate. [`DummySeeder`] creates the races table and
//! fills it with a deterministic set of races spread around a reference
//! instant, so a fresh database always has both open and closed races.
//!
//! All writes happen inside a single transaction. Seeding a table that
//! already holds rows inserts nothing.

use chrono::{DateTime, Duration, Utc};
use racing_core::{Race, RaceStatus};
use rusqlite::{Connection, params};
use tracing::{debug, info};

use crate::config::SeedConfig;
use crate::convert::format_timestamp;
use crate::error::{Result, StoreError};
use crate::schema::{RACE_COLUMNS, generate_schema_sql, validate_table_name};

const VENUES: [&str; 8] = [
    "Flemington",
    "Randwick",
    "Caulfield",
    "Eagle Farm",
    "Morphettville",
    "Ascot",
    "Rosehill",
    "Moonee Valley",
];

/// Prepares a races table before it is read.
///
/// Implementations run at most once per [`RaceStore`](crate::RaceStore).
pub trait Seeder: Send + Sync {
    /// Creates and/or populates `table` on the given connection.
    fn seed(&self, conn: &mut Connection, table: &str) -> Result<SeedReport>;
}

/// Report of a seed operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Whether the races table had to be created.
    pub table_created: bool,
    /// Number of races inserted.
    pub races_inserted: usize,
}

/// Snapshot of a races table, as returned by
/// [`RaceStore::status`](crate::RaceStore::status).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStatus {
    /// Whether the races table exists.
    pub table_exists: bool,
    /// Number of stored races.
    pub race_count: usize,
}

/// Seeds a deterministic set of dummy races.
///
/// # Examples
///
/// ```
/// use racing_sqlite::{DummySeeder, SeedConfig, Seeder};
/// use rusqlite::Connection;
///
/// let mut conn = Connection::open_in_memory().unwrap();
/// let seeder = DummySeeder::new(SeedConfig { races: 12, meetings: 3, spread_hours: 6 });
///
/// let report = seeder.seed(&mut conn, "races").unwrap();
/// assert!(report.table_created);
/// assert_eq!(report.races_inserted, 12);
///
/// // A populated table is left alone.
/// assert_eq!(seeder.seed(&mut conn, "races").unwrap().races_inserted, 0);
/// ```
#[derive(Debug, Clone)]
pub struct DummySeeder {
    config: SeedConfig,
    reference: Option<DateTime<Utc>>,
}

impl DummySeeder {
    /// Creates a seeder whose races are spread around the time of seeding.
    pub fn new(config: SeedConfig) -> Self {
        Self {
            config,
            reference: None,
        }
    }

    /// Spreads the races around a fixed instant instead of the seeding time.
    pub fn with_reference(mut self, reference: DateTime<Utc>) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Returns the races this seeder inserts when spread around `reference`.
    ///
    /// Fails with [`StoreError::Conversion`] when a start time falls outside
    /// the representable range.
    pub fn races(&self, reference: DateTime<Utc>) -> Result<Vec<Race>> {
        dummy_races(&self.config, reference)
    }
}

impl Seeder for DummySeeder {
    fn seed(&self, conn: &mut Connection, table: &str) -> Result<SeedReport> {
        let sql = generate_schema_sql(table)?;
        let reference = self.reference.unwrap_or_else(Utc::now);

        let races = dummy_races(&self.config, reference)?;

        let tx = conn.transaction()?;
        let mut report = SeedReport {
            table_created: !table_exists(&tx, table)?,
            races_inserted: 0,
        };
        tx.execute_batch(&sql)?;

        let existing = count_rows(&tx, table)?;
        if existing > 0 {
            debug!(table, existing, "Races table already populated; skipping seed");
        } else {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {table} ({RACE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
            ))?;
            for race in races {
                stmt.execute(params![
                    race.id,
                    race.meeting_id,
                    race.name,
                    race.number,
                    race.visible,
                    format_timestamp(race.advertised_start_time),
                ])?;
                report.races_inserted += 1;
            }
        }

        tx.commit()?;
        info!(
            table,
            created = report.table_created,
            inserted = report.races_inserted,
            "Seeded races table"
        );
        Ok(report)
    }
}

/// Reports whether `table` exists and how many races it holds.
pub(crate) fn table_status(conn: &Connection, table: &str) -> Result<TableStatus> {
    validate_table_name(table)?;
    if !table_exists(conn, table)? {
        return Ok(TableStatus {
            table_exists: false,
            race_count: 0,
        });
    }
    Ok(TableStatus {
        table_exists: true,
        race_count: count_rows(conn, table)?,
    })
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1")?;
    let count: i64 = stmt.query_row([table], |row| row.get(0))?;
    Ok(count > 0)
}

fn count_rows(conn: &Connection, table: &str) -> Result<usize> {
    let mut stmt = conn.prepare(&format!("SELECT COUNT(*) FROM {table}"))?;
    let count: i64 = stmt.query_row([], |row| row.get(0))?;
    usize::try_from(count)
        .map_err(|_| StoreError::Conversion(format!("negative row count {count} for '{table}'")))
}

/// Lays races out round-robin across meetings, with start times evenly
/// spaced from `spread_hours` before `reference` to just under
/// `spread_hours` after it.
fn dummy_races(config: &SeedConfig, reference: DateTime<Utc>) -> Result<Vec<Race>> {
    let meetings = config.meetings.max(1);
    let window = config.spread_hours.max(0).checked_mul(60).ok_or_else(|| {
        StoreError::Conversion(format!("spread_hours {} is out of range", config.spread_hours))
    })?;
    let total = i64::try_from(config.races.max(1))
        .map_err(|_| StoreError::Conversion(format!("races {} is out of range", config.races)))?;

    (0..config.races)
        .map(|i| {
            let meeting = i % meetings;
            let number = (i / meetings + 1) as i64;
            let start = start_time(reference, i, window, total).ok_or_else(|| {
                StoreError::Conversion(format!(
                    "start time of race {} is out of range (spread_hours {})",
                    i + 1,
                    config.spread_hours
                ))
            })?;
            Ok(Race {
                id: (i + 1).to_string(),
                meeting_id: (meeting + 1).to_string(),
                name: format!("{} Race {number}", VENUES[meeting % VENUES.len()]),
                number,
                visible: i % 3 != 0,
                advertised_start_time: start,
                status: RaceStatus::at(start, reference),
            })
        })
        .collect()
}

/// Start of race `index`: `reference - window + index * 2 * window / total`
/// minutes, or `None` on overflow.
fn start_time(
    reference: DateTime<Utc>,
    index: usize,
    window: i64,
    total: i64,
) -> Option<DateTime<Utc>> {
    let step = i64::try_from(index)
        .ok()?
        .checked_mul(2)?
        .checked_mul(window)?
        / total;
    let offset = step.checked_sub(window)?;
    reference.checked_add_signed(Duration::try_minutes(offset)?)
}
