//! Read-only race repository over a pooled SQLite database.
//!
//! [`RaceStore`] sequences query construction, execution and row mapping
//! for listings and point lookups. The store owns no connection of its own:
//! callers hand it an `r2d2` pool and concurrent reads are left to the pool
//! and SQLite. The only state the store guards is its one-time seed.
//!
//! # Example
//!
//! ```no_run
//! use racing_core::{ListFilter, ListOrder};
//! use racing_sqlite::StoreConfig;
//!
//! let store = StoreConfig::default().open_store().unwrap();
//! store.init().unwrap();
//!
//! let filter = ListFilter::default().with_meeting_ids(["1"]).with_visible(true);
//! for race in store.list(Some(&filter), Some(&ListOrder::by("number"))).unwrap() {
//!     println!("{} {} {}", race.number, race.name, race.status);
//! }
//!
//! let race = store.get("1").unwrap();
//! println!("{} starts at {}", race.name, race.advertised_start_time);
//! ```

use std::sync::OnceLock;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use racing_core::{ListFilter, ListOrder, Race};
use rusqlite::params_from_iter;
use tracing::{debug, info, warn};

use crate::config::SeedConfig;
use crate::convert;
use crate::error::{Result, StoreError};
use crate::query::{RaceQuery, build_get_query, build_list_query};
use crate::schema::select_races_sql;
use crate::seed::{DummySeeder, SeedReport, Seeder, TableStatus, table_status};

/// Outcome of the one-time seed, replayed to every `init` caller.
type InitOutcome = std::result::Result<SeedReport, String>;

/// Race repository with single-flight initialization.
///
/// `RaceStore` is `Send + Sync`; share it behind an `Arc` or by reference
/// across threads.
pub struct RaceStore {
    pool: Pool<SqliteConnectionManager>,
    table: String,
    base_query: String,
    seeder: Box<dyn Seeder>,
    init: OnceLock<InitOutcome>,
}

impl RaceStore {
    /// Creates a store over `table` that seeds the default dummy races.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidTableName`] if the table name is invalid.
    pub fn new(pool: Pool<SqliteConnectionManager>, table: impl Into<String>) -> Result<Self> {
        Self::with_seeder(pool, table, DummySeeder::new(SeedConfig::default()))
    }

    /// Creates a store over `table` that runs `seeder` on first [`init`](Self::init).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidTableName`] if the table name is invalid.
    pub fn with_seeder(
        pool: Pool<SqliteConnectionManager>,
        table: impl Into<String>,
        seeder: impl Seeder + 'static,
    ) -> Result<Self> {
        let table = table.into();
        let base_query = select_races_sql(&table)?;
        Ok(Self {
            pool,
            table,
            base_query,
            seeder: Box::new(seeder),
            init: OnceLock::new(),
        })
    }

    /// Runs the seeder exactly once.
    ///
    /// Concurrent first callers block until the single run finishes. Every
    /// caller, including later ones, receives the same outcome: the same
    /// [`SeedReport`] on success, or an [`StoreError::Initialization`] with
    /// the same message on failure. A failed seed is not retried.
    pub fn init(&self) -> Result<SeedReport> {
        let outcome = self.init.get_or_init(|| {
            info!(table = %self.table, "Initializing race store");
            self.run_seed().map_err(|e| {
                warn!(table = %self.table, error = %e, "Race store seeding failed");
                e.to_string()
            })
        });

        match outcome {
            Ok(report) => Ok(report.clone()),
            Err(message) => Err(StoreError::Initialization(message.clone())),
        }
    }

    /// Returns `true` once [`init`](Self::init) has completed, successfully or not.
    pub fn is_initialized(&self) -> bool {
        self.init.get().is_some()
    }

    /// Lists races matching `filter`, ordered by `order`.
    ///
    /// Without an order, races are sorted by advertised start time,
    /// ascending. Races come back in the order the store returns them. No
    /// matching rows yields an empty vector.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidOrderField`] if `order` names an unsortable column.
    /// - [`StoreError::Execution`] if SQLite fails to run the query.
    /// - [`StoreError::Mapping`] / [`StoreError::Conversion`] if any row cannot
    ///   be mapped. No partial result is returned.
    pub fn list(&self, filter: Option<&ListFilter>, order: Option<&ListOrder>) -> Result<Vec<Race>> {
        let query = build_list_query(&self.base_query, filter, order)?;
        self.fetch(&query, convert::collect_races)
    }

    /// Looks up a single race by id.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] carrying `id` if no race matches.
    /// - [`StoreError::Execution`] if SQLite fails to run the query.
    /// - [`StoreError::Mapping`] / [`StoreError::Conversion`] if the row
    ///   cannot be mapped.
    pub fn get(&self, id: &str) -> Result<Race> {
        let query = build_get_query(&self.base_query, id);
        self.fetch(&query, convert::next_race)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Reports whether the races table exists and how many rows it holds.
    pub fn status(&self) -> Result<TableStatus> {
        let conn = self.pool.get()?;
        table_status(&conn, &self.table)
    }

    /// Returns the name of the races table.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the underlying connection pool.
    pub fn pool(&self) -> &Pool<SqliteConnectionManager> {
        &self.pool
    }

    fn run_seed(&self) -> Result<SeedReport> {
        let mut conn = self.pool.get()?;
        self.seeder.seed(&mut conn, &self.table)
    }

    /// Executes `query` and hands the row cursor to `scan`.
    fn fetch<T>(
        &self,
        query: &RaceQuery,
        scan: impl FnOnce(&mut rusqlite::Rows<'_>) -> Result<T>,
    ) -> Result<T> {
        debug!(query = %query.sql, args = query.args.len(), "Executing race query");
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&query.sql)?;
        let mut rows = stmt.query(params_from_iter(query.args.iter()))?;
        scan(&mut rows)
    }
}
