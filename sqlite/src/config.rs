//! Store configuration.
//!
//! Defines the YAML-serializable settings used to open a [`RaceStore`]:
//! which database file to use, which table holds the races, how large the
//! connection pool is, and what the one-time seed should insert.
//!
//! # Example YAML
//!
//! ```yaml
//! database: races.db
//! table: races
//! pool_size: 4
//! seed:
//!   races: 100
//!   meetings: 10
//!   spread_hours: 48
//! ```
//!
//! Every key is optional; missing keys take their default.

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::seed::DummySeeder;
use crate::store::RaceStore;

/// Settings for the dummy races inserted on first initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Number of races to insert.
    pub races: usize,
    /// Number of meetings the races are spread across.
    pub meetings: usize,
    /// Start times range from this many hours before seeding to this many after.
    pub spread_hours: i64,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            races: 100,
            meetings: 10,
            spread_hours: 48,
        }
    }
}

/// Top-level store configuration.
///
/// # Examples
///
/// ```
/// use racing_sqlite::StoreConfig;
///
/// let config: StoreConfig = serde_yaml::from_str("table: spring_carnival").unwrap();
/// assert_eq!(config.table, "spring_carnival");
/// assert_eq!(config.pool_size, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database file.
    pub database: PathBuf,
    /// Name of the races table.
    pub table: String,
    /// Maximum number of pooled connections.
    pub pool_size: u32,
    /// Dummy data inserted by `init` when the table is empty.
    pub seed: SeedConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("races.db"),
            table: "races".to_string(),
            pool_size: 4,
            seed: SeedConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::StoreError::Io) if the file cannot be read, or
    /// [`Yaml`](crate::StoreError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::StoreError::Io) if the file cannot be written,
    /// or [`Yaml`](crate::StoreError::Yaml) if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Builds a connection pool over the configured database file.
    ///
    /// # Errors
    ///
    /// Returns [`Pool`](crate::StoreError::Pool) if the pool cannot open its
    /// initial connections.
    pub fn build_pool(&self) -> Result<Pool<SqliteConnectionManager>> {
        debug!(database = %self.database.display(), pool_size = self.pool_size, "Opening pool");
        let manager = SqliteConnectionManager::file(&self.database);
        let pool = Pool::builder()
            .max_size(self.pool_size.max(1))
            .build(manager)?;
        Ok(pool)
    }

    /// Opens a [`RaceStore`] seeded with [`DummySeeder`].
    ///
    /// The store is not initialized; call [`RaceStore::init`] before reading.
    pub fn open_store(&self) -> Result<RaceStore> {
        let pool = self.build_pool()?;
        RaceStore::with_seeder(pool, &self.table, DummySeeder::new(self.seed.clone()))
    }
}
