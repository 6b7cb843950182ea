//! Read-only SQLite race store.
//!
//! This crate exposes [`RaceStore`], a repository over a pooled SQLite
//! database that lists races with optional filters and ordering, looks up
//! single races, and derives each race's [`RaceStatus`](racing_core::RaceStatus)
//! at read time.
//!
//! # Architecture
//!
//! - **`query`** — `WHERE` / `ORDER BY` construction with positional parameters
//! - **`convert`** — row-to-[`Race`](racing_core::Race) mapping and timestamp parsing
//! - **`store`** — the repository façade and its single-flight `init`
//! - **`seed`** — table creation and deterministic dummy data
//! - **`schema`** — DDL and base projection for a configurable table name
//! - **`config`** — YAML store configuration and pool construction
//!
//! # Quick start
//!
//! ```no_run
//! use racing_core::{ListFilter, ListOrder};
//! use racing_sqlite::StoreConfig;
//!
//! let config = StoreConfig::load("store.yml").unwrap_or_default();
//! let store = config.open_store().unwrap();
//! store.init().unwrap();
//!
//! let visible = ListFilter::default().with_visible(true);
//! let races = store
//!     .list(Some(&visible), Some(&ListOrder::by("name").with_direction("ASCENDING")))
//!     .unwrap();
//! println!("{} visible races", races.len());
//! ```

mod config;
mod convert;
mod error;
mod query;
mod schema;
mod seed;
mod store;

pub use config::{SeedConfig, StoreConfig};
pub use convert::{map_row, map_row_at};
pub use error::{Result, StoreError};
pub use query::{RaceQuery, build_get_query, build_list_query};
pub use schema::generate_schema_sql;
pub use seed::{DummySeeder, SeedReport, Seeder, TableStatus};
pub use store::RaceStore;
