//! Core race types and list request shapes.
//!
//! This crate defines the data model shared by the storage backend and the
//! command-line interface:
//!
//! - [`Race`] — a race projection with its derived [`RaceStatus`].
//! - [`ListFilter`] — optional meeting-id membership and visibility filters.
//! - [`ListOrder`] — optional sort column and direction, resolved through the
//!   closed [`SortField`] enumeration.
//!
//! Status is never stored. It is recomputed from the advertised start time
//! every time a race is read, see [`RaceStatus::at`].
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, Utc};
//! use racing_core::*;
//!
//! let start = Utc::now() + Duration::hours(2);
//! assert_eq!(RaceStatus::at(start, Utc::now()), RaceStatus::Open);
//!
//! let filter = ListFilter::default()
//!     .with_meeting_ids(["1", "4"])
//!     .with_visible(true);
//! assert!(filter.is_active());
//!
//! let order = ListOrder::by("name").with_direction("DESCENDING");
//! assert_eq!(order.sort_field().unwrap(), Some(SortField::Name));
//! assert_eq!(order.direction(), Some(OrderDirection::Descending));
//! ```

mod error;
mod request;
mod types;

pub use error::ValidationError;
pub use request::{ListFilter, ListOrder, OrderDirection, SortField};
pub use types::*;
