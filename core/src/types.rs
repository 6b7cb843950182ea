//! Race entity definitions.
//!
//! A [`Race`] is a read-only projection of one stored row. The types are
//! designed for serialization with [`serde`] so they can be handed to any
//! transport without an intermediate shape.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a race, derived at read time.
///
/// # Examples
///
/// ```
/// use racing_core::RaceStatus;
///
/// assert_eq!(RaceStatus::Closed.as_str(), "CLOSED");
/// assert_eq!(serde_json::to_string(&RaceStatus::Open).unwrap(), "\"OPEN\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RaceStatus {
    /// The advertised start time has not passed yet.
    Open,
    /// The advertised start time is in the past.
    Closed,
}

impl RaceStatus {
    /// Derives the status of a race starting at `start`, evaluated at `now`.
    ///
    /// A race is closed only when `now` is strictly after the advertised
    /// start. A race evaluated at exactly its start instant is still open.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{Duration, Utc};
    /// use racing_core::RaceStatus;
    ///
    /// let now = Utc::now();
    /// assert_eq!(RaceStatus::at(now, now), RaceStatus::Open);
    /// assert_eq!(RaceStatus::at(now - Duration::seconds(1), now), RaceStatus::Closed);
    /// ```
    pub fn at(start: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if now > start {
            RaceStatus::Closed
        } else {
            RaceStatus::Open
        }
    }

    /// Returns the upper-case label used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            RaceStatus::Open => "OPEN",
            RaceStatus::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for RaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A race as returned by list and point lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Race {
    /// Unique race identifier.
    pub id: String,
    /// Identifier of the meeting this race belongs to.
    pub meeting_id: String,
    /// Display name.
    pub name: String,
    /// Race number within the meeting.
    pub number: i64,
    /// Whether the race is visible to punters.
    pub visible: bool,
    /// Scheduled start instant.
    pub advertised_start_time: DateTime<Utc>,
    /// Status derived from `advertised_start_time` when the race was read.
    pub status: RaceStatus,
}

impl Race {
    /// Returns `true` if the race had not started when it was read.
    pub fn is_open(&self) -> bool {
        self.status == RaceStatus::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 3, 2, 14, 30, 0).unwrap()
    }

    #[test]
    fn test_status_open_when_start_is_in_future() {
        let now = instant();
        assert_eq!(RaceStatus::at(now + Duration::minutes(5), now), RaceStatus::Open);
    }

    #[test]
    fn test_status_closed_when_start_is_in_past() {
        let now = instant();
        assert_eq!(RaceStatus::at(now - Duration::minutes(5), now), RaceStatus::Closed);
    }

    #[test]
    fn test_status_boundary_is_open() {
        let now = instant();
        assert_eq!(RaceStatus::at(now, now), RaceStatus::Open);
        assert_eq!(
            RaceStatus::at(now, now + Duration::nanoseconds(1)),
            RaceStatus::Closed
        );
    }

    #[test]
    fn test_race_serializes_status_label() {
        let race = Race {
            id: "1".to_string(),
            meeting_id: "5".to_string(),
            name: "Flemington Sprint".to_string(),
            number: 3,
            visible: true,
            advertised_start_time: instant(),
            status: RaceStatus::Closed,
        };
        let json = serde_json::to_value(&race).unwrap();
        assert_eq!(json["status"], "CLOSED");
        assert_eq!(json["meeting_id"], "5");
        assert!(!race.is_open());
    }
}
