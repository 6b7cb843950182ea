//! List request shapes: filters and ordering.
//!
//! [`ListFilter`] and [`ListOrder`] mirror the transport messages a caller
//! sends. Ordering is accepted as free-form strings, but a column name only
//! ever reaches SQL after it has been resolved to a [`SortField`].

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Filters applied to a race listing.
///
/// Every predicate is optional. An empty `meeting_ids` list and an absent
/// `visible` flag leave the listing unfiltered.
///
/// # Examples
///
/// ```
/// use racing_core::ListFilter;
///
/// let filter = ListFilter::default();
/// assert!(!filter.is_active());
///
/// // An explicit `false` is a real filter (hidden races only).
/// let hidden = ListFilter::default().with_visible(false);
/// assert!(hidden.is_active());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFilter {
    /// Only races whose meeting id is in this list.
    #[serde(default)]
    pub meeting_ids: Vec<String>,
    /// Only races with this visibility.
    #[serde(default)]
    pub visible: Option<bool>,
}

impl ListFilter {
    /// Restricts the listing to the given meetings.
    pub fn with_meeting_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.meeting_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Restricts the listing to visible (or hidden) races.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    /// Returns `true` if at least one predicate would be applied.
    pub fn is_active(&self) -> bool {
        !self.meeting_ids.is_empty() || self.visible.is_some()
    }
}

/// Sort direction for an ordered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderDirection {
    Ascending,
    Descending,
}

impl OrderDirection {
    /// Parses a transport direction label.
    ///
    /// Only the exact labels `ASCENDING` and `DESCENDING` are recognized.
    /// Anything else yields `None` and the store's default direction applies.
    ///
    /// # Examples
    ///
    /// ```
    /// use racing_core::OrderDirection;
    ///
    /// assert_eq!(OrderDirection::parse("DESCENDING"), Some(OrderDirection::Descending));
    /// assert_eq!(OrderDirection::parse("descending"), None);
    /// assert_eq!(OrderDirection::parse(""), None);
    /// ```
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "ASCENDING" => Some(OrderDirection::Ascending),
            "DESCENDING" => Some(OrderDirection::Descending),
            _ => None,
        }
    }

    /// Returns the transport label.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderDirection::Ascending => "ASCENDING",
            OrderDirection::Descending => "DESCENDING",
        }
    }

    /// Returns the SQL keyword for this direction.
    pub fn sql_keyword(self) -> &'static str {
        match self {
            OrderDirection::Ascending => "ASC",
            OrderDirection::Descending => "DESC",
        }
    }
}

/// Race fields a listing can be ordered by.
///
/// Each variant maps to a fixed column identifier, so caller input never
/// reaches the generated SQL verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Id,
    MeetingId,
    Name,
    Number,
    Visible,
    AdvertisedStartTime,
}

impl SortField {
    /// All sortable fields, in column order.
    pub const ALL: [SortField; 6] = [
        SortField::Id,
        SortField::MeetingId,
        SortField::Name,
        SortField::Number,
        SortField::Visible,
        SortField::AdvertisedStartTime,
    ];

    /// Resolves a column name to a sortable field.
    ///
    /// Matching is ASCII case-insensitive and ignores surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownSortField`] for any name that is not
    /// a race column.
    ///
    /// # Examples
    ///
    /// ```
    /// use racing_core::SortField;
    ///
    /// assert_eq!(SortField::parse("Meeting_Id").unwrap(), SortField::MeetingId);
    /// assert!(SortField::parse("name; DROP TABLE races").is_err());
    /// ```
    pub fn parse(name: &str) -> Result<Self, ValidationError> {
        let trimmed = name.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.column().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ValidationError::UnknownSortField(name.to_string()))
    }

    /// Returns the column identifier for this field.
    pub fn column(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::MeetingId => "meeting_id",
            SortField::Name => "name",
            SortField::Number => "number",
            SortField::Visible => "visible",
            SortField::AdvertisedStartTime => "advertised_start_time",
        }
    }
}

/// Ordering requested for a race listing.
///
/// `order_by` and `direction` are kept as the caller sent them. Use
/// [`sort_field`](Self::sort_field) and [`direction`](Self::direction) to
/// interpret them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOrder {
    /// Column to order by.
    ///
    /// Absent, empty or whitespace-only selects the default ordering
    /// (`advertised_start_time` ascending) whatever `direction` says. An
    /// order with an empty column is never left unordered.
    #[serde(default)]
    pub order_by: Option<String>,
    /// `ASCENDING` or `DESCENDING`. Other values are ignored.
    #[serde(default)]
    pub direction: Option<String>,
}

impl ListOrder {
    /// Orders by the named column in the store's default direction.
    pub fn by(column: impl Into<String>) -> Self {
        Self {
            order_by: Some(column.into()),
            direction: None,
        }
    }

    /// Sets the requested direction label.
    pub fn with_direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = Some(direction.into());
        self
    }

    /// Resolves the requested column.
    ///
    /// Returns `Ok(None)` when no column was given (absent, empty or
    /// whitespace only).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownSortField`] if a column was given
    /// but does not name a sortable field.
    pub fn sort_field(&self) -> Result<Option<SortField>, ValidationError> {
        match self.order_by.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(name) => SortField::parse(name).map(Some),
        }
    }

    /// Returns the requested direction if it is one of the recognized labels.
    pub fn direction(&self) -> Option<OrderDirection> {
        self.direction.as_deref().and_then(OrderDirection::parse)
    }
}
