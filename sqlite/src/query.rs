//! SQL construction for race listings and point lookups.
//!
//! [`build_list_query`] extends a base projection with an optional `WHERE`
//! clause and an `ORDER BY` clause, collecting positional parameters as it
//! goes. Predicates are always appended in the same order (meeting ids,
//! then visibility) so the parameter list has a predictable shape.
//!
//! # Example
//!
//! ```
//! use racing_core::{ListFilter, ListOrder};
//! use racing_sqlite::build_list_query;
//!
//! let filter = ListFilter::default().with_meeting_ids(["1", "2"]).with_visible(true);
//! let order = ListOrder::by("name").with_direction("DESCENDING");
//! let query = build_list_query("SELECT * FROM races", Some(&filter), Some(&order)).unwrap();
//!
//! assert_eq!(
//!     query.sql,
//!     "SELECT * FROM races WHERE meeting_id IN (?, ?) AND visible = ? ORDER BY name DESC"
//! );
//! assert_eq!(query.args.len(), 3);
//! ```

use racing_core::{ListFilter, ListOrder, OrderDirection, SortField};
use rusqlite::types::Value;

use crate::error::Result;

/// Ordering applied when the caller does not name a column.
const DEFAULT_SORT: (SortField, OrderDirection) =
    (SortField::AdvertisedStartTime, OrderDirection::Ascending);

/// A statement ready for execution: SQL text plus positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RaceQuery {
    /// SQL with one `?` placeholder per entry in `args`.
    pub sql: String,
    /// Parameter values in placeholder order.
    pub args: Vec<Value>,
}

/// Builds a listing query from `base`, an optional filter and an optional order.
///
/// No row limit is applied.
///
/// # Errors
///
/// Returns [`StoreError::InvalidOrderField`](crate::StoreError::InvalidOrderField)
/// if the order names a column that is not a sortable race field.
pub fn build_list_query(
    base: &str,
    filter: Option<&ListFilter>,
    order: Option<&ListOrder>,
) -> Result<RaceQuery> {
    let mut query = RaceQuery {
        sql: base.to_string(),
        args: Vec::new(),
    };
    apply_filter(&mut query, filter);
    apply_order(&mut query, order)?;
    Ok(query)
}

/// Builds a point lookup for a single race id.
///
/// The id is matched exactly and no ordering is applied.
pub fn build_get_query(base: &str, id: &str) -> RaceQuery {
    RaceQuery {
        sql: format!("{base} WHERE id = ?"),
        args: vec![Value::Text(id.to_string())],
    }
}

fn apply_filter(query: &mut RaceQuery, filter: Option<&ListFilter>) {
    let Some(filter) = filter else {
        return;
    };

    let mut clauses = Vec::new();

    if !filter.meeting_ids.is_empty() {
        let placeholders = vec!["?"; filter.meeting_ids.len()].join(", ");
        clauses.push(format!("meeting_id IN ({placeholders})"));
        query
            .args
            .extend(filter.meeting_ids.iter().cloned().map(Value::Text));
    }

    if let Some(visible) = filter.visible {
        clauses.push("visible = ?".to_string());
        query.args.push(Value::from(visible));
    }

    if !clauses.is_empty() {
        query.sql.push_str(" WHERE ");
        query.sql.push_str(&clauses.join(" AND "));
    }
}

fn apply_order(query: &mut RaceQuery, order: Option<&ListOrder>) -> Result<()> {
    let requested = match order {
        Some(order) => order.sort_field()?.map(|field| (field, order.direction())),
        None => None,
    };

    let (field, direction) = match requested {
        Some(sort) => sort,
        None => (DEFAULT_SORT.0, Some(DEFAULT_SORT.1)),
    };

    query.sql.push_str(" ORDER BY ");
    query.sql.push_str(field.column());
    if let Some(direction) = direction {
        query.sql.push(' ');
        query.sql.push_str(direction.sql_keyword());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreError;

    const BASE: &str = "SELECT id FROM races";

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn test_no_filter_no_order_uses_default_order() {
        let query = build_list_query(BASE, None, None).unwrap();
        assert_eq!(
            query.sql,
            "SELECT id FROM races ORDER BY advertised_start_time ASC"
        );
        assert!(query.args.is_empty());
    }

    #[test]
    fn test_empty_filter_adds_no_where_clause() {
        let query = build_list_query(BASE, Some(&ListFilter::default()), None).unwrap();
        assert!(!query.sql.contains("WHERE"));
        assert!(query.args.is_empty());
    }

    #[test]
    fn test_meeting_ids_one_placeholder_each() {
        for n in 1..=5 {
            let ids: Vec<String> = (0..n).map(|i| format!("m{i}")).collect();
            let filter = ListFilter::default().with_meeting_ids(ids.clone());
            let query = build_list_query(BASE, Some(&filter), None).unwrap();

            assert_eq!(query.sql.matches('?').count(), n);
            let expected: Vec<Value> = ids.iter().map(|id| text(id)).collect();
            assert_eq!(query.args, expected);
        }
    }

    #[test]
    fn test_meeting_ids_clause_shape() {
        let filter = ListFilter::default().with_meeting_ids(["3", "1", "2"]);
        let query = build_list_query(BASE, Some(&filter), None).unwrap();
        assert_eq!(
            query.sql,
            "SELECT id FROM races WHERE meeting_id IN (?, ?, ?) ORDER BY advertised_start_time ASC"
        );
        assert_eq!(query.args, vec![text("3"), text("1"), text("2")]);
    }

    #[test]
    fn test_visible_false_is_applied() {
        let filter = ListFilter::default().with_visible(false);
        let query = build_list_query(BASE, Some(&filter), None).unwrap();
        assert!(query.sql.contains(" WHERE visible = ?"));
        assert_eq!(query.args, vec![Value::Integer(0)]);
    }

    #[test]
    fn test_filters_joined_with_and_in_fixed_order() {
        let filter = ListFilter::default()
            .with_visible(true)
            .with_meeting_ids(["7"]);
        let query = build_list_query(BASE, Some(&filter), None).unwrap();
        assert!(
            query
                .sql
                .contains(" WHERE meeting_id IN (?) AND visible = ?")
        );
        assert_eq!(query.args, vec![text("7"), Value::Integer(1)]);
    }

    #[test]
    fn test_order_by_with_recognized_direction() {
        let order = ListOrder::by("number").with_direction("ASCENDING");
        let query = build_list_query(BASE, None, Some(&order)).unwrap();
        assert!(query.sql.ends_with(" ORDER BY number ASC"));

        let order = ListOrder::by("number").with_direction("DESCENDING");
        let query = build_list_query(BASE, None, Some(&order)).unwrap();
        assert!(query.sql.ends_with(" ORDER BY number DESC"));
    }

    #[test]
    fn test_order_by_drops_unrecognized_direction() {
        for direction in ["", "asc", "SIDEWAYS", "DESC"] {
            let order = ListOrder::by("name").with_direction(direction);
            let query = build_list_query(BASE, None, Some(&order)).unwrap();
            assert!(query.sql.ends_with(" ORDER BY name"), "{}", query.sql);
        }
        let query = build_list_query(BASE, None, Some(&ListOrder::by("name"))).unwrap();
        assert!(query.sql.ends_with(" ORDER BY name"));
    }

    #[test]
    fn test_missing_column_uses_default_regardless_of_direction() {
        let orders = [
            ListOrder::default(),
            ListOrder::default().with_direction("DESCENDING"),
            ListOrder::by("").with_direction("DESCENDING"),
        ];
        for order in &orders {
            let query = build_list_query(BASE, None, Some(order)).unwrap();
            assert!(query.sql.ends_with(" ORDER BY advertised_start_time ASC"));
        }
    }

    #[test]
    fn test_unknown_order_column_is_rejected() {
        let order = ListOrder::by("name; DROP TABLE races");
        let err = build_list_query(BASE, None, Some(&order)).unwrap_err();
        assert!(matches!(err, StoreError::InvalidOrderField(_)));
    }

    #[test]
    fn test_get_query_matches_single_id() {
        let query = build_get_query(BASE, "42");
        assert_eq!(query.sql, "SELECT id FROM races WHERE id = ?");
        assert_eq!(query.args, vec![text("42")]);
    }
}
