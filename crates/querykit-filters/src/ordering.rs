//! ORDER BY resolution against a filter catalog.

use std::fmt;

use crate::error::FilterError;
use crate::filter::Filter;
use crate::sql_builder::SortOrder;

/// A resolved ORDER BY term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Field expression taken from the catalog, never from the request
    pub field: String,
    pub direction: SortOrder,
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.direction.as_sql())
    }
}

/// Find the catalog filter whose name or field expression equals `field`,
/// ignoring ASCII case.
pub fn is_field_filter<'c>(catalog: &'c [Filter], field: &str) -> Option<&'c Filter> {
    catalog
        .iter()
        .find(|f| f.name.eq_ignore_ascii_case(field) || f.db_field.eq_ignore_ascii_case(field))
}

/// Resolve a requested sort field and direction against `catalog`.
///
/// The direction defaults to ascending unless it is `asc` or `desc` in any
/// case. A field the catalog does not know, or an empty one, falls back to
/// the first filter's field expression. The result only ever contains
/// programmer-declared field expressions, so it is safe to splice into SQL.
pub fn order_validation(
    order_by: &str,
    direction: &str,
    catalog: &[Filter],
) -> Result<OrderBy, FilterError> {
    let requested = order_by.trim().to_lowercase();
    let direction = SortOrder::parse(direction).unwrap_or(SortOrder::Asc);

    tracing::debug!(
        order_by = %requested,
        direction = direction.as_sql(),
        "validating order field"
    );

    let matched = if requested.is_empty() {
        None
    } else {
        is_field_filter(catalog, &requested)
    };

    let filter = match matched {
        Some(filter) => filter,
        None => {
            let first = catalog.first().ok_or(FilterError::EmptyCatalog)?;
            tracing::warn!(
                order_by = %requested,
                fallback = %first.db_field,
                "order by field is not a filter, using first filter instead"
            );
            first
        }
    };

    Ok(OrderBy {
        field: filter.db_field.clone(),
        direction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Operator;

    fn catalog() -> Vec<Filter> {
        vec![
            Filter::new("country", Operator::Eq, "country.name"),
            Filter::new("stars", Operator::In, "booking.stars"),
            Filter::new("total", Operator::Gt, "SUM(booking.price)"),
        ]
    }

    #[test]
    fn test_matches_filter_name() {
        let order = order_validation("Stars", "desc", &catalog()).unwrap();
        assert_eq!(order.field, "booking.stars");
        assert_eq!(order.direction, SortOrder::Desc);
        assert_eq!(order.to_string(), "booking.stars DESC");
    }

    #[test]
    fn test_matches_field_expression() {
        let order = order_validation("sum(booking.price)", "ASC", &catalog()).unwrap();
        assert_eq!(order.to_string(), "SUM(booking.price) ASC");
    }

    #[test]
    fn test_unknown_field_falls_back_to_first_filter() {
        let order = order_validation("1; DROP TABLE country", "up", &catalog()).unwrap();
        assert_eq!(order.to_string(), "country.name ASC");
    }

    #[test]
    fn test_empty_field_falls_back_to_first_filter() {
        let order = order_validation("", "DeSc", &catalog()).unwrap();
        assert_eq!(order.to_string(), "country.name DESC");
    }

    #[test]
    fn test_empty_catalog_is_an_error() {
        assert_eq!(
            order_validation("country", "asc", &[]),
            Err(FilterError::EmptyCatalog)
        );
    }

    #[test]
    fn test_is_field_filter() {
        let catalog = catalog();
        assert_eq!(
            is_field_filter(&catalog, "country.name").map(|f| f.name.as_str()),
            Some("country")
        );
        assert_eq!(
            is_field_filter(&catalog, "total").map(|f| f.db_field.as_str()),
            Some("SUM(booking.price)")
        );
        assert!(is_field_filter(&catalog, "price").is_none());
    }
}
