//! Structural limits on the predicates this store will evaluate.
//!
//! The limits mirror those of hosted document stores: a query may use at most one
//! `in` predicate with at most [`MAX_IN_VALUES`] values, and range predicates may
//! only target a single field. Violations are reported before any document is
//! scanned, naming the offending predicate.

use docgate_core::{
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Condition, FilterPredicate},
};

/// Largest value list an `in` predicate may carry.
pub const MAX_IN_VALUES: usize = 30;

fn reject(predicate: &FilterPredicate, message: impl Into<String>) -> DocumentStoreError {
    DocumentStoreError::InvalidFilter {
        predicate: predicate.clone(),
        message: message.into(),
    }
}

/// Checks a query's predicates against the store's limits.
pub fn validate_filters(filters: &[FilterPredicate]) -> DocumentStoreResult<()> {
    let mut seen_in = false;
    let mut range_field: Option<&str> = None;

    for predicate in filters {
        if predicate.field().is_empty() {
            return Err(reject(predicate, "field name must not be empty"));
        }

        if let Condition::In(values) = predicate.condition() {
            if seen_in {
                return Err(reject(predicate, "at most one 'in' filter is allowed per query"));
            }
            seen_in = true;

            if values.len() > MAX_IN_VALUES {
                return Err(reject(
                    predicate,
                    format!("'in' filters accept at most {MAX_IN_VALUES} values"),
                ));
            }
        }

        if predicate.op().is_range() {
            match range_field {
                Some(field) if field != predicate.field() => {
                    return Err(reject(
                        predicate,
                        format!("range filters are limited to a single field, already filtering on '{field}'"),
                    ));
                }
                _ => range_field = Some(predicate.field()),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docgate_core::coerce::TypedValue;

    fn ints(count: i64) -> impl Iterator<Item = TypedValue> {
        (0..count).map(TypedValue::Integer)
    }

    #[test]
    fn accepts_ranges_on_one_field() {
        let filters = [
            FilterPredicate::gte("age", TypedValue::Integer(18)),
            FilterPredicate::lt("age", TypedValue::Integer(65)),
            FilterPredicate::eq("name", TypedValue::String("A".into())),
            FilterPredicate::is_in("status", ints(MAX_IN_VALUES as i64)),
        ];

        assert!(validate_filters(&filters).is_ok());
    }

    #[test]
    fn rejects_ranges_on_two_fields() {
        let second = FilterPredicate::lt("score", TypedValue::Integer(5));
        let filters = [FilterPredicate::gt("age", TypedValue::Integer(1)), second.clone()];

        let err = validate_filters(&filters).unwrap_err();
        assert!(matches!(err, DocumentStoreError::InvalidFilter { predicate, .. } if predicate == second));
    }

    #[test]
    fn rejects_a_second_in() {
        let filters = [
            FilterPredicate::is_in("a", ints(2)),
            FilterPredicate::is_in("b", ints(2)),
        ];

        let err = validate_filters(&filters).unwrap_err();
        assert!(err.to_string().contains("at most one 'in' filter"));
    }

    #[test]
    fn rejects_oversized_in_lists() {
        let filters = [FilterPredicate::is_in("a", ints(MAX_IN_VALUES as i64 + 1))];
        assert!(validate_filters(&filters).is_err());
    }

    #[test]
    fn rejects_empty_field_names() {
        let filters = [FilterPredicate::eq("", TypedValue::Integer(1))];
        assert!(validate_filters(&filters).is_err());
    }
}
