//! Predicate evaluation for in-memory document filtering.
//!
//! This module decides whether a stored document satisfies a query's predicates
//! and how two field values order against each other.

use bson::{Bson, Document as Fields, datetime::DateTime};
use std::{cmp::Ordering, convert::Infallible};

use docgate_core::{
    coerce::TypedValue,
    query::{CompareOp, FilterPredicate, PredicateVisitor, SortDirection, SortDirective},
};

/// Borrowed view of a BSON value for filtering and sorting.
///
/// All numeric types are normalized to `f64`, so `30`, `30i64` and `30.0`
/// compare equal. Arrays, embedded documents and the remaining BSON types are
/// collapsed into [`Comparable::Other`], which no filter value can match.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Comparable<'a> {
    Null,
    Number(f64),
    String(&'a str),
    DateTime(DateTime),
    Bool(bool),
    Other,
}

impl Comparable<'_> {
    /// Position of this value's kind in the sort order.
    fn rank(&self) -> u8 {
        match self {
            Comparable::Null => 0,
            Comparable::Number(_) => 1,
            Comparable::String(_) => 2,
            Comparable::DateTime(_) => 3,
            Comparable::Bool(_) => 4,
            Comparable::Other => 5,
        }
    }

    /// Orders two values of the same scalar kind, as filters see them.
    ///
    /// `None` for different kinds, for unorderable values and for NaN.
    fn filter_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Number(a), Comparable::Number(b)) => a.partial_cmp(b),
            (Comparable::String(a), Comparable::String(b)) => Some(a.cmp(b)),
            (Comparable::DateTime(a), Comparable::DateTime(b)) => Some(a.cmp(b)),
            (Comparable::Bool(a), Comparable::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(*value as f64),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::String(value) => Comparable::String(value),
            _ => Comparable::Other,
        }
    }
}

impl<'a> From<&'a TypedValue> for Comparable<'a> {
    fn from(value: &'a TypedValue) -> Self {
        match value {
            TypedValue::Integer(value) => Comparable::Number(*value as f64),
            TypedValue::Float(value) => Comparable::Number(*value),
            TypedValue::String(value) => Comparable::String(value),
        }
    }
}

/// Total sort order: kinds rank Null < Number < String < DateTime < Bool < Other,
/// numbers follow [`f64::total_cmp`] and all `Other` values tie.
impl Ord for Comparable<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Comparable::Number(a), Comparable::Number(b)) => a.total_cmp(b),
            _ => self
                .filter_cmp(other)
                .unwrap_or_else(|| self.rank().cmp(&other.rank())),
        }
    }
}

impl PartialOrd for Comparable<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Comparable<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for Comparable<'_> {}

/// Checks predicates against a single document.
pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Fields,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Fields) -> Self {
        Self { document }
    }

    /// True when every predicate holds.
    pub fn matches_all(&mut self, predicates: &[FilterPredicate]) -> bool {
        predicates
            .iter()
            .all(|predicate| matches!(self.visit_predicate(predicate), Ok(true)))
    }
}

impl PredicateVisitor for DocumentEvaluator<'_> {
    type Output = bool;
    type Error = Infallible;

    fn visit_compare(
        &mut self,
        field: &str,
        op: CompareOp,
        value: &TypedValue,
    ) -> Result<Self::Output, Self::Error> {
        let Some(field_value) = self.document.get(field) else {
            return Ok(false);
        };
        let Some(ordering) = Comparable::from(field_value).filter_cmp(&Comparable::from(value)) else {
            return Ok(false);
        };

        Ok(match op {
            CompareOp::Eq => ordering.is_eq(),
            CompareOp::Gt => ordering.is_gt(),
            CompareOp::Gte => ordering.is_ge(),
            CompareOp::Lt => ordering.is_lt(),
            CompareOp::Lte => ordering.is_le(),
        })
    }

    fn visit_in(&mut self, field: &str, values: &[TypedValue]) -> Result<Self::Output, Self::Error> {
        Ok(self
            .document
            .get(field)
            .is_some_and(|field_value| values_contain(values, &Comparable::from(field_value))))
    }
}

fn values_contain(values: &[TypedValue], candidate: &Comparable<'_>) -> bool {
    values
        .iter()
        .any(|value| candidate.filter_cmp(&Comparable::from(value)) == Some(Ordering::Equal))
}

/// Orders two documents by a list of sort directives, most significant first.
///
/// Values of different kinds order by kind, so any mix of values sorts consistently.
pub(crate) fn compare_documents(a: &Fields, b: &Fields, sort: &[SortDirective]) -> Ordering {
    sort.iter()
        .map(|directive| {
            let left = a.get(&directive.field).map(Comparable::from).unwrap_or(Comparable::Null);
            let right = b.get(&directive.field).map(Comparable::from).unwrap_or(Comparable::Null);

            match directive.direction {
                SortDirection::Ascending => left.cmp(&right),
                SortDirection::Descending => right.cmp(&left),
            }
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}
