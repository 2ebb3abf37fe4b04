//! Typed query model shared by the parsers, the orchestrator and the store backends.
//!
//! A request is translated once into an immutable [`QuerySpec`]. The backend never
//! sees the whole spec, only the [`StoreQuery`] view of it: predicates, ordering and
//! the number of documents to fetch. Projection and the final offset slice stay on
//! the adapter side.
//!
//! # Predicate visitors
//!
//! Backends translate or evaluate predicates through [`PredicateVisitor`], which
//! splits a predicate into the scalar comparison and `in` membership cases.

use std::fmt;

use crate::{coerce::TypedValue, page::PaginationSpec};

/// Every operator a filter key can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOp {
    /// `==`
    Eq,
    /// `>=`
    Gte,
    /// `<=`
    Lte,
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `in`, membership in a list of values.
    In,
}

impl FilterOp {
    /// The operator symbol as it appears in error messages.
    pub fn symbol(&self) -> &'static str {
        match self {
            FilterOp::Eq => "==",
            FilterOp::Gte => ">=",
            FilterOp::Lte => "<=",
            FilterOp::Gt => ">",
            FilterOp::Lt => "<",
            FilterOp::In => "in",
        }
    }

    /// Whether this is one of the four ordering comparisons.
    pub fn is_range(&self) -> bool {
        matches!(self, FilterOp::Gte | FilterOp::Lte | FilterOp::Gt | FilterOp::Lt)
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The operators that compare a field against a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Gte,
    Lte,
    Gt,
    Lt,
}

impl From<CompareOp> for FilterOp {
    fn from(op: CompareOp) -> Self {
        match op {
            CompareOp::Eq => FilterOp::Eq,
            CompareOp::Gte => FilterOp::Gte,
            CompareOp::Lte => FilterOp::Lte,
            CompareOp::Gt => FilterOp::Gt,
            CompareOp::Lt => FilterOp::Lt,
        }
    }
}

/// What a predicate requires of its field.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// The field compares to a single value.
    Compare(CompareOp, TypedValue),
    /// The field equals one of the listed values.
    In(Vec<TypedValue>),
}

/// A single `field <op> operand` comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPredicate {
    field: String,
    condition: Condition,
}

impl FilterPredicate {
    fn compare(field: impl Into<String>, op: CompareOp, value: TypedValue) -> Self {
        Self { field: field.into(), condition: Condition::Compare(op, value) }
    }

    /// `field == value`
    pub fn eq(field: impl Into<String>, value: TypedValue) -> Self {
        Self::compare(field, CompareOp::Eq, value)
    }

    /// `field >= value`
    pub fn gte(field: impl Into<String>, value: TypedValue) -> Self {
        Self::compare(field, CompareOp::Gte, value)
    }

    /// `field <= value`
    pub fn lte(field: impl Into<String>, value: TypedValue) -> Self {
        Self::compare(field, CompareOp::Lte, value)
    }

    /// `field > value`
    pub fn gt(field: impl Into<String>, value: TypedValue) -> Self {
        Self::compare(field, CompareOp::Gt, value)
    }

    /// `field < value`
    pub fn lt(field: impl Into<String>, value: TypedValue) -> Self {
        Self::compare(field, CompareOp::Lt, value)
    }

    /// `field in [values...]`
    pub fn is_in(field: impl Into<String>, values: impl IntoIterator<Item = TypedValue>) -> Self {
        Self {
            field: field.into(),
            condition: Condition::In(values.into_iter().collect()),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn op(&self) -> FilterOp {
        match self.condition {
            Condition::Compare(op, _) => op.into(),
            Condition::In(_) => FilterOp::In,
        }
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }
}

impl fmt::Display for FilterPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.condition {
            Condition::Compare(_, value) => write!(f, "{} {} {}", self.field, self.op(), value),
            Condition::In(values) => {
                write!(f, "{} {} [", self.field, self.op())?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Sort direction for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending order (A to Z, 0 to 9).
    Ascending,
    /// Descending order (Z to A, 9 to 0).
    Descending,
}

/// One ordering key of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortDirective {
    /// The field name to sort by.
    pub field: String,
    /// The sort direction.
    pub direction: SortDirection,
}

impl SortDirective {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self { field: field.into(), direction }
    }
}

/// The subset of fields a client asked to receive.
///
/// Names keep their request order and duplicates are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectionSpec {
    fields: Vec<String>,
}

impl ProjectionSpec {
    pub fn new(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut spec = Self::default();
        for field in fields {
            let field = field.into();
            if !spec.fields.contains(&field) {
                spec.fields.push(field);
            }
        }
        spec
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Everything the adapter extracted from one request.
///
/// Built once, never mutated, dropped with the response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuerySpec {
    /// Predicates in the order their keys appeared in the query string.
    pub filters: Vec<FilterPredicate>,
    /// Ordering keys, most significant first.
    pub sort: Vec<SortDirective>,
    /// Validated page bounds.
    pub pagination: PaginationSpec,
    /// Requested fields, or `None` for whole documents.
    pub projection: Option<ProjectionSpec>,
}

impl QuerySpec {
    /// The backend-facing view of this spec, fetching at most `limit` documents.
    pub fn store_query(&self, limit: usize) -> StoreQuery<'_> {
        StoreQuery { filters: &self.filters, sort: &self.sort, limit }
    }
}

/// The narrow query a backend executes: predicates, ordering and a fetch size.
///
/// Backends have no notion of an offset; paging past the first documents is done
/// by the adapter.
#[derive(Debug, Clone, Copy)]
pub struct StoreQuery<'a> {
    pub filters: &'a [FilterPredicate],
    pub sort: &'a [SortDirective],
    pub limit: usize,
}

/// Visits the two shapes of [`FilterPredicate`].
pub trait PredicateVisitor {
    type Output;
    type Error;

    fn visit_compare(
        &mut self,
        field: &str,
        op: CompareOp,
        value: &TypedValue,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_in(&mut self, field: &str, values: &[TypedValue]) -> Result<Self::Output, Self::Error>;

    fn visit_predicate(&mut self, predicate: &FilterPredicate) -> Result<Self::Output, Self::Error> {
        match predicate.condition() {
            Condition::Compare(op, value) => self.visit_compare(predicate.field(), *op, value),
            Condition::In(values) => self.visit_in(predicate.field(), values),
        }
    }
}
