//! Query-string parsing: filters, ordering, page bounds and projection.
//!
//! Every function here is pure. The orchestrator calls them in a fixed order and
//! stops at the first error.
//!
//! # Filter keys
//!
//! A key's suffix picks the comparison operator, checked against
//! [`OPERATOR_SUFFIXES`] in order so that `_gte` wins over `_gt`:
//!
//! | Query string          | Predicate                   |
//! |-----------------------|-----------------------------|
//! | `age=30`              | `age == 30`                 |
//! | `age_gte=18`          | `age >= 18`                 |
//! | `price_lt=9.5`        | `price < 9.5`               |
//! | `status_in=new,done`  | `status in ["new", "done"]` |
//!
//! A key that merely looks malformed (`age_gtx`, `_gte`) is not an error. It
//! becomes an equality or range filter on whatever field name is left over.

use std::{collections::HashSet, num::IntErrorKind};

use crate::{
    coerce::coerce,
    error::{QueryError, QueryResult},
    page::{DEFAULT_LIMIT, MAX_LIMIT, MIN_LIMIT, PaginationSpec},
    query::{FilterOp, FilterPredicate, ProjectionSpec, SortDirection, SortDirective},
};

pub const LIMIT_KEY: &str = "limit";
pub const OFFSET_KEY: &str = "offset";
pub const ORDER_BY_KEY: &str = "order_by";
pub const FIELDS_KEY: &str = "fields";

/// Control keys that are never treated as filters.
pub const RESERVED_KEYS: [&str; 4] = [LIMIT_KEY, OFFSET_KEY, ORDER_BY_KEY, FIELDS_KEY];

/// Separator for `_in` values, `order_by` and `fields`.
const LIST_SEPARATOR: char = ',';

/// Maps a key suffix to the operator it selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuffixRule {
    pub suffix: &'static str,
    pub op: FilterOp,
}

impl SuffixRule {
    /// Number of trailing characters removed to get the field name.
    pub const fn strip_len(&self) -> usize {
        self.suffix.len()
    }

    /// Returns the field name if `key` ends with this rule's suffix.
    pub fn field_of<'k>(&self, key: &'k str) -> Option<&'k str> {
        key.strip_suffix(self.suffix)
    }
}

/// Operator suffixes, longest first. Keys without a match are equality filters.
pub const OPERATOR_SUFFIXES: [SuffixRule; 5] = [
    SuffixRule { suffix: "_gte", op: FilterOp::Gte },
    SuffixRule { suffix: "_lte", op: FilterOp::Lte },
    SuffixRule { suffix: "_gt", op: FilterOp::Gt },
    SuffixRule { suffix: "_lt", op: FilterOp::Lt },
    SuffixRule { suffix: "_in", op: FilterOp::In },
];

/// Splits a filter key into its field name and operator.
pub fn resolve_operator(key: &str) -> (&str, FilterOp) {
    OPERATOR_SUFFIXES
        .iter()
        .find_map(|rule| rule.field_of(key).map(|field| (field, rule.op)))
        .unwrap_or((key, FilterOp::Eq))
}

/// Query-string parameters in request order, one value per key.
///
/// When a key repeats, its first value is kept and later ones are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParams {
    pairs: Vec<(String, String)>,
    seen: HashSet<String>,
}

impl RawParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pair unless the key is already present.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        if self.seen.insert(key.clone()) {
            self.pairs.push((key, value.into()));
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = RawParams::new();
        for (key, value) in iter {
            params.push(key, value);
        }
        params
    }
}

/// Turns every non-reserved parameter into a predicate, in parameter order.
pub fn parse_filters(params: &RawParams) -> Vec<FilterPredicate> {
    params
        .iter()
        .filter(|(key, _)| !RESERVED_KEYS.contains(key))
        .map(|(key, value)| match resolve_operator(key) {
            (field, FilterOp::In) => {
                FilterPredicate::is_in(field, value.split(LIST_SEPARATOR).map(coerce))
            }
            (field, FilterOp::Eq) => FilterPredicate::eq(field, coerce(value)),
            (field, FilterOp::Gte) => FilterPredicate::gte(field, coerce(value)),
            (field, FilterOp::Lte) => FilterPredicate::lte(field, coerce(value)),
            (field, FilterOp::Gt) => FilterPredicate::gt(field, coerce(value)),
            (field, FilterOp::Lt) => FilterPredicate::lt(field, coerce(value)),
        })
        .collect()
}

/// Parses an `order_by` directive such as `-age,name`.
///
/// Leading dashes select descending order and are all stripped from the field
/// name. Empty tokens are skipped. Field names are not checked.
pub fn parse_sort(directive: Option<&str>) -> Vec<SortDirective> {
    directive
        .unwrap_or_default()
        .split(LIST_SEPARATOR)
        .filter(|token| !token.is_empty())
        .map(|token| {
            let direction = if token.starts_with('-') {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            SortDirective::new(token.trim_start_matches('-'), direction)
        })
        .collect()
}

/// Parses and bounds-checks `limit` and `offset`.
///
/// The limit is validated completely before the offset is looked at, so a
/// request with two bad values reports the limit.
pub fn parse_pagination(limit_raw: Option<&str>, offset_raw: Option<&str>) -> QueryResult<PaginationSpec> {
    let limit = match limit_raw {
        None => DEFAULT_LIMIT,
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(value) => usize::try_from(value)
                .ok()
                .filter(|value| (MIN_LIMIT..=MAX_LIMIT).contains(value))
                .ok_or(QueryError::InvalidLimit("must be between 1 and 1000"))?,
            Err(err) if is_overflow(err.kind()) => {
                return Err(QueryError::InvalidLimit("must be between 1 and 1000"));
            }
            Err(_) => return Err(QueryError::InvalidLimit("must be an integer")),
        },
    };

    let offset = match offset_raw {
        None => 0,
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(value) if value < 0 => return Err(QueryError::InvalidOffset("must be >= 0")),
            Ok(value) => usize::try_from(value).unwrap_or(usize::MAX),
            Err(err) if *err.kind() == IntErrorKind::PosOverflow => usize::MAX,
            Err(err) if *err.kind() == IntErrorKind::NegOverflow => {
                return Err(QueryError::InvalidOffset("must be >= 0"));
            }
            Err(_) => return Err(QueryError::InvalidOffset("must be an integer")),
        },
    };

    Ok(PaginationSpec::new(limit, offset))
}

fn is_overflow(kind: &IntErrorKind) -> bool {
    matches!(kind, IntErrorKind::PosOverflow | IntErrorKind::NegOverflow)
}

/// Parses a `fields` list. Names are trimmed; an empty list means no projection.
pub fn parse_projection(fields: Option<&str>) -> Option<ProjectionSpec> {
    let projection = ProjectionSpec::new(
        fields?
            .split(LIST_SEPARATOR)
            .map(str::trim)
            .filter(|field| !field.is_empty()),
    );

    (!projection.is_empty()).then_some(projection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{coerce::TypedValue, query::Condition};

    fn params(pairs: &[(&str, &str)]) -> RawParams {
        pairs.iter().copied().collect()
    }

    #[test]
    fn suffix_table_is_longest_first() {
        for (i, rule) in OPERATOR_SUFFIXES.iter().enumerate() {
            assert_eq!(rule.strip_len(), rule.suffix.len());
            for later in &OPERATOR_SUFFIXES[i + 1..] {
                assert!(
                    !later.suffix.ends_with(rule.suffix),
                    "{} would never match after {}",
                    later.suffix,
                    rule.suffix
                );
            }
        }
    }

    #[test]
    fn resolves_every_suffix() {
        assert_eq!(resolve_operator("age_gte"), ("age", FilterOp::Gte));
        assert_eq!(resolve_operator("age_lte"), ("age", FilterOp::Lte));
        assert_eq!(resolve_operator("age_gt"), ("age", FilterOp::Gt));
        assert_eq!(resolve_operator("age_lt"), ("age", FilterOp::Lt));
        assert_eq!(resolve_operator("tag_in"), ("tag", FilterOp::In));
        assert_eq!(resolve_operator("age"), ("age", FilterOp::Eq));
    }

    #[test]
    fn gte_never_parses_as_gt() {
        let filters = parse_filters(&params(&[("age_gte", "18")]));
        assert_eq!(filters, vec![FilterPredicate::gte("age", TypedValue::Integer(18))]);
    }

    #[test]
    fn malformed_suffixes_become_odd_field_names() {
        assert_eq!(resolve_operator("age_gtx"), ("age_gtx", FilterOp::Eq));
        assert_eq!(resolve_operator("_gte"), ("", FilterOp::Gte));
        assert_eq!(resolve_operator("max_in_gt"), ("max_in", FilterOp::Gt));
    }

    #[test]
    fn reserved_keys_are_never_filters() {
        let filters = parse_filters(&params(&[
            ("limit", "5"),
            ("offset", "abc"),
            ("order_by", "-age"),
            ("fields", "name"),
            ("name", "A"),
        ]));
        assert_eq!(filters, vec![FilterPredicate::eq("name", TypedValue::String("A".into()))]);
    }

    #[test]
    fn reserved_names_with_suffixes_are_filters() {
        let filters = parse_filters(&params(&[("limit_gt", "5")]));
        assert_eq!(filters, vec![FilterPredicate::gt("limit", TypedValue::Integer(5))]);
    }

    #[test]
    fn filters_keep_parameter_order() {
        let filters = parse_filters(&params(&[("b", "1"), ("a_lt", "2"), ("c_in", "x")]));
        let fields: Vec<_> = filters.iter().map(FilterPredicate::field).collect();
        assert_eq!(fields, ["b", "a", "c"]);
    }

    #[test]
    fn in_values_are_coerced_one_by_one() {
        let filters = parse_filters(&params(&[("score_in", "1,2.5"), ("status_in", "active,pending")]));
        assert_eq!(
            filters[0].condition(),
            &Condition::In(vec![TypedValue::Integer(1), TypedValue::Float(2.5)])
        );
        assert_eq!(
            filters[1],
            FilterPredicate::is_in(
                "status",
                [TypedValue::String("active".into()), TypedValue::String("pending".into())]
            )
        );
    }

    #[test]
    fn first_value_wins_for_repeated_keys() {
        let raw = params(&[("age", "1"), ("name", "A"), ("age", "2")]);
        assert_eq!(raw.len(), 2);
        assert_eq!(raw.get("age"), Some("1"));
        assert_eq!(
            parse_filters(&raw),
            vec![
                FilterPredicate::eq("age", TypedValue::Integer(1)),
                FilterPredicate::eq("name", TypedValue::String("A".into())),
            ]
        );
    }

    #[test]
    fn many_repeated_keys_keep_their_first_values() {
        let raw: RawParams = (0..20_000).map(|i| (format!("k{}", i % 500), i.to_string())).collect();

        assert_eq!(raw.len(), 500);
        assert_eq!(raw.get("k0"), Some("0"));
        assert_eq!(raw.get("k499"), Some("499"));
        assert_eq!(raw.iter().nth(7), Some(("k7", "7")));
    }

    #[test]
    fn sort_parses_directions() {
        assert_eq!(
            parse_sort(Some("-age,name")),
            vec![
                SortDirective::new("age", SortDirection::Descending),
                SortDirective::new("name", SortDirection::Ascending),
            ]
        );
    }

    #[test]
    fn empty_sort_means_no_ordering() {
        assert!(parse_sort(None).is_empty());
        assert!(parse_sort(Some("")).is_empty());
        assert_eq!(parse_sort(Some("age,")), vec![SortDirective::new("age", SortDirection::Ascending)]);
    }

    #[test]
    fn sort_strips_every_leading_dash() {
        assert_eq!(parse_sort(Some("--age")), vec![SortDirective::new("age", SortDirection::Descending)]);
    }

    #[test]
    fn pagination_defaults() {
        assert_eq!(parse_pagination(None, None).unwrap(), PaginationSpec::new(20, 0));
    }

    #[test]
    fn pagination_accepts_bounds() {
        assert_eq!(parse_pagination(Some("1"), Some("0")).unwrap(), PaginationSpec::new(1, 0));
        assert_eq!(parse_pagination(Some("1000"), Some("50")).unwrap(), PaginationSpec::new(1000, 50));
    }

    #[test]
    fn invalid_limits() {
        for raw in ["0", "1001", "-3", "99999999999999999999"] {
            assert!(
                matches!(parse_pagination(Some(raw), None), Err(QueryError::InvalidLimit("must be between 1 and 1000"))),
                "limit={raw}"
            );
        }
        for raw in ["abc", "", "2.5"] {
            assert!(
                matches!(parse_pagination(Some(raw), None), Err(QueryError::InvalidLimit("must be an integer"))),
                "limit={raw}"
            );
        }
    }

    #[test]
    fn invalid_offsets() {
        assert!(matches!(
            parse_pagination(None, Some("-1")),
            Err(QueryError::InvalidOffset("must be >= 0"))
        ));
        assert!(matches!(
            parse_pagination(None, Some("abc")),
            Err(QueryError::InvalidOffset("must be an integer"))
        ));
    }

    #[test]
    fn limit_error_wins_over_offset_error() {
        assert!(matches!(
            parse_pagination(Some("abc"), Some("-1")),
            Err(QueryError::InvalidLimit(_))
        ));
        assert!(matches!(
            parse_pagination(Some("0"), Some("abc")),
            Err(QueryError::InvalidLimit(_))
        ));
    }

    #[test]
    fn huge_offsets_saturate() {
        let spec = parse_pagination(None, Some("99999999999999999999")).unwrap();
        assert_eq!(spec.offset, usize::MAX);
    }

    #[test]
    fn projection_trims_and_ignores_blanks() {
        let projection = parse_projection(Some(" name , age,,")).unwrap();
        assert_eq!(projection.fields(), ["name".to_string(), "age".to_string()]);
        assert!(parse_projection(Some("")).is_none());
        assert!(parse_projection(Some(" , ")).is_none());
        assert!(parse_projection(None).is_none());
    }
}
