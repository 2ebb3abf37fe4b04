//! Query translation from docgate predicates to MongoDB query syntax.
//!
//! This module translates the adapter's filter predicates and sort directives
//! into MongoDB BSON documents for execution by the MongoDB query engine.

use bson::{Bson, Document, doc};

use docgate_core::{
    coerce::TypedValue,
    error::{DocumentStoreError, DocumentStoreResult},
    query::{CompareOp, FilterPredicate, PredicateVisitor, SortDirection, SortDirective},
};

/// Translates one predicate at a time into a MongoDB filter document.
///
/// This struct implements the [`PredicateVisitor`] trait. Field names that MongoDB
/// would read as operators are refused.
pub(crate) struct MongoQueryTranslator;

impl MongoQueryTranslator {
    /// Builds the filter for a whole query. All predicates must hold.
    pub(crate) fn translate(&mut self, filters: &[FilterPredicate]) -> DocumentStoreResult<Document> {
        let mut clauses = filters
            .iter()
            .map(|predicate| {
                self.visit_predicate(predicate)
                    .map_err(|message| DocumentStoreError::InvalidFilter {
                        predicate: predicate.clone(),
                        message,
                    })
            })
            .collect::<DocumentStoreResult<Vec<_>>>()?;

        Ok(match clauses.len() {
            0 => doc! {},
            1 => clauses.remove(0),
            _ => doc! { "$and": clauses },
        })
    }

    fn check_field(field: &str) -> Result<(), String> {
        if field.is_empty() {
            Err("field name must not be empty".to_string())
        } else if field.starts_with('$') {
            Err(format!("field name '{field}' must not start with '$'"))
        } else {
            Ok(())
        }
    }
}

impl PredicateVisitor for MongoQueryTranslator {
    type Output = Document;
    type Error = String;

    fn visit_compare(&mut self, field: &str, op: CompareOp, value: &TypedValue) -> Result<Self::Output, Self::Error> {
        Self::check_field(field)?;

        let operator = match op {
            CompareOp::Eq => "$eq",
            CompareOp::Gte => "$gte",
            CompareOp::Lte => "$lte",
            CompareOp::Gt => "$gt",
            CompareOp::Lt => "$lt",
        };
        Ok(doc! { field: { operator: Bson::from(value) } })
    }

    fn visit_in(&mut self, field: &str, values: &[TypedValue]) -> Result<Self::Output, Self::Error> {
        Self::check_field(field)?;

        Ok(doc! {
            field: { "$in": values.iter().map(Bson::from).collect::<Vec<_>>() },
        })
    }
}

/// Builds a MongoDB sort document, most significant key first.
pub(crate) fn sort_document(sort: &[SortDirective]) -> Option<Document> {
    if sort.is_empty() {
        return None;
    }

    Some(
        sort.iter()
            .map(|directive| {
                let direction = match directive.direction {
                    SortDirection::Ascending => 1,
                    SortDirection::Descending => -1,
                };
                (directive.field.clone(), Bson::Int32(direction))
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_comparisons() {
        let filters = [FilterPredicate::gte("age", TypedValue::Integer(18))];

        assert_eq!(
            MongoQueryTranslator.translate(&filters).unwrap(),
            doc! { "age": { "$gte": 18_i64 } }
        );
    }

    #[test]
    fn each_comparison_has_its_operator() {
        let cases = [
            (FilterPredicate::eq("n", TypedValue::Float(1.5)), doc! { "n": { "$eq": 1.5 } }),
            (FilterPredicate::lte("n", TypedValue::Integer(2)), doc! { "n": { "$lte": 2_i64 } }),
            (FilterPredicate::gt("n", TypedValue::Integer(3)), doc! { "n": { "$gt": 3_i64 } }),
            (FilterPredicate::lt("n", TypedValue::String("z".into())), doc! { "n": { "$lt": "z" } }),
        ];

        for (predicate, expected) in cases {
            assert_eq!(MongoQueryTranslator.translate(std::slice::from_ref(&predicate)).unwrap(), expected);
        }
    }

    #[test]
    fn joins_several_predicates_with_and() {
        let filters = [
            FilterPredicate::eq("name", TypedValue::String("A".into())),
            FilterPredicate::is_in("score", [TypedValue::Integer(1), TypedValue::Float(2.5)]),
        ];

        assert_eq!(
            MongoQueryTranslator.translate(&filters).unwrap(),
            doc! {
                "$and": [
                    { "name": { "$eq": "A" } },
                    { "score": { "$in": [1_i64, 2.5] } },
                ]
            }
        );
    }

    #[test]
    fn no_predicates_match_everything() {
        assert_eq!(MongoQueryTranslator.translate(&[]).unwrap(), doc! {});
    }

    #[test]
    fn refuses_operator_like_fields() {
        let predicate = FilterPredicate::eq("$where", TypedValue::String("1".into()));
        let err = MongoQueryTranslator.translate(std::slice::from_ref(&predicate)).unwrap_err();

        assert!(matches!(err, DocumentStoreError::InvalidFilter { predicate: p, .. } if p == predicate));
    }

    #[test]
    fn sort_keys_keep_their_order() {
        let sort = [
            SortDirective::new("age", SortDirection::Descending),
            SortDirective::new("name", SortDirection::Ascending),
        ];

        assert_eq!(sort_document(&sort), Some(doc! { "age": -1, "name": 1 }));
        assert_eq!(sort_document(&[]), None);
    }
}
