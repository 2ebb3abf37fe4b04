//! Field projection of fetched documents.

use bson::Document as Fields;

use crate::{
    document::{Document, ID_FIELD},
    query::ProjectionSpec,
};

/// Builds the client-facing mapping of `document`.
///
/// Without a projection every field is returned. With one, only requested fields
/// the document actually has are kept, in the document's own order. In both cases
/// the identifier is appended last under [`ID_FIELD`], whether or not it was
/// requested, replacing any stored field of that name.
pub fn project<D: Document + ?Sized>(document: &D, projection: Option<&ProjectionSpec>) -> Fields {
    let mut output: Fields = document
        .fields()
        .iter()
        .filter(|(name, _)| name.as_str() != ID_FIELD)
        .filter(|(name, _)| projection.is_none_or(|spec| spec.contains(name)))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    output.insert(ID_FIELD, document.id());
    output
}
