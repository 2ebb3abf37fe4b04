//! Documents as the adapter sees them: an identifier plus a field mapping.
//!
//! Stores keep their own representation. The adapter only needs the read-only
//! [`Document`] view, which is enough to project and serialize a result.

use bson::Document as Fields;

/// The name under which a document's identifier appears in responses.
pub const ID_FIELD: &str = "id";

/// Read-only view of a stored document.
///
/// The identifier is not part of [`Document::fields`]; stores hold it separately
/// (a key, a `_id` column) and the adapter re-attaches it as [`ID_FIELD`].
pub trait Document: Send + Sync {
    /// Returns the document's identifier within its collection.
    fn id(&self) -> &str;

    /// Returns the document's fields, in stored order.
    fn fields(&self) -> &Fields;
}

/// A document as returned by a store backend.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    pub id: String,
    pub fields: Fields,
}

impl RawDocument {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self { id: id.into(), fields }
    }
}

impl Document for RawDocument {
    fn id(&self) -> &str {
        &self.id
    }

    fn fields(&self) -> &Fields {
        &self.fields
    }
}
