//! Error types for store operations and for the query pipeline.
//!
//! [`DocumentStoreError`] is what backends return. [`QueryError`] is what the
//! orchestrator returns: request validation failures plus store failures, each
//! knowing its HTTP status and the pipeline stage it came from.

use http::StatusCode;
use thiserror::Error;

use crate::{orchestrator::Stage, query::FilterPredicate};

/// Represents all possible errors that can occur when interacting with a document store.
#[derive(Error, Debug)]
pub enum DocumentStoreError {
    /// Error during store initialization or connection setup.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// A document with the given ID already exists in the collection.
    /// The first argument is the document ID, the second is the collection name.
    #[error("Document {0} already exists in collection {1}")]
    DocumentAlreadyExists(String, String),
    /// The requested document was not found in the collection.
    /// The first argument is the document ID, the second is the collection name.
    #[error("Document not found {0} in collection {1}")]
    DocumentNotFound(String, String),
    /// The store refused a predicate it cannot evaluate.
    #[error("Invalid filter `{predicate}`: {message}")]
    InvalidFilter {
        predicate: FilterPredicate,
        message: String,
    },
    /// An error occurred in the underlying storage backend.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// A specialized `Result` type for document store operations.
pub type DocumentStoreResult<T> = Result<T, DocumentStoreError>;

/// Why a query request did not produce a page of documents.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Limit {0}")]
    InvalidLimit(&'static str),
    #[error("Offset {0}")]
    InvalidOffset(&'static str),
    #[error("Invalid filter: {message}")]
    InvalidFilter {
        predicate: FilterPredicate,
        message: String,
    },
    #[error(transparent)]
    Store(DocumentStoreError),
}

/// A specialized `Result` type for the query pipeline.
pub type QueryResult<T> = Result<T, QueryError>;

impl QueryError {
    /// HTTP status reported for this failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            QueryError::InvalidLimit(_)
            | QueryError::InvalidOffset(_)
            | QueryError::InvalidFilter { .. } => StatusCode::BAD_REQUEST,
            QueryError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The pipeline stage that produced this failure.
    pub fn stage(&self) -> Stage {
        match self {
            QueryError::InvalidLimit(_) | QueryError::InvalidOffset(_) => Stage::ParsingPagination,
            QueryError::InvalidFilter { .. } | QueryError::Store(_) => Stage::Executing,
        }
    }
}

impl From<DocumentStoreError> for QueryError {
    fn from(err: DocumentStoreError) -> Self {
        match err {
            DocumentStoreError::InvalidFilter { predicate, message } => {
                QueryError::InvalidFilter { predicate, message }
            }
            other => QueryError::Store(other),
        }
    }
}
