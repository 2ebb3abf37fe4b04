//! Storage backend abstraction for the query adapter.
//!
//! This module defines the narrow contract the adapter needs from a document store,
//! allowing the same HTTP surface to sit on top of different backends (in-memory,
//! MongoDB, ...).
//!
//! # Overview
//!
//! The [`StoreBackend`] trait provides a unified async interface for the query
//! executor and for the single-document passthroughs. Implementations are required
//! to be thread-safe (`Send + Sync`) since one backend serves every request.
//!
//! # Traits
//!
//! - [`StoreBackend`]: The core trait for storage backends
//! - [`DynStoreBackend`]: A trait for dynamic dispatch over backend implementations
//! - [`StoreBackendBuilder`]: Factory trait for creating backend instances
//!
//! # Examples
//!
//! ```ignore
//! use docgate_core::backend::StoreBackend;
//! use bson::doc;
//!
//! let backend = MyBackendImpl::new();
//! backend.insert_document("x1", doc! { "name": "Alice", "age": 30 }, "users").await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use bson::Document as Fields;
use std::fmt::Debug;

use crate::{document::RawDocument, error::DocumentStoreResult, query::StoreQuery};

/// Abstract interface for document storage backends.
///
/// # Thread Safety
///
/// All implementations must be thread-safe and support concurrent access from multiple
/// async tasks. The exact concurrency model is implementation-specific.
///
/// # Error Handling
///
/// Operations return [`DocumentStoreResult<T>`](crate::error::DocumentStoreResult).
/// A backend that cannot evaluate a predicate must answer with
/// [`DocumentStoreError::InvalidFilter`](crate::error::DocumentStoreError::InvalidFilter)
/// naming that predicate; every other failure is reported as a store failure.
/// Backends never retry on their own behalf.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Stores a new document under `id`.
    ///
    /// The collection is created on first use. Fails with
    /// [`DocumentAlreadyExists`](crate::error::DocumentStoreError::DocumentAlreadyExists)
    /// if the id is taken.
    async fn insert_document(
        &self,
        id: &str,
        fields: Fields,
        collection: &str,
    ) -> DocumentStoreResult<()>;

    /// Fetches a single document, or `None` if it does not exist.
    async fn get_document(&self, id: &str, collection: &str) -> DocumentStoreResult<Option<RawDocument>>;

    /// Overwrites the given top-level fields of an existing document and returns the result.
    ///
    /// Fields not mentioned are left untouched. Fails with
    /// [`DocumentNotFound`](crate::error::DocumentStoreError::DocumentNotFound) if
    /// there is no such document.
    async fn merge_document(
        &self,
        id: &str,
        fields: Fields,
        collection: &str,
    ) -> DocumentStoreResult<RawDocument>;

    /// Deletes a document. Deleting a missing document is not an error.
    async fn delete_document(&self, id: &str, collection: &str) -> DocumentStoreResult<()>;

    /// Executes a query against a collection.
    ///
    /// All predicates must hold for a document to match. Results follow the sort
    /// directives in order of significance; without directives the order is the
    /// backend's natural one. At most `query.limit` documents are returned. A
    /// missing collection yields no documents.
    async fn query_documents(
        &self,
        query: StoreQuery<'_>,
        collection: &str,
    ) -> DocumentStoreResult<Vec<RawDocument>>;

    /// Cleanly shuts down the backend, releasing all resources.
    ///
    /// The default implementation is a no-op, but backends with external
    /// connections should override this.
    async fn shutdown(self) -> DocumentStoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// Object-safe mirror of [`StoreBackend`], implemented for every backend.
///
/// The HTTP layer holds its backend as `Arc<dyn DynStoreBackend>` so the store can
/// be picked from configuration at startup.
#[async_trait]
pub trait DynStoreBackend: Send + Sync + Debug {
    async fn insert_document(
        &self,
        id: &str,
        fields: Fields,
        collection: &str,
    ) -> DocumentStoreResult<()>;
    async fn get_document(&self, id: &str, collection: &str) -> DocumentStoreResult<Option<RawDocument>>;
    async fn merge_document(
        &self,
        id: &str,
        fields: Fields,
        collection: &str,
    ) -> DocumentStoreResult<RawDocument>;
    async fn delete_document(&self, id: &str, collection: &str) -> DocumentStoreResult<()>;
    async fn query_documents(
        &self,
        query: StoreQuery<'_>,
        collection: &str,
    ) -> DocumentStoreResult<Vec<RawDocument>>;
}

#[async_trait]
impl<B: StoreBackend + 'static> DynStoreBackend for B {
    async fn insert_document(
        &self,
        id: &str,
        fields: Fields,
        collection: &str,
    ) -> DocumentStoreResult<()> {
        StoreBackend::insert_document(self, id, fields, collection).await
    }

    async fn get_document(&self, id: &str, collection: &str) -> DocumentStoreResult<Option<RawDocument>> {
        StoreBackend::get_document(self, id, collection).await
    }

    async fn merge_document(
        &self,
        id: &str,
        fields: Fields,
        collection: &str,
    ) -> DocumentStoreResult<RawDocument> {
        StoreBackend::merge_document(self, id, fields, collection).await
    }

    async fn delete_document(&self, id: &str, collection: &str) -> DocumentStoreResult<()> {
        StoreBackend::delete_document(self, id, collection).await
    }

    async fn query_documents(
        &self,
        query: StoreQuery<'_>,
        collection: &str,
    ) -> DocumentStoreResult<Vec<RawDocument>> {
        StoreBackend::query_documents(self, query, collection).await
    }
}

/// Factory for backends whose construction is asynchronous or fallible.
#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
