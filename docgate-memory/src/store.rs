//! In-memory storage implementation for document stores.
//!
//! This module provides a simple in-memory backend that keeps documents as BSON
//! maps behind an async-safe read-write lock.

use async_trait::async_trait;
use bson::Document as Fields;
use mea::rwlock::RwLock;
use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use docgate_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    document::RawDocument,
    error::{DocumentStoreError, DocumentStoreResult},
    query::StoreQuery,
};

use crate::{
    constraints::validate_filters,
    evaluator::{DocumentEvaluator, compare_documents},
};

type CollectionMap = BTreeMap<String, Fields>;
type StoreMap = HashMap<String, CollectionMap>;

/// Thread-safe in-memory document storage backend.
///
/// Documents are keyed by id within each collection and come back in id order
/// when a query has no sort directives. Sorting on a field leaves out documents
/// that do not have that field.
///
/// # Thread Safety
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, allowing
/// it to be safely shared across async tasks. Multiple clones of the same instance
/// share the same underlying data.
///
/// # Performance
///
/// Queries scan all documents in a collection (no indexing). For larger datasets,
/// consider using a persistent backend like MongoDB.
///
/// # Example
///
/// ```ignore
/// use docgate_memory::InMemoryStore;
/// use docgate_core::backend::StoreBackend;
/// use bson::doc;
///
/// let store = InMemoryStore::new();
/// store.insert_document("x1", doc! { "name": "Alice", "age": 30 }, "users").await?;
///
/// let doc = store.get_document("x1", "users").await?;
/// assert!(doc.is_some());
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection name -> (document id -> fields)
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_document(&self, id: &str, fields: Fields, collection: &str) -> DocumentStoreResult<()> {
        let mut store = self.store.write().await;
        let collection_map = store.entry(collection.to_string()).or_default();

        if collection_map.contains_key(id) {
            return Err(DocumentStoreError::DocumentAlreadyExists(
                id.to_string(),
                collection.to_string(),
            ));
        }

        collection_map.insert(id.to_string(), fields);
        tracing::trace!(collection, id, "inserted document");

        Ok(())
    }

    async fn get_document(&self, id: &str, collection: &str) -> DocumentStoreResult<Option<RawDocument>> {
        Ok(self
            .store
            .read()
            .await
            .get(collection)
            .and_then(|collection_map| collection_map.get(id))
            .map(|fields| RawDocument::new(id, fields.clone())))
    }

    async fn merge_document(&self, id: &str, fields: Fields, collection: &str) -> DocumentStoreResult<RawDocument> {
        let mut store = self.store.write().await;
        let existing = store
            .get_mut(collection)
            .and_then(|collection_map| collection_map.get_mut(id))
            .ok_or_else(|| DocumentStoreError::DocumentNotFound(id.to_string(), collection.to_string()))?;

        for (key, value) in fields {
            existing.insert(key, value);
        }

        Ok(RawDocument::new(id, existing.clone()))
    }

    async fn delete_document(&self, id: &str, collection: &str) -> DocumentStoreResult<()> {
        if let Some(collection_map) = self.store.write().await.get_mut(collection) {
            collection_map.remove(id);
        }

        Ok(())
    }

    async fn query_documents(&self, query: StoreQuery<'_>, collection: &str) -> DocumentStoreResult<Vec<RawDocument>> {
        validate_filters(query.filters)?;

        let store = self.store.read().await;
        let Some(collection_map) = store.get(collection) else {
            return Ok(vec![]);
        };

        let mut matched = collection_map
            .iter()
            .filter(|(_, fields)| {
                query
                    .sort
                    .iter()
                    .all(|directive| fields.contains_key(&directive.field))
            })
            .filter(|(_, fields)| DocumentEvaluator::new(fields).matches_all(query.filters))
            .collect::<Vec<_>>();

        // Stable, so ties keep id order.
        if !query.sort.is_empty() {
            matched.sort_by(|(_, a), (_, b)| compare_documents(a, b, query.sort));
        }

        tracing::trace!(collection, matched = matched.len(), limit = query.limit, "evaluated query");

        Ok(matched
            .into_iter()
            .take(query.limit)
            .map(|(id, fields)| RawDocument::new(id.as_str(), fields.clone()))
            .collect())
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
///
/// # Example
///
/// ```ignore
/// use docgate_memory::InMemoryStore;
/// use docgate_core::backend::StoreBackendBuilder;
///
/// let store = InMemoryStore::builder().build().await?;
/// ```
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new [`InMemoryStore`] instance.
    ///
    /// This always succeeds and returns a freshly initialized store.
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}
