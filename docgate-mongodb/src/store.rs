use async_trait::async_trait;
use bson::{Bson, Document, doc};
use futures::TryStreamExt;
use mongodb::{
    Client, Collection as MongoCollection,
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::{ClientOptions, FindOptions, ReturnDocument},
};

use docgate_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    document::RawDocument,
    error::{DocumentStoreError, DocumentStoreResult},
    query::StoreQuery,
};

use crate::query::{MongoQueryTranslator, sort_document};

const MONGO_ID: &str = "_id";
const DUPLICATE_KEY: i32 = 11000;

fn backend_error(err: MongoError) -> DocumentStoreError {
    DocumentStoreError::Backend(err.to_string())
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY
    )
}

#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client.database(&self.database).collection(collection_name)
    }

    /// Drops any client-supplied `_id`, which MongoDB treats as immutable.
    fn prepare_fields(mut fields: Document) -> Document {
        fields.remove(MONGO_ID);
        fields
    }

    fn restore_document(mut document: Document) -> RawDocument {
        let id = match document.remove(MONGO_ID) {
            Some(Bson::String(id)) => id,
            Some(Bson::ObjectId(oid)) => oid.to_hex(),
            Some(other) => other.to_string(),
            None => String::new(),
        };

        RawDocument::new(id, document)
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert_document(&self, id: &str, fields: Document, collection: &str) -> DocumentStoreResult<()> {
        let document = std::iter::once((MONGO_ID.to_string(), Bson::String(id.to_string())))
            .chain(Self::prepare_fields(fields))
            .collect::<Document>();

        self.get_collection(collection)
            .insert_one(document)
            .await
            .map_err(|err| {
                if is_duplicate_key(&err) {
                    DocumentStoreError::DocumentAlreadyExists(id.to_string(), collection.to_string())
                } else {
                    backend_error(err)
                }
            })?;

        Ok(())
    }

    async fn get_document(&self, id: &str, collection: &str) -> DocumentStoreResult<Option<RawDocument>> {
        Ok(self
            .get_collection(collection)
            .find_one(doc! { MONGO_ID: id })
            .await
            .map_err(backend_error)?
            .map(Self::restore_document))
    }

    async fn merge_document(&self, id: &str, fields: Document, collection: &str) -> DocumentStoreResult<RawDocument> {
        let fields = Self::prepare_fields(fields);

        let merged = if fields.is_empty() {
            self.get_collection(collection)
                .find_one(doc! { MONGO_ID: id })
                .await
        } else {
            self.get_collection(collection)
                .find_one_and_update(doc! { MONGO_ID: id }, doc! { "$set": fields })
                .return_document(ReturnDocument::After)
                .await
        };

        merged
            .map_err(backend_error)?
            .map(Self::restore_document)
            .ok_or_else(|| DocumentStoreError::DocumentNotFound(id.to_string(), collection.to_string()))
    }

    async fn delete_document(&self, id: &str, collection: &str) -> DocumentStoreResult<()> {
        self.get_collection(collection)
            .delete_one(doc! { MONGO_ID: id })
            .await
            .map_err(backend_error)?;

        Ok(())
    }

    async fn query_documents(&self, query: StoreQuery<'_>, collection: &str) -> DocumentStoreResult<Vec<RawDocument>> {
        let filter = MongoQueryTranslator.translate(query.filters)?;

        let mut options = FindOptions::default();
        options.limit = Some(i64::try_from(query.limit).unwrap_or(i64::MAX));
        options.sort = sort_document(query.sort);

        tracing::trace!(collection, %filter, limit = query.limit, "running find");

        Ok(self
            .get_collection(collection)
            .find(filter)
            .with_options(options)
            .await
            .map_err(backend_error)?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(backend_error)?
            .into_iter()
            .map(Self::restore_document)
            .collect())
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(MongoDbStore::new(
            Client::with_options(
                ClientOptions::parse(&self.dsn)
                    .await
                    .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
            )
            .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
            self.database,
        ))
    }
}
