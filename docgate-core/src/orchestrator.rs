//! The query pipeline: from raw query-string parameters to a page of projected documents.
//!
//! A request moves through the stages of [`Stage`] strictly in order. Any failure
//! ends the request immediately, so nothing reaches the store unless every parsing
//! stage succeeded and no partial page is ever returned.
//!
//! ```text
//! ParsingFilters -> ParsingSort -> ParsingPagination -> Executing -> Projecting -> Responding
//!        \______________\________________\_________________\
//!                                                            -> Error
//! ```
//!
//! # Example
//!
//! ```ignore
//! use docgate_core::{orchestrator::QueryOrchestrator, params::RawParams, page::StoreLimitPolicy};
//!
//! let params: RawParams = [("age_gte", "18"), ("order_by", "-age")].into_iter().collect();
//! let response = QueryOrchestrator::new(StoreLimitPolicy::default())
//!     .run(&backend, "users", &params)
//!     .await?;
//! ```

use std::fmt;
use tracing::{debug, warn};

use crate::{
    backend::DynStoreBackend,
    document::RawDocument,
    error::QueryResult,
    page::StoreLimitPolicy,
    params::{self, FIELDS_KEY, LIMIT_KEY, OFFSET_KEY, ORDER_BY_KEY, RawParams},
    projection::project,
    query::QuerySpec,
    response::QueryResponse,
};

/// The stages of a query request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ParsingFilters,
    ParsingSort,
    ParsingPagination,
    Executing,
    Projecting,
    Responding,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::ParsingFilters => "parsing_filters",
            Stage::ParsingSort => "parsing_sort",
            Stage::ParsingPagination => "parsing_pagination",
            Stage::Executing => "executing",
            Stage::Projecting => "projecting",
            Stage::Responding => "responding",
        })
    }
}

/// Runs query requests against a backend.
///
/// Holds no per-request state and can be shared freely between requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryOrchestrator {
    policy: StoreLimitPolicy,
}

impl QueryOrchestrator {
    pub fn new(policy: StoreLimitPolicy) -> Self {
        Self { policy }
    }

    /// Runs the parsing stages, producing the request's immutable spec.
    pub fn build_spec(&self, params: &RawParams) -> QueryResult<QuerySpec> {
        debug!(stage = %Stage::ParsingFilters, "parsing filters");
        let filters = params::parse_filters(params);

        debug!(stage = %Stage::ParsingSort, "parsing sort");
        let sort = params::parse_sort(params.get(ORDER_BY_KEY));

        debug!(stage = %Stage::ParsingPagination, "parsing pagination");
        let pagination = params::parse_pagination(params.get(LIMIT_KEY), params.get(OFFSET_KEY))?;

        Ok(QuerySpec {
            filters,
            sort,
            pagination,
            projection: params::parse_projection(params.get(FIELDS_KEY)),
        })
    }

    /// Fetches the documents of the requested page, unprojected.
    ///
    /// The store is asked for as many documents as the [`StoreLimitPolicy`] says,
    /// then the `[offset, offset + limit)` window is cut from the result.
    pub async fn execute<B>(
        &self,
        backend: &B,
        collection: &str,
        spec: &QuerySpec,
    ) -> QueryResult<Vec<RawDocument>>
    where
        B: DynStoreBackend + ?Sized,
    {
        let store_limit = spec.pagination.store_limit(self.policy);
        debug!(
            stage = %Stage::Executing,
            collection,
            filters = spec.filters.len(),
            sort = spec.sort.len(),
            store_limit,
            "querying store"
        );

        let documents = backend
            .query_documents(spec.store_query(store_limit), collection)
            .await?;

        Ok(spec.pagination.paginate(documents))
    }

    /// Runs the whole pipeline for one request.
    pub async fn run<B>(
        &self,
        backend: &B,
        collection: &str,
        params: &RawParams,
    ) -> QueryResult<QueryResponse>
    where
        B: DynStoreBackend + ?Sized,
    {
        let result = self.run_stages(backend, collection, params).await;

        if let Err(err) = &result {
            warn!(stage = %err.stage(), collection, error = %err, "query failed");
        }

        result
    }

    async fn run_stages<B>(
        &self,
        backend: &B,
        collection: &str,
        params: &RawParams,
    ) -> QueryResult<QueryResponse>
    where
        B: DynStoreBackend + ?Sized,
    {
        let spec = self.build_spec(params)?;
        let documents = self.execute(backend, collection, &spec).await?;

        debug!(stage = %Stage::Projecting, documents = documents.len(), "projecting");
        let data = documents
            .iter()
            .map(|document| project(document, spec.projection.as_ref()))
            .collect();

        debug!(stage = %Stage::Responding, "query complete");
        Ok(QueryResponse::new(
            data,
            spec.pagination.limit,
            spec.pagination.offset,
        ))
    }
}
