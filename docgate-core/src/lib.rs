//! Query translation between HTTP query strings and document stores.
//!
//! This crate is the core of the docgate project and provides:
//!
//! - **Type coercion** ([`coerce`]) - Best-effort typing of query-string tokens
//! - **Query model** ([`query`]) - Predicates, ordering, projection and the per-request [`query::QuerySpec`]
//! - **Parameter parsing** ([`params`]) - Filter suffixes, `order_by`, `limit`/`offset` and `fields`
//! - **Pagination** ([`page`]) - Page bounds and the store-side limit policy
//! - **Projection** ([`projection`]) - Reducing documents to the requested fields
//! - **Query pipeline** ([`orchestrator`]) - Running a request from parameters to a response
//! - **Store backend abstraction** ([`backend`]) - The narrow contract a document store must fulfil
//! - **Documents** ([`document`]) - The read-only document view
//! - **Responses** ([`response`]) - JSON response bodies
//! - **Error handling** ([`error`]) - Store and query error types
//!
//! # Example
//!
//! ```ignore
//! use docgate_core::{orchestrator::QueryOrchestrator, params::RawParams};
//!
//! let params: RawParams = [("age_gte", "18"), ("order_by", "-age"), ("fields", "name")]
//!     .into_iter()
//!     .collect();
//!
//! let response = QueryOrchestrator::default()
//!     .run(&backend, "users", &params)
//!     .await?;
//!
//! println!("{}", serde_json::to_string(&response)?);
//! ```

#[allow(unused_extern_crates)]
extern crate self as docgate_core;

pub mod backend;
pub mod coerce;
pub mod document;
pub mod error;
pub mod orchestrator;
pub mod page;
pub mod params;
pub mod projection;
pub mod query;
pub mod response;
