//! HTTP front end for docgate.
//!
//! This crate is the entry point of the docgate service. It re-exports the core
//! query types and the available store backends, and serves them over HTTP:
//!
//! - `GET /documents/{collection}` runs a query built from the URL's query string
//! - `POST`, `GET`, `PUT` and `DELETE` on `/documents/{collection}[/{id}]` pass single
//!   documents straight through to the store
//! - `GET /` and `GET /health` report liveness
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use docgate::{memory::InMemoryStore, orchestrator::QueryOrchestrator, routes, state::AppState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = AppState::new(Arc::new(InMemoryStore::new()), QueryOrchestrator::default())
//!         .with_api_key("secret");
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//!     axum::serve(listener, routes::router(state)).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage for development and testing
//! - [`mongodb`] - Persistent MongoDB backend (requires `mongodb` feature)

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use docgate_core::{
    backend, coerce, document, orchestrator, page, params, projection, query, response,
};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use docgate_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use docgate_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
