//! In-memory document storage backend for docgate.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It uses async-aware read-write locks for concurrent access and is ideal for development,
//! testing, and small deployments.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using async-aware RwLock
//! - **Schemaless storage** - Stores documents as BSON maps keyed by id
//! - **Full query support** - Supports every filter operator, multi-field ordering and limits
//! - **Hosted-store limits** - Refuses predicate combinations hosted stores refuse (see [`constraints`])
//!
//! # Quick Start
//!
//! ```ignore
//! use docgate_core::{backend::{StoreBackend, StoreBackendBuilder}, orchestrator::QueryOrchestrator};
//! use docgate_memory::InMemoryStore;
//! use bson::doc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = InMemoryStore::builder().build().await?;
//!     backend.insert_document("a", doc! { "name": "Alice", "age": 30 }, "users").await?;
//!
//!     let params = [("age_gte", "18")].into_iter().collect();
//!     let page = QueryOrchestrator::default().run(&backend, "users", &params).await?;
//!     assert_eq!(page.count, 1);
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docgate_memory;

pub mod constraints;
mod evaluator;
pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
