//! In-memory document storage backend for authorstore.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It uses an async-aware read-write lock for concurrent access and is meant for
//! development and testing.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using an async-aware RwLock
//! - **Natural order** - Documents come back in insertion order
//! - **Filter and pull support** - Evaluates the core filter and update expressions
//!
//! # Quick Start
//!
//! ```ignore
//! use authorstore_core::store::DocumentStore;
//! use authorstore_memory::InMemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = DocumentStore::new(InMemoryStore::new());
//!     let authors = store.typed_collection::<Author>("authors");
//!
//!     let stored = authors.insert_one(author).await?;
//!     assert!(stored.id.is_some());
//!
//!     Ok(())
//! }
//! ```

pub mod store;
pub mod evaluator;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
