//! Author and book records over a JSON document database.
//!
//! This crate is the entry point of the authorstore project. It defines the
//! [`Author`](model::Author) and [`Book`](model::Book) records, the
//! [`AuthorRecordStore`] that reads and writes them, and the settings used to
//! connect it, and re-exports the core abstractions and backends.
//!
//! # Quick Start
//!
//! ```ignore
//! use authorstore::{prelude::*, memory::InMemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> DocumentStoreResult<()> {
//!     let store = AuthorRecordStore::new(InMemoryStore::new(), &AuthorStoreSettings::default());
//!
//!     store
//!         .create(Author {
//!             first_name: "Terry".into(),
//!             last_name: "Pratchett".into(),
//!             author_of_book: "Terry Pratchett".into(),
//!             ..Default::default()
//!         })
//!         .await?;
//!     store
//!         .create_book(Book {
//!             title: "Good Omens".into(),
//!             authors: vec!["Terry Pratchett".into(), "Neil Gaiman".into()],
//!             ..Default::default()
//!         })
//!         .await?;
//!
//!     // Removes the author and drops the name from "Good Omens".
//!     assert!(store.delete_author_cascade("Terry Pratchett").await?);
//!
//!     let counts = store.count_books_per_author().await?;
//!     assert_eq!(counts.get("Neil Gaiman"), Some(1));
//!
//!     store.shutdown().await
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage for development and testing
//! - [`mongodb`] - MongoDB storage (requires the `mongodb` feature), see
//!   `AuthorRecordStore::connect`

pub mod config;
pub mod model;
pub mod prelude;
pub mod service;

pub use authorstore_core::{backend, collection, document, error, query, store};
pub use config::AuthorStoreSettings;
pub use service::AuthorRecordStore;

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use authorstore_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use authorstore_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
