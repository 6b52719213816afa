//! Storage backend abstraction for the document store.
//!
//! The [`StoreBackend`] trait mirrors the handful of wire operations a document
//! database offers: find, insert one, replace by filter, delete by filter,
//! update many and count. Every operation is a single round-trip; the trait
//! makes no promises about atomicity across calls.
//!
//! # Examples
//!
//! ```ignore
//! use authorstore_core::{backend::StoreBackend, query::Filter};
//! use bson::doc;
//!
//! let id = backend.insert_document(doc! { "AuthorOfBook": "X" }, "authors").await?;
//! let deleted = backend.delete_one(Filter::eq("_id", id), "authors").await?;
//! assert_eq!(deleted, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use bson::{Bson, Document, oid::ObjectId};
use std::fmt::Debug;

use crate::{
    error::DocumentStoreResult,
    query::{Expr, Query, Update},
};

/// Outcome of a replace or update operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Number of documents the filter matched.
    pub matched: u64,
    /// Number of documents whose content actually changed.
    pub modified: u64,
}

/// Abstract interface for document storage backends.
///
/// # Thread Safety
///
/// Implementations must be usable from multiple async tasks at once. A single
/// call must be atomic with respect to other calls on the same collection, so
/// two concurrent `delete_one` calls with the same filter never both report a
/// deletion.
///
/// # Missing documents
///
/// Writes whose filter matches nothing succeed and report zero affected
/// documents. Collections that were never written to behave as empty.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Inserts a document and returns the identifier the store assigned to it.
    ///
    /// Any identifier already present in `document` is replaced.
    async fn insert_document(&self, document: Document, collection: &str) -> DocumentStoreResult<ObjectId>;

    /// Replaces the first document matching `filter` with `document`.
    ///
    /// The replaced document keeps its identifier.
    async fn replace_one(
        &self,
        filter: Expr,
        document: Document,
        collection: &str,
    ) -> DocumentStoreResult<UpdateOutcome>;

    /// Deletes the first document matching `filter`, returning how many were deleted (0 or 1).
    async fn delete_one(&self, filter: Expr, collection: &str) -> DocumentStoreResult<u64>;

    /// Deletes every document matching `filter`, returning how many were deleted.
    async fn delete_many(&self, filter: Expr, collection: &str) -> DocumentStoreResult<u64>;

    /// Applies `update` to every document matching `filter` in a single operation.
    async fn update_many(
        &self,
        filter: Expr,
        update: Update,
        collection: &str,
    ) -> DocumentStoreResult<UpdateOutcome>;

    /// Returns the documents matching `query`, in the store's natural order.
    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Bson>>;

    /// Counts the documents matching `filter`.
    async fn count_documents(&self, filter: Expr, collection: &str) -> DocumentStoreResult<u64>;

    /// Cleanly shuts down the backend, releasing all resources.
    ///
    /// The default implementation is a no-op.
    async fn shutdown(self) -> DocumentStoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
