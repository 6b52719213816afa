//! Document store bound to a backend implementation.
//!
//! # Example
//!
//! ```ignore
//! use authorstore_core::store::DocumentStore;
//!
//! let store = DocumentStore::new(backend);
//! let authors = store.typed_collection::<Author>("authors");
//! ```

use crate::{
    backend::StoreBackend,
    collection::TypedCollection,
    document::Document,
    error::DocumentStoreResult,
};

/// A document store bound to a specific backend implementation.
///
/// The store owns the backend handle; it is opened once and reused for every
/// collection handed out.
#[derive(Debug)]
pub struct DocumentStore<B: StoreBackend> {
    backend: B,
}

impl<B: StoreBackend> DocumentStore<B> {
    /// Creates a new document store with the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Gets a typed collection named `name`.
    pub fn typed_collection<'a, D: Document>(&'a self, name: &str) -> TypedCollection<'a, B, D> {
        TypedCollection::new(name.to_string(), &self.backend)
    }

    /// Shuts down the store and releases backend resources.
    ///
    /// # Errors
    ///
    /// Returns an error if the shutdown operation fails.
    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        self.backend.shutdown().await?;

        Ok(())
    }
}
