//! Typed collections over a storage backend.
//!
//! A [`TypedCollection`] pairs a collection name with a backend reference and
//! converts between a document type and its stored BSON form.

use std::marker::PhantomData;

use crate::{
    backend::{StoreBackend, UpdateOutcome},
    document::{Document, DocumentExt},
    error::DocumentStoreResult,
    query::{Expr, Query, Update},
};

#[derive(Debug)]
pub struct TypedCollection<'a, B: StoreBackend, D: Document> {
    name: String,
    backend: &'a B,
    _marker: PhantomData<D>,
}

impl<'a, B: StoreBackend, D: Document> TypedCollection<'a, B, D> {
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend, _marker: PhantomData }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns every document in the collection, in natural order.
    pub async fn find_all(&self) -> DocumentStoreResult<Vec<D>> {
        self.find(Query::new()).await
    }

    /// Returns the first document matching `filter`, if any.
    pub async fn find_one(&self, filter: Expr) -> DocumentStoreResult<Option<D>> {
        Ok(self
            .find(Query::builder().filter(filter).limit(1).build())
            .await?
            .into_iter()
            .next())
    }

    /// Returns the documents matching `query`.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`](crate::error::DocumentStoreError) if the query or
    /// deserialization fails.
    pub async fn find(&self, query: Query) -> DocumentStoreResult<Vec<D>> {
        self.backend
            .query_documents(query, self.name())
            .await?
            .into_iter()
            .map(D::from_bson)
            .collect()
    }

    /// Inserts `document` and returns it with the identifier the store assigned.
    pub async fn insert_one(&self, mut document: D) -> DocumentStoreResult<D> {
        let id = self
            .backend
            .insert_document(document.to_document()?, self.name())
            .await?;
        document.set_id(id);

        Ok(document)
    }

    /// Replaces the first document matching `filter` with `document`.
    ///
    /// Matching nothing is not an error; the outcome reports zero matches.
    pub async fn replace_one(&self, filter: Expr, document: &D) -> DocumentStoreResult<UpdateOutcome> {
        self.backend
            .replace_one(filter, document.to_document()?, self.name())
            .await
    }

    /// Deletes the first document matching `filter`, returning how many were deleted.
    pub async fn delete_one(&self, filter: Expr) -> DocumentStoreResult<u64> {
        self.backend.delete_one(filter, self.name()).await
    }

    /// Deletes every document matching `filter`, returning how many were deleted.
    pub async fn delete_many(&self, filter: Expr) -> DocumentStoreResult<u64> {
        self.backend.delete_many(filter, self.name()).await
    }

    /// Applies `update` to every document matching `filter`.
    pub async fn update_many(&self, filter: Expr, update: Update) -> DocumentStoreResult<UpdateOutcome> {
        self.backend
            .update_many(filter, update, self.name())
            .await
    }

    /// Counts the documents matching `filter`.
    pub async fn count(&self, filter: Expr) -> DocumentStoreResult<u64> {
        self.backend.count_documents(filter, self.name()).await
    }
}
