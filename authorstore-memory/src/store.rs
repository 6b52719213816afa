//! In-memory storage implementation for document stores.
//!
//! Collections are kept as insertion-ordered vectors of BSON documents behind
//! a single async-aware read-write lock.

use std::{collections::HashMap, sync::Arc};
use async_trait::async_trait;
use mea::rwlock::RwLock;
use bson::{Bson, Document, oid::ObjectId};
use tracing::debug;

use authorstore_core::{
    backend::{StoreBackend, StoreBackendBuilder, UpdateOutcome},
    document::ID_FIELD,
    error::DocumentStoreResult,
    query::{Expr, Query, Update},
};

use crate::evaluator::{DocumentEvaluator, apply_update};

type StoreMap = HashMap<String, Vec<Document>>;


/// Thread-safe in-memory document storage backend.
///
/// # Thread Safety
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, allowing
/// it to be safely shared across async tasks. Multiple clones of the same instance
/// share the same underlying data. Each operation holds the lock for its whole
/// duration, so single operations are atomic.
///
/// # Performance
///
/// Every filter scans the whole collection.
///
/// # Example
///
/// ```ignore
/// use authorstore_memory::InMemoryStore;
/// use authorstore_core::{backend::StoreBackend, query::Filter};
/// use bson::doc;
///
/// let store = InMemoryStore::new();
/// let id = store.insert_document(doc! { "AuthorOfBook": "X" }, "authors").await?;
/// assert_eq!(store.count_documents(Filter::id(id), "authors").await?, 1);
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> documents in insertion order
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }
}

/// Returns the position of every document in `documents` matching `filter`.
fn matching_positions(documents: &[Document], filter: &Expr) -> DocumentStoreResult<Vec<usize>> {
    let mut positions = Vec::new();

    for (position, document) in documents.iter().enumerate() {
        if DocumentEvaluator::matches(document, Some(filter))? {
            positions.push(position);
        }
    }

    Ok(positions)
}


#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_document(&self, mut document: Document, collection: &str) -> DocumentStoreResult<ObjectId> {
        let id = ObjectId::new();
        document.insert(ID_FIELD, id);

        self.store
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(document);

        debug!(%collection, %id, "inserted document");

        Ok(id)
    }

    async fn replace_one(&self, filter: Expr, mut document: Document, collection: &str) -> DocumentStoreResult<UpdateOutcome> {
        let mut store = self.store.write().await;
        let Some(documents) = store.get_mut(collection) else {
            return Ok(UpdateOutcome::default());
        };

        let Some(position) = matching_positions(documents, &filter)?.first().copied() else {
            return Ok(UpdateOutcome::default());
        };

        let existing = &mut documents[position];

        // The stored identifier wins over whatever the replacement carries.
        match existing.get(ID_FIELD).cloned() {
            Some(id) => {
                document.insert(ID_FIELD, id);
            },
            None => {
                document.remove(ID_FIELD);
            },
        }

        let modified = *existing != document;
        *existing = document;

        Ok(UpdateOutcome { matched: 1, modified: u64::from(modified) })
    }

    async fn delete_one(&self, filter: Expr, collection: &str) -> DocumentStoreResult<u64> {
        let mut store = self.store.write().await;
        let Some(documents) = store.get_mut(collection) else {
            return Ok(0);
        };

        match matching_positions(documents, &filter)?.first() {
            Some(&position) => {
                documents.remove(position);
                Ok(1)
            },
            None => Ok(0),
        }
    }

    async fn delete_many(&self, filter: Expr, collection: &str) -> DocumentStoreResult<u64> {
        let mut store = self.store.write().await;
        let Some(documents) = store.get_mut(collection) else {
            return Ok(0);
        };

        let positions = matching_positions(documents, &filter)?;

        // Remove back to front so earlier positions stay valid.
        for &position in positions.iter().rev() {
            documents.remove(position);
        }

        Ok(positions.len() as u64)
    }

    async fn update_many(&self, filter: Expr, update: Update, collection: &str) -> DocumentStoreResult<UpdateOutcome> {
        let mut store = self.store.write().await;
        let Some(documents) = store.get_mut(collection) else {
            return Ok(UpdateOutcome::default());
        };

        let positions = matching_positions(documents, &filter)?;

        // Apply to copies first so a failing document leaves the collection untouched.
        let mut updated = Vec::with_capacity(positions.len());
        for &position in &positions {
            let mut document = documents[position].clone();
            let changed = apply_update(&mut document, &update)?;
            updated.push((position, document, changed));
        }

        let mut outcome = UpdateOutcome { matched: positions.len() as u64, modified: 0 };
        for (position, document, changed) in updated {
            if changed {
                documents[position] = document;
                outcome.modified += 1;
            }
        }

        Ok(outcome)
    }

    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        let store = self.store.read().await;
        let Some(documents) = store.get(collection) else {
            return Ok(vec![]);
        };

        let limit = query.limit.unwrap_or(usize::MAX);
        let mut results = Vec::new();

        for document in documents {
            if results.len() >= limit {
                break;
            }
            if DocumentEvaluator::matches(document, query.filter.as_ref())? {
                results.push(Bson::Document(document.clone()));
            }
        }

        Ok(results)
    }

    async fn count_documents(&self, filter: Expr, collection: &str) -> DocumentStoreResult<u64> {
        let store = self.store.read().await;

        Ok(match store.get(collection) {
            Some(documents) => matching_positions(documents, &filter)?.len() as u64,
            None => 0,
        })
    }
}


/// Builder for constructing [`InMemoryStore`] instances.
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new [`InMemoryStore`] instance.
    ///
    /// This always succeeds and returns a freshly initialized store.
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use authorstore_core::query::Filter;
    use bson::doc;

    #[tokio::test]
    async fn insert_assigns_fresh_ids_in_order() {
        let store = InMemoryStore::new();
        let first = store.insert_document(doc! { "Title": "one" }, "books").await.unwrap();
        let second = store.insert_document(doc! { "Title": "two", "_id": first }, "books").await.unwrap();
        assert_ne!(first, second);

        let titles = store
            .query_documents(Query::new(), "books")
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.as_document().unwrap().get_str("Title").unwrap().to_string())
            .collect::<Vec<_>>();
        assert_eq!(titles, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn writes_to_unknown_collections_affect_nothing() {
        let store = InMemoryStore::new();
        let filter = Filter::eq("Title", "missing");

        assert_eq!(store.delete_one(filter.clone(), "nowhere").await.unwrap(), 0);
        assert_eq!(store.delete_many(filter.clone(), "nowhere").await.unwrap(), 0);
        assert_eq!(store.count_documents(filter.clone(), "nowhere").await.unwrap(), 0);
        assert_eq!(
            store.replace_one(filter, doc! {}, "nowhere").await.unwrap(),
            UpdateOutcome::default(),
        );
    }

    #[tokio::test]
    async fn replace_keeps_stored_id() {
        let store = InMemoryStore::new();
        let id = store.insert_document(doc! { "Title": "old" }, "books").await.unwrap();

        let outcome = store
            .replace_one(Filter::id(id), doc! { "Title": "new", "_id": ObjectId::new() }, "books")
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome { matched: 1, modified: 1 });

        let stored = store.query_documents(Query::new(), "books").await.unwrap();
        assert_eq!(stored, vec![Bson::Document(doc! { "Title": "new", "_id": id })]);
    }

    #[tokio::test]
    async fn update_many_reports_matched_and_modified() {
        let store = InMemoryStore::new();
        store.insert_document(doc! { "Authors": ["X", "Y"] }, "books").await.unwrap();
        store.insert_document(doc! { "Authors": ["X"] }, "books").await.unwrap();
        store.insert_document(doc! { "Authors": ["Y"] }, "books").await.unwrap();

        let outcome = store
            .update_many(Filter::contains("Authors", "X"), Update::pull("Authors", "X"), "books")
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome { matched: 2, modified: 2 });

        let empty = Filter::array_eq("Authors", Vec::<String>::new());
        assert_eq!(store.count_documents(empty.clone(), "books").await.unwrap(), 1);
        assert_eq!(store.delete_many(empty, "books").await.unwrap(), 1);
        assert_eq!(store.query_documents(Query::new(), "books").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn delete_one_removes_only_first_match() {
        let store = InMemoryStore::new();
        store.insert_document(doc! { "AuthorOfBook": "X", "n": 1 }, "authors").await.unwrap();
        store.insert_document(doc! { "AuthorOfBook": "X", "n": 2 }, "authors").await.unwrap();

        assert_eq!(store.delete_one(Filter::eq("AuthorOfBook", "X"), "authors").await.unwrap(), 1);

        let remaining = store.query_documents(Query::new(), "authors").await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].as_document().unwrap().get_i32("n").unwrap(), 2);
    }

    #[tokio::test]
    async fn query_respects_limit() {
        let store = InMemoryStore::new();
        for title in ["a", "b", "c"] {
            store.insert_document(doc! { "Title": title, "Kind": "k" }, "books").await.unwrap();
        }

        let query = Query::builder().filter(Filter::eq("Kind", "k")).limit(2).build();
        assert_eq!(store.query_documents(query, "books").await.unwrap().len(), 2);
    }
}
