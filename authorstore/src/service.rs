//! Record store for authors and the books that cite them.
//!
//! Every operation is one store round-trip, or a short fixed sequence of them
//! awaited in order. Nothing is cached between calls and no lock is taken
//! beyond what the backend does for a single operation.

use bson::oid::ObjectId;
use tracing::{debug, info, instrument};

use authorstore_core::{
    backend::StoreBackend,
    collection::TypedCollection,
    error::DocumentStoreResult,
    query::{Filter, Update},
    store::DocumentStore,
};

use crate::{
    config::AuthorStoreSettings,
    model::{AUTHORS_FIELD, AUTHOR_OF_BOOK_FIELD, Author, AuthorBookCounts, Book},
};

/// Data access for the `authors` and `books` collections.
///
/// Missing records are never errors: lookups return `None` and writes against
/// an unknown id do nothing. Errors are store failures, passed through as-is.
///
/// # Example
///
/// ```ignore
/// use authorstore::{AuthorRecordStore, AuthorStoreSettings, memory::InMemoryStore};
///
/// let store = AuthorRecordStore::new(InMemoryStore::new(), &AuthorStoreSettings::default());
/// let author = store.create(author).await?;
/// assert!(store.delete_author_cascade(&author.author_of_book).await?);
/// ```
#[derive(Debug)]
pub struct AuthorRecordStore<B: StoreBackend> {
    store: DocumentStore<B>,
    authors_collection: String,
    books_collection: String,
}

impl<B: StoreBackend> AuthorRecordStore<B> {
    /// Creates a record store over `backend`, using the collection names in `settings`.
    pub fn new(backend: B, settings: &AuthorStoreSettings) -> Self {
        Self {
            store: DocumentStore::new(backend),
            authors_collection: settings.authors_collection_name.clone(),
            books_collection: settings.books_collection_name.clone(),
        }
    }

    fn authors(&self) -> TypedCollection<'_, B, Author> {
        self.store.typed_collection(&self.authors_collection)
    }

    fn books(&self) -> TypedCollection<'_, B, Book> {
        self.store.typed_collection(&self.books_collection)
    }

    /// Returns every author in the store's natural order.
    #[instrument(skip(self))]
    pub async fn get_all(&self) -> DocumentStoreResult<Vec<Author>> {
        self.authors().find_all().await
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: ObjectId) -> DocumentStoreResult<Option<Author>> {
        self.authors().find_one(Filter::id(id)).await
    }

    /// Inserts `author` and returns it with its store-assigned id.
    ///
    /// No validation and no uniqueness check is made on the author's fields.
    #[instrument(skip_all)]
    pub async fn create(&self, author: Author) -> DocumentStoreResult<Author> {
        let author = self.authors().insert_one(author).await?;
        debug!(id = ?author.id, "created author");

        Ok(author)
    }

    /// Replaces the whole author record at `id`. Does nothing if `id` is unknown.
    #[instrument(skip(self, author))]
    pub async fn update(&self, id: ObjectId, author: Author) -> DocumentStoreResult<()> {
        let outcome = self.authors().replace_one(Filter::id(id), &author).await?;
        debug!(matched = outcome.matched, "replaced author");

        Ok(())
    }

    /// Deletes the author at `id`. Does nothing if `id` is unknown.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ObjectId) -> DocumentStoreResult<()> {
        let deleted = self.authors().delete_one(Filter::id(id)).await?;
        debug!(deleted, "deleted author");

        Ok(())
    }

    /// Deletes the author filed under `author_name` and removes the name from every book.
    ///
    /// Returns `false`, touching no book, when no author has
    /// `AuthorOfBook == author_name`. Otherwise the name is pulled from every
    /// book listing it; if that changed any book, all books whose author list
    /// is now empty are deleted and the result is whether any were. In every
    /// other case the result is `true`.
    ///
    /// The empty-list sweep is store-wide: a book that already had no authors
    /// before this call is deleted along with the ones this call emptied.
    #[instrument(skip(self))]
    pub async fn delete_author_cascade(&self, author_name: &str) -> DocumentStoreResult<bool> {
        let deleted = self
            .authors()
            .delete_one(Filter::eq(AUTHOR_OF_BOOK_FIELD, author_name))
            .await?;

        if deleted == 0 {
            debug!("no author filed under this name");
            return Ok(false);
        }

        let books = self.books();
        let pulled = books
            .update_many(
                Filter::contains(AUTHORS_FIELD, author_name),
                Update::pull(AUTHORS_FIELD, author_name),
            )
            .await?;

        if pulled.modified > 0 {
            let orphaned = Filter::array_eq(AUTHORS_FIELD, Vec::<String>::new());

            if books.count(orphaned.clone()).await? > 0 {
                let removed = books.delete_many(orphaned).await?;
                info!(modified = pulled.modified, removed, "cascaded author delete");

                return Ok(removed > 0);
            }
        }

        info!(modified = pulled.modified, removed = 0, "cascaded author delete");

        Ok(true)
    }

    /// Counts, for every author name listed on any book, how many books list it.
    ///
    /// A name listed twice on one book counts twice.
    #[instrument(skip(self))]
    pub async fn count_books_per_author(&self) -> DocumentStoreResult<AuthorBookCounts> {
        let books = self.books().find_all().await?;
        debug!(books = books.len(), "tallying authors");

        Ok(books
            .iter()
            .flat_map(|book| book.authors.iter().map(String::as_str))
            .collect())
    }

    /// Returns every book in the store's natural order.
    #[instrument(skip(self))]
    pub async fn get_all_books(&self) -> DocumentStoreResult<Vec<Book>> {
        self.books().find_all().await
    }

    #[instrument(skip(self))]
    pub async fn get_book_by_id(&self, id: ObjectId) -> DocumentStoreResult<Option<Book>> {
        self.books().find_one(Filter::id(id)).await
    }

    /// Inserts `book` and returns it with its store-assigned id.
    #[instrument(skip_all)]
    pub async fn create_book(&self, book: Book) -> DocumentStoreResult<Book> {
        let book = self.books().insert_one(book).await?;
        debug!(id = ?book.id, "created book");

        Ok(book)
    }

    /// Replaces the whole book record at `id`. Does nothing if `id` is unknown.
    #[instrument(skip(self, book))]
    pub async fn update_book(&self, id: ObjectId, book: Book) -> DocumentStoreResult<()> {
        let outcome = self.books().replace_one(Filter::id(id), &book).await?;
        debug!(matched = outcome.matched, "replaced book");

        Ok(())
    }

    /// Deletes the book at `id`. Does nothing if `id` is unknown.
    #[instrument(skip(self))]
    pub async fn delete_book(&self, id: ObjectId) -> DocumentStoreResult<()> {
        let deleted = self.books().delete_one(Filter::id(id)).await?;
        debug!(deleted, "deleted book");

        Ok(())
    }

    /// Shuts down the store and releases the backend connection.
    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        self.store.shutdown().await
    }
}

#[cfg(feature = "mongodb")]
impl AuthorRecordStore<authorstore_mongodb::MongoDbStore> {
    /// Connects to MongoDB with the connection string and database in `settings`.
    pub async fn connect(settings: &AuthorStoreSettings) -> DocumentStoreResult<Self> {
        use authorstore_core::backend::StoreBackendBuilder;

        let backend = authorstore_mongodb::MongoDbStore::builder(&settings.connection_string, &settings.database_name)
            .build()
            .await?;

        Ok(Self::new(backend, settings))
    }
}
