//! Convenient re-exports of commonly used types from authorstore.
//!
//! ```ignore
//! use authorstore::prelude::*;
//! ```

pub use authorstore_core::{
    backend::{StoreBackend, StoreBackendBuilder, UpdateOutcome},
    document::{Document, DocumentExt, parse_id},
    query::{Expr, FieldOp, Filter, Query, QueryBuilder, Update},
    error::{DocumentStoreError, DocumentStoreResult},
};

pub use crate::{
    config::AuthorStoreSettings,
    model::{Author, AuthorBookCounts, Book},
    service::AuthorRecordStore,
};
