//! Query, filter and update construction for document stores.
//!
//! Filters cover field equality, array membership and whole-array equality.
//! Each backend either evaluates them directly or translates them into its
//! driver's native query syntax.
//!
//! ```ignore
//! use authorstore_core::query::{Filter, Query, Update};
//!
//! let by_name = Filter::eq("AuthorOfBook", "Ursula K. Le Guin");
//! let citing = Filter::contains("Authors", "Ursula K. Le Guin");
//! let orphaned = Filter::array_eq("Authors", Vec::<String>::new());
//!
//! let first = Query::builder().filter(by_name).limit(1).build();
//! let pull = Update::pull("Authors", "Ursula K. Le Guin");
//! ```

use bson::{Bson, oid::ObjectId};

use crate::{document::ID_FIELD, error::DocumentStoreError};

/// Field comparison operators for filter expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOp {
    /// The field equals the value exactly.
    Eq,
    /// The field is an array with at least one element equal to the value.
    Contains,
    /// The field is an array equal to the value array, element by element.
    ArrayEq,
}

/// A filter expression over a single field.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// The field name to compare.
    pub field: String,
    /// The comparison operator.
    pub op: FieldOp,
    /// The value to compare against.
    pub value: Bson,
}

impl Expr {
    /// Creates a field comparison expression.
    pub fn field(field: String, op: FieldOp, value: Bson) -> Self {
        Expr { field, op, value }
    }
}

/// Helper for constructing filter expressions.
pub struct Filter;

impl Filter {
    /// Matches documents where the field equals the specified value.
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Eq, value.into())
    }

    /// Matches the document with the given identifier.
    pub fn id(id: ObjectId) -> Expr {
        Self::eq(ID_FIELD, id)
    }

    /// Matches documents where the array field contains the specified value.
    pub fn contains(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), FieldOp::Contains, value.into())
    }

    /// Matches documents where the array field equals the specified values.
    ///
    /// An empty `values` matches documents whose array is empty at query time.
    pub fn array_eq<V: Into<Bson>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Expr {
        Expr::field(
            field.into(),
            FieldOp::ArrayEq,
            Bson::Array(values.into_iter().map(Into::into).collect()),
        )
    }
}

/// A structured query for retrieving documents.
///
/// Results come back in the store's natural order; there is no sort.
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Optional filter expression to match documents. `None` matches everything.
    pub filter: Option<Expr>,
    /// Maximum number of documents to return.
    pub limit: Option<usize>,
}

impl Query {
    /// Creates a query matching every document.
    pub fn new() -> Self {
        Query { filter: None, limit: None }
    }

    /// Creates a new query builder for fluent construction.
    pub fn builder() -> QueryBuilder {
        QueryBuilder::new()
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    /// Creates a new query builder.
    pub fn new() -> Self {
        QueryBuilder { query: Query::default() }
    }

    /// Sets the filter expression for this query.
    pub fn filter(mut self, filter: Expr) -> Self {
        self.query.filter = Some(filter);
        self
    }

    /// Sets the maximum number of documents to return.
    pub fn limit(mut self, limit: usize) -> Self {
        self.query.limit = Some(limit);
        self
    }

    /// Builds and returns the final query.
    pub fn build(self) -> Query {
        self.query
    }
}

/// An in-place modification applied to every document matching a filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// Removes every element equal to `value` from the array `field`,
    /// keeping the order of the remaining elements.
    Pull {
        field: String,
        value: Bson,
    },
}

impl Update {
    /// Creates a pull update.
    pub fn pull(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Update::Pull { field: field.into(), value: value.into() }
    }
}

/// Walks a filter expression, producing a backend-specific output.
///
/// Backends implement this to either evaluate an expression against a
/// document or translate it into a native query.
pub trait QueryVisitor {
    type Output;
    type Error: Into<DocumentStoreError>;

    fn visit_field(
        &mut self,
        field: &str,
        op: &FieldOp,
        value: &Bson,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        self.visit_field(&expr.field, &expr.op, &expr.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_eq_builds_array_value() {
        let expr = Filter::array_eq("Authors", ["A", "B"]);
        assert_eq!(expr.op, FieldOp::ArrayEq);
        assert_eq!(expr.value, Bson::Array(vec!["A".into(), "B".into()]));

        let empty = Filter::array_eq("Authors", Vec::<String>::new());
        assert_eq!(empty.value, Bson::Array(vec![]));
    }

    #[test]
    fn builder_sets_filter_and_limit() {
        let query = Query::builder()
            .filter(Filter::eq("AuthorOfBook", "X"))
            .limit(1)
            .build();

        assert_eq!(query.limit, Some(1));
        assert_eq!(query.filter, Some(Filter::eq("AuthorOfBook", "X")));
        assert!(Query::new().filter.is_none());
    }
}
