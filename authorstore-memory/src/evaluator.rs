//! Filter and update evaluation for in-memory documents.

use std::collections::HashMap;
use bson::{Bson, Document};

use authorstore_core::{
    query::{QueryVisitor, Expr, FieldOp, Update},
    error::{DocumentStoreError, DocumentStoreResult},
};


/// Comparable view over BSON values.
///
/// Integers and floats are normalized to `f64` so that an `Int32` stored by one
/// client equals an `Int64` filter value from another.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    Null,
    Bool(bool),
    Number(f64),
    String(&'a str),
    ObjectId([u8; 12]),
    Binary(u8, &'a [u8]),
    Array(Vec<Comparable<'a>>),
    Map(HashMap<&'a str, Comparable<'a>>),
    /// Any other BSON type, equal only to an identical value.
    Other(&'a Bson),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(*value as f64),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::ObjectId(oid) => Comparable::ObjectId(oid.bytes()),
            Bson::Binary(binary) => Comparable::Binary(u8::from(binary.subtype), &binary.bytes),
            Bson::Array(arr) => Comparable::Array(
                arr
                    .iter()
                    .map(Comparable::from)
                    .collect::<Vec<_>>()
            ),
            Bson::Document(doc) => Comparable::Map(
                doc
                    .iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect::<HashMap<_, _>>()
            ),
            other => Comparable::Other(other),
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::ObjectId(a), Comparable::ObjectId(b)) => a == b,
            (Comparable::Binary(sa, a), Comparable::Binary(sb, b)) => sa == sb && a == b,
            (Comparable::Other(a), Comparable::Other(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            _ => false,
        }
    }
}


pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Document,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    pub fn evaluate(&mut self, expr: &Expr) -> DocumentStoreResult<bool> {
        self.visit_expr(expr)
    }

    /// Returns whether `document` matches `filter`; no filter matches everything.
    pub fn matches(document: &Document, filter: Option<&Expr>) -> DocumentStoreResult<bool> {
        match filter {
            Some(expr) => DocumentEvaluator::new(document).evaluate(expr),
            None => Ok(true),
        }
    }
}

impl<'a> QueryVisitor for DocumentEvaluator<'a> {
    type Output = bool;
    type Error = DocumentStoreError;

    fn visit_field(&mut self, field: &str, op: &FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        let Some(field_value) = self.document.get(field) else {
            return Ok(false);
        };

        match op {
            FieldOp::Eq => Ok(Comparable::from(field_value) == Comparable::from(value)),
            FieldOp::Contains => match Comparable::from(field_value) {
                Comparable::Array(array) => Ok(
                    array
                        .iter()
                        .any(|item| item == &Comparable::from(value))
                ),
                _ => Ok(false),
            },
            FieldOp::ArrayEq => match (Comparable::from(field_value), Comparable::from(value)) {
                (left @ Comparable::Array(_), right @ Comparable::Array(_)) => Ok(left == right),
                (_, Comparable::Array(_)) => Ok(false),
                _ => Err(DocumentStoreError::Backend(format!(
                    "array equality on {field} requires an array value",
                ))),
            },
        }
    }
}

/// Applies `update` to `document` in place, returning whether it changed.
pub(crate) fn apply_update(document: &mut Document, update: &Update) -> DocumentStoreResult<bool> {
    match update {
        Update::Pull { field, value } => match document.get_mut(field) {
            Some(Bson::Array(items)) => {
                let before = items.len();
                let target = Comparable::from(value);
                items.retain(|item| Comparable::from(item) != target);

                Ok(items.len() != before)
            },
            Some(other) => Err(DocumentStoreError::Backend(format!(
                "cannot pull from non-array field {field} ({:?})",
                other.element_type(),
            ))),
            None => Ok(false),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use authorstore_core::query::Filter;
    use bson::{doc, oid::ObjectId, DateTime};

    #[test]
    fn contains_matches_array_members_only() {
        let book = doc! { "Authors": ["A", "B"], "Title": "A" };

        assert!(DocumentEvaluator::new(&book).evaluate(&Filter::contains("Authors", "B")).unwrap());
        assert!(!DocumentEvaluator::new(&book).evaluate(&Filter::contains("Authors", "C")).unwrap());
        assert!(!DocumentEvaluator::new(&book).evaluate(&Filter::contains("Title", "A")).unwrap());
    }

    #[test]
    fn array_eq_matches_empty_arrays() {
        let empty = doc! { "Authors": [] };
        let full = doc! { "Authors": ["A"] };
        let missing = doc! { "Title": "T" };
        let filter = Filter::array_eq("Authors", Vec::<String>::new());

        assert!(DocumentEvaluator::matches(&empty, Some(&filter)).unwrap());
        assert!(!DocumentEvaluator::matches(&full, Some(&filter)).unwrap());
        assert!(!DocumentEvaluator::matches(&missing, Some(&filter)).unwrap());
    }

    #[test]
    fn eq_compares_object_id_identifiers() {
        let id = ObjectId::new();
        let other = ObjectId::new();
        let document = doc! { "_id": id };

        assert!(DocumentEvaluator::matches(&document, Some(&Filter::id(id))).unwrap());
        assert!(!DocumentEvaluator::matches(&document, Some(&Filter::id(other))).unwrap());
    }

    #[test]
    fn unlisted_types_equal_only_identical_values() {
        let document = doc! { "Published": DateTime::from_millis(1_000) };

        assert!(DocumentEvaluator::matches(&document, Some(&Filter::eq("Published", DateTime::from_millis(1_000)))).unwrap());
        assert!(!DocumentEvaluator::matches(&document, Some(&Filter::eq("Published", DateTime::from_millis(2_000)))).unwrap());
        assert!(!DocumentEvaluator::matches(&document, Some(&Filter::eq("Published", Bson::Null))).unwrap());
    }

    #[test]
    fn eq_normalizes_numbers() {
        let document = doc! { "Edition": 2_i32 };
        assert!(DocumentEvaluator::matches(&document, Some(&Filter::eq("Edition", 2_i64))).unwrap());
    }

    #[test]
    fn pull_removes_every_match_and_keeps_order() {
        let mut book = doc! { "Authors": ["X", "Y", "X", "Z"] };

        assert!(apply_update(&mut book, &Update::pull("Authors", "X")).unwrap());
        assert_eq!(book.get_array("Authors").unwrap(), &vec![Bson::from("Y"), Bson::from("Z")]);

        assert!(!apply_update(&mut book, &Update::pull("Authors", "X")).unwrap());
    }

    #[test]
    fn pull_rejects_non_array_fields() {
        let mut book = doc! { "Authors": "X" };
        assert!(apply_update(&mut book, &Update::pull("Authors", "X")).is_err());

        let mut untouched = doc! { "Title": "T" };
        assert!(!apply_update(&mut untouched, &Update::pull("Authors", "X")).unwrap());
    }
}
