//! Core traits for document representation and serialization.
//!
//! Identifiers are assigned by the store when a document is inserted, so a
//! document that has not been stored yet carries no id.

use bson::{Bson, de::deserialize_from_bson, oid::ObjectId, ser::serialize_to_bson};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// Name of the field every stored document keeps its identifier in.
pub const ID_FIELD: &str = "_id";

/// Core trait that all documents stored in a document store must implement.
///
/// Implementers serialize their identifier under [`ID_FIELD`] and skip it when
/// it is `None`, so that the backend can assign one on insert.
///
/// # Example
///
/// ```ignore
/// use authorstore_core::document::Document;
/// use bson::oid::ObjectId;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Publisher {
///     #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
///     pub id: Option<ObjectId>,
///     pub name: String,
/// }
///
/// impl Document for Publisher {
///     fn id(&self) -> Option<&ObjectId> {
///         self.id.as_ref()
///     }
///
///     fn set_id(&mut self, id: ObjectId) {
///         self.id = Some(id);
///     }
///
///     fn collection_name() -> &'static str {
///         "publishers"
///     }
/// }
/// ```
pub trait Document: Serialize + DeserializeOwned + Send + Sync + Clone + 'static {
    /// Returns this document's identifier, if it has been stored.
    fn id(&self) -> Option<&ObjectId>;

    /// Sets this document's identifier.
    fn set_id(&mut self, id: ObjectId);

    /// Returns the default name of the collection this document belongs to.
    fn collection_name() -> &'static str;
}

/// Extension trait providing BSON conversion for documents.
///
/// This trait is automatically implemented for all types that implement [`Document`].
pub trait DocumentExt: Document {
    /// Converts this document to a BSON document for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the value does not serialize
    /// to a BSON document.
    fn to_document(&self) -> DocumentStoreResult<bson::Document>;

    /// Creates a document from a stored BSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or the structure is invalid.
    fn from_bson(bson: Bson) -> DocumentStoreResult<Self>;
}

impl<D: Document> DocumentExt for D {
    fn to_document(&self) -> DocumentStoreResult<bson::Document> {
        match serialize_to_bson(self)? {
            Bson::Document(document) => Ok(document),
            other => Err(DocumentStoreError::InvalidDocument(format!(
                "{} serialized to {:?}, expected a document",
                D::collection_name(),
                other.element_type(),
            ))),
        }
    }

    fn from_bson(bson: Bson) -> DocumentStoreResult<Self> {
        Ok(deserialize_from_bson(bson)?)
    }
}

/// Parses the 24-character hex form of an ObjectId into a document identifier.
///
/// # Errors
///
/// Returns [`DocumentStoreError::InvalidId`] if `value` is not a valid ObjectId.
pub fn parse_id(value: &str) -> DocumentStoreResult<ObjectId> {
    ObjectId::parse_str(value).map_err(|e| DocumentStoreError::InvalidId(format!("{value}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_object_id_hex() {
        let id = ObjectId::new();
        assert_eq!(parse_id(&id.to_hex()).unwrap(), id);
    }

    #[test]
    fn parse_id_rejects_other_forms() {
        for value in ["", "67a1", "00000000-0000-0000-0000-000000000000", "zzzzzzzzzzzzzzzzzzzzzzzz"] {
            assert!(matches!(parse_id(value), Err(DocumentStoreError::InvalidId(_))), "{value}");
        }
    }
}
