//! Translation from authorstore filters and updates to MongoDB syntax.

use bson::{Document, Bson, doc};

use authorstore_core::{
    query::{QueryVisitor, FieldOp, Update},
    error::DocumentStoreError,
};


/// Translates filter expressions into MongoDB query documents.
pub(crate) struct MongoQueryTranslator;

impl QueryVisitor for MongoQueryTranslator {
    type Output = Document;
    type Error = DocumentStoreError;

    fn visit_field(&mut self, field: &str, op: &FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            field: match op {
                FieldOp::Eq => doc! { "$eq": value },
                FieldOp::Contains => doc! { "$elemMatch": { "$eq": value } },
                FieldOp::ArrayEq => match value {
                    Bson::Array(_) => doc! { "$eq": value },
                    _ => return Err(DocumentStoreError::Backend(format!("array equality on {field} requires an array value"))),
                },
            }
        })
    }
}

/// Translates an update into a MongoDB update document.
pub(crate) fn translate_update(update: &Update) -> Document {
    match update {
        Update::Pull { field, value } => doc! { "$pull": { field: value } },
    }
}
