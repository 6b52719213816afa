//! Author and book records.
//!
//! Field names are stored in PascalCase, the layout existing clients of the
//! `authors` and `books` collections write. Books reference their authors by
//! name, never by id.

use std::collections::HashMap;

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};

use authorstore_core::document::Document;

/// Stored name of [`Author::author_of_book`], the cascade delete key.
pub const AUTHOR_OF_BOOK_FIELD: &str = "AuthorOfBook";

/// Stored name of [`Book::authors`].
pub const AUTHORS_FIELD: &str = "Authors";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Author {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub first_name: String,
    pub last_name: String,
    /// Name that books list this author under.
    pub author_of_book: String,
}

impl Document for Author {
    fn id(&self) -> Option<&ObjectId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }

    fn collection_name() -> &'static str {
        "authors"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Book {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    /// Author names, in byline order.
    pub authors: Vec<String>,
}

impl Document for Book {
    fn id(&self) -> Option<&ObjectId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }

    fn collection_name() -> &'static str {
        "books"
    }
}

/// Number of books each author name appears in.
///
/// Names iterate in the order they were first seen. Serializes as a map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorBookCounts {
    entries: Vec<(String, u64)>,
    positions: HashMap<String, usize>,
}

impl AuthorBookCounts {
    /// Creates an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one more occurrence of `name`, starting at 1 on first sight.
    pub fn record(&mut self, name: &str) {
        match self.positions.get(name) {
            Some(&position) => self.entries[position].1 += 1,
            None => {
                self.positions.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), 1));
            },
        }
    }

    /// Returns the count for `name`, if it was seen at all.
    pub fn get(&self, name: &str) -> Option<u64> {
        self.positions
            .get(name)
            .map(|&position| self.entries[position].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(name, count)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
    }
}

impl<'a> FromIterator<&'a str> for AuthorBookCounts {
    fn from_iter<I: IntoIterator<Item = &'a str>>(names: I) -> Self {
        let mut counts = Self::new();
        for name in names {
            counts.record(name);
        }
        counts
    }
}

impl Serialize for AuthorBookCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, count) in &self.entries {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}
