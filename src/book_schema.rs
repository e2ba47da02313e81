//! A file containing the structs that build the GraphQL schema, and the shape books are stored in.
use async_graphql::{ID, InputObject, MaybeUndefined, SimpleObject};
use mongodb::bson::{Bson, Document, oid::ObjectId};
use serde::{Deserialize, Serialize};

// --- Needed for fetching ---
/// The representation of a book
#[derive(SimpleObject, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Book {
    /// The identifier assigned to the book when it was added.
    pub(crate) id: ID,
    /// The title of the book.
    pub(crate) title: Option<String>,
    /// The people who authored the book.
    pub(crate) author: Option<String>,
}

impl From<BookDocument> for Book {
    fn from(document: BookDocument) -> Self {
        Self {
            id: ID(document.id.to_hex()),
            title: document.title,
            author: document.author,
        }
    }
}

/// Confirmation that a book was deleted.
#[derive(SimpleObject, Clone, Debug)]
pub(crate) struct BookDeleteResponse {
    /// Names the id that was deleted. Sent whether or not a book actually had that id.
    pub(crate) message: String,
}

// --- Needed for updating ---
/// The fields of a book to change. Fields left out keep their value, fields set to `null` are
/// cleared.
#[derive(InputObject, Clone, Debug, Default)]
pub(crate) struct BookInput {
    /// The new title of the book.
    pub(crate) title: MaybeUndefined<String>,
    /// The new author of the book.
    pub(crate) author: MaybeUndefined<String>,
}

impl BookInput {
    /// Whether no field was supplied at all.
    pub(crate) const fn is_empty(&self) -> bool {
        matches!(
            (&self.title, &self.author),
            (MaybeUndefined::Undefined, MaybeUndefined::Undefined)
        )
    }

    /// The fields to `$set` on the stored document.
    pub(crate) fn to_set_document(&self) -> Document {
        let mut set = Document::new();
        for (field, change) in [("title", &self.title), ("author", &self.author)] {
            let value = match change {
                MaybeUndefined::Undefined => continue,
                MaybeUndefined::Null => Bson::Null,
                MaybeUndefined::Value(value) => Bson::String(value.clone()),
            };
            drop(set.insert(field, value));
        }
        set
    }
}

// --- Stored in the `books` collection ---
/// A book as it is stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct BookDocument {
    /// Assigned by the database on insert.
    #[serde(rename = "_id")]
    pub(crate) id: ObjectId,
    /// The title, missing or `null` if never given.
    pub(crate) title: Option<String>,
    /// The author, missing or `null` if never given.
    pub(crate) author: Option<String>,
}

/// A book about to be inserted, the database assigns its id. Fields that weren't given are left
/// out of the document entirely.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct NewBook {
    /// The title of the book.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) title: Option<String>,
    /// The people who authored the book.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) author: Option<String>,
}
