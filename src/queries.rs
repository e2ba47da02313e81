//! The resolvers of the GraphQL schema.
use crate::{
    book_schema::{Book, BookDeleteResponse, BookInput, NewBook},
    db::BookStore,
    errors::StoreError,
};
use async_graphql::{Error as GraphQLError, ErrorExtensions as _, Object, Result};
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::{debug, error};

/// The root query object.
#[derive(Clone, Debug)]
pub(crate) struct Query {
    /// Where the books are stored.
    pub(crate) db: Arc<dyn BookStore>,
}

#[Object]
impl Query {
    /// Returns every book, in no particular order.
    async fn books(&self) -> Result<Vec<Book>> {
        debug!("listing books");
        let books = self.db.list_books().await.map_err(report)?;
        Ok(books.into_iter().map(Book::from).collect())
    }
}

/// The root mutation object.
#[derive(Clone, Debug)]
pub(crate) struct Mutation {
    /// Where the books are stored.
    pub(crate) db: Arc<dyn BookStore>,
}

#[Object]
impl Mutation {
    /// Adds a book and returns it as it was stored.
    async fn add_book(&self, title: Option<String>, author: Option<String>) -> Result<Book> {
        debug!(?title, ?author, "adding book");
        let id = self
            .db
            .insert_book(NewBook { title, author })
            .await
            .map_err(report)?;

        // Read back rather than echo the arguments, so the response is what was actually stored.
        self.db
            .find_book(id)
            .await
            .and_then(|book| book.ok_or(StoreError::NotFound(id)))
            .map(Book::from)
            .map_err(report)
    }

    /// Deletes the book with the given id. The confirmation is sent even if no book had that id.
    async fn delete_book(&self, id: String) -> Result<BookDeleteResponse> {
        debug!(%id, "deleting book");
        let object_id = parse_id(&id).map_err(report)?;
        self.db.delete_book(object_id).await.map_err(report)?;

        Ok(BookDeleteResponse {
            message: format!("Book with id: {id} has been deleted"),
        })
    }

    /// Changes the fields given in `input` on the book with the given id, and returns the book.
    async fn update_book(&self, id: String, input: Option<BookInput>) -> Result<Book> {
        debug!(%id, ?input, "updating book");
        let object_id = parse_id(&id).map_err(report)?;
        let changes = input.unwrap_or_default();

        // MongoDB rejects an empty `$set`, and there is nothing to write anyway.
        if !changes.is_empty()
            && !self
                .db
                .update_book(object_id, &changes)
                .await
                .map_err(report)?
        {
            return Err(report(StoreError::NotFound(object_id)));
        }

        self.db
            .find_book(object_id)
            .await
            .and_then(|book| book.ok_or(StoreError::NotFound(object_id)))
            .map(Book::from)
            .map_err(report)
    }
}

/// Converts an id given by the client.
///
/// # Errors
///
/// Returns [`StoreError::InvalidId`] if `id` is not 24 hexadecimal digits.
fn parse_id(id: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(id).map_err(|source| StoreError::InvalidId {
        id: id.to_owned(),
        source,
    })
}

/// Turns a storage error into the error sent to the client. Errors that aren't the client's fault
/// are logged.
fn report(err: StoreError) -> GraphQLError {
    if err.is_internal() {
        error!(error = %err, "storage operation failed");
    }
    err.extend()
}
