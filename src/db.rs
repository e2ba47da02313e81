//! A file containing all functions that are needed for the database
use crate::{
    book_schema::{BookDocument, BookInput, NewBook},
    config::Config,
    errors::StoreError,
};
use async_trait::async_trait;
use futures::TryStreamExt as _;
use mongodb::{
    Client, Collection,
    bson::{Document, doc, oid::ObjectId},
    error::Error as MongoError,
    options::{ClientOptions, ServerApi, ServerApiVersion},
};
use std::fmt::Debug;
use tracing::{debug, info};

/// Name of the collection holding the books.
const COLLECTION: &str = "books";

/// The operations on the book collection that the resolvers need.
///
/// Implemented by [`Db`], and by an in-memory store in tests.
#[async_trait]
pub(crate) trait BookStore: Debug + Send + Sync {
    /// Returns every book, in whatever order the store yields them.
    async fn list_books(&self) -> Result<Vec<BookDocument>, StoreError>;

    /// Adds a book and returns the id the store assigned to it.
    async fn insert_book(&self, book: NewBook) -> Result<ObjectId, StoreError>;

    /// Returns the book with a matching id, if there is one.
    async fn find_book(&self, id: ObjectId) -> Result<Option<BookDocument>, StoreError>;

    /// Removes the book with a matching id. Removing a book that doesn't exist does nothing.
    async fn delete_book(&self, id: ObjectId) -> Result<(), StoreError>;

    /// Overwrites the fields supplied in `changes` on the book with a matching id. Returns whether
    /// there was such a book.
    async fn update_book(&self, id: ObjectId, changes: &BookInput) -> Result<bool, StoreError>;
}

/// A connection to the MongoDB database holding the books.
#[derive(Clone, Debug)]
pub(crate) struct Db {
    /// The client, which pools connections to the deployment.
    client: Client,
    /// Name of the database the collection lives in.
    database: String,
}

impl Db {
    /// Wraps an existing client. Nothing is sent to the server.
    pub(crate) fn new(client: Client, database: impl Into<String>) -> Self {
        Self {
            client,
            database: database.into(),
        }
    }

    /// Connects to the deployment in `config` using version 1 of the stable API, and checks that
    /// it answers.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string is invalid or the server could not be reached.
    /// The client is shut down before returning in the latter case.
    pub(crate) async fn connect(config: &Config) -> Result<Self, MongoError> {
        let mut options = ClientOptions::parse(&config.mongodb_uri).await?;
        options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .deprecation_errors(true)
                .build(),
        );
        let client = Client::with_options(options)?;

        // The driver connects lazily, so a failure would otherwise only show on the first request.
        if let Err(err) = client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
        {
            client.shutdown().await;
            return Err(err);
        }

        info!(database = %config.mongodb_database, "connected to MongoDB");
        Ok(Self::new(client, config.mongodb_database.clone()))
    }

    /// The handle to the book collection. Cheap, reuses the client's connections.
    pub(crate) fn handle<T>(&self) -> Collection<T>
    where
        T: Send + Sync,
    {
        self.client.database(&self.database).collection(COLLECTION)
    }
}

#[async_trait]
impl BookStore for Db {
    async fn list_books(&self) -> Result<Vec<BookDocument>, StoreError> {
        let cursor = self.handle::<BookDocument>().find(doc! {}).await?;
        Ok(cursor.try_collect::<Vec<_>>().await?)
    }

    async fn insert_book(&self, book: NewBook) -> Result<ObjectId, StoreError> {
        let result = self.handle::<NewBook>().insert_one(book).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or(StoreError::MissingInsertedId)
    }

    async fn find_book(&self, id: ObjectId) -> Result<Option<BookDocument>, StoreError> {
        Ok(self
            .handle::<BookDocument>()
            .find_one(doc! { "_id": id })
            .await?)
    }

    async fn delete_book(&self, id: ObjectId) -> Result<(), StoreError> {
        let result = self
            .handle::<Document>()
            .delete_one(doc! { "_id": id })
            .await?;
        debug!(%id, deleted = result.deleted_count, "deleted book");
        Ok(())
    }

    async fn update_book(&self, id: ObjectId, changes: &BookInput) -> Result<bool, StoreError> {
        let result = self
            .handle::<Document>()
            .update_one(doc! { "_id": id }, doc! { "$set": changes.to_set_document() })
            .await?;
        debug!(%id, matched = result.matched_count, "updated book");
        Ok(result.matched_count > 0)
    }
}
