//! Error types used by the storage layer, configuration and startup.

use async_graphql::{Error as GraphQLError, ErrorExtensions};
use mongodb::{
    bson::oid::{Error as ObjectIdError, ObjectId},
    error::Error as MongoError,
};
use std::{
    io::Error as IoError,
    net::{AddrParseError, SocketAddr},
};
use thiserror::Error;

/// Errors that may occur when reading configuration from the environment.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// A required variable was not set, or set to an empty string.
    #[error("the environment variable `{0}` must be set")]
    Missing(&'static str),
    /// The address to listen on could not be parsed.
    #[error("`{value}` is not a valid socket address")]
    InvalidAddress {
        /// The value that was read.
        value: String,
        /// The source error.
        #[source]
        source: AddrParseError,
    },
}

/// Errors that may occur when operating on the book collection. Converted into GraphQL errors by
/// the resolvers, with the `code` extension set according to whose fault the error is.
#[derive(Debug, Error)]
pub(crate) enum StoreError {
    /// The identifier given by the client is not a valid [`ObjectId`].
    #[error("`{id}` is not a valid book id")]
    InvalidId {
        /// The identifier as it was given.
        id: String,
        /// The source error.
        #[source]
        source: ObjectIdError,
    },
    /// There was no book with the identifier.
    #[error("no book with id: {0}")]
    NotFound(ObjectId),
    /// The database accepted an insert but did not report an [`ObjectId`] for it.
    #[error("the database did not return an id for the inserted book")]
    MissingInsertedId,
    /// Error occured when communicating with the database.
    #[error("database error: {0}")]
    Database(#[from] MongoError),
}

impl StoreError {
    /// The value of the `code` extension of the resulting GraphQL error.
    pub(crate) const fn code(&self) -> &'static str {
        match self {
            Self::InvalidId { .. } => "BAD_USER_INPUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::MissingInsertedId | Self::Database(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Whether the error is caused by the server rather than by the request.
    pub(crate) const fn is_internal(&self) -> bool {
        matches!(self, Self::MissingInsertedId | Self::Database(_))
    }
}

impl ErrorExtensions for StoreError {
    fn extend(&self) -> GraphQLError {
        GraphQLError::new(self.to_string())
            .extend_with(|_, extensions| extensions.set("code", self.code()))
    }
}

/// Errors that stop the server from starting, or end it while serving.
#[derive(Debug, Error)]
pub(crate) enum StartupError {
    /// The configuration was missing or malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The database could not be reached.
    #[error("could not connect to the database: {0}")]
    Connect(#[from] MongoError),
    /// The listening address could not be bound.
    #[error("could not bind {addr}: {source}")]
    Bind {
        /// The address that was requested.
        addr: SocketAddr,
        /// The source error.
        #[source]
        source: IoError,
    },
    /// The server stopped with an error.
    #[error("server error: {0}")]
    Serve(#[source] IoError),
}
