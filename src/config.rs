//! Configuration read from the environment.

use crate::errors::ConfigError;
use dotenvy::dotenv;
use std::{
    env,
    net::{Ipv4Addr, SocketAddr},
};

/// Variable holding the connection string of the MongoDB deployment.
const MONGODB_URI: &str = "MONGODB_URI";
/// Variable holding the name of the database the `books` collection lives in.
const MONGODB_DATABASE: &str = "MONGODB_DATABASE";
/// Variable overriding the address the server listens on.
const LISTEN_ADDR: &str = "LISTEN_ADDR";
/// Port listened on unless [`LISTEN_ADDR`] says otherwise.
const DEFAULT_PORT: u16 = 4000;

/// Settings needed to start the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Config {
    /// Connection string of the MongoDB deployment.
    pub(crate) mongodb_uri: String,
    /// Name of the database holding the books.
    pub(crate) mongodb_database: String,
    /// Address to accept requests on.
    pub(crate) listen_addr: SocketAddr,
}

impl Config {
    /// Reads the configuration from the process environment, after loading a `.env` file if one
    /// exists.
    ///
    /// # Errors
    ///
    /// See [`from_lookup`](Self::from_lookup).
    pub(crate) fn from_env() -> Result<Self, ConfigError> {
        // Not having a `.env` file is fine, the variables may be set some other way.
        let _unused = dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the configuration using `lookup` to get the value of a variable.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `MONGODB_URI` or `MONGODB_DATABASE` is unset or empty.
    /// - `LISTEN_ADDR` is set but is not a socket address.
    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let mongodb_uri = required(MONGODB_URI)?;
        let mongodb_database = required(MONGODB_DATABASE)?;
        let listen_addr = match lookup(LISTEN_ADDR) {
            Some(value) => value
                .parse()
                .map_err(|source| ConfigError::InvalidAddress { value, source })?,
            None => SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
        };

        Ok(Self {
            mongodb_uri,
            mongodb_database,
            listen_addr,
        })
    }
}
