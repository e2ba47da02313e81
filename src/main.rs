//! A GraphQL API for a collection of books stored in MongoDB.
//!
//! Books can be listed, added, updated and deleted. The database and listening address are read
//! from the environment, see [`config`].
use crate::{
    app_builder::build_app,
    config::Config,
    db::{BookStore, Db},
    errors::StartupError,
    queries::{Mutation, Query},
};
use async_graphql::{EmptySubscription, Schema};
use axum::serve;
use std::{future::pending, sync::Arc};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[cfg(test)]
mod api_testing;
mod app_builder;
mod book_schema;
mod config;
mod db;
mod errors;
mod queries;

/// A type introduced just to make the handler a bit more readable.
pub(crate) type BookSchema = Schema<Query, Mutation, EmptySubscription>;

/// Builds the schema, with the resolvers using `db` for storage.
pub(crate) fn build_schema(db: Arc<dyn BookStore>) -> BookSchema {
    let query = Query {
        db: Arc::clone(&db),
    };
    let mutation = Mutation { db };
    Schema::new(query, mutation, EmptySubscription)
}

/// Completes on ctrl-c, letting in-flight requests finish before the server stops.
async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        // Without the signal handler the server can only be killed, so keep serving.
        warn!(error = %err, "unable to listen for ctrl-c");
        pending::<()>().await;
    }
    info!("shutting down");
}

/// # Errors
///
/// Returns an error if the configuration is incomplete, the database can't be reached, or the
/// server couldn't bind to the configured address.
#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // Read first, `RUST_LOG` may come from the `.env` file.
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // --- Setup database ---
    let database = Db::connect(&config).await?;
    let app = build_app(build_schema(Arc::new(database)));

    // --- Start server ---
    let listener = TcpListener::bind(config.listen_addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: config.listen_addr,
            source,
        })?;
    info!("Server's on http://{}", config.listen_addr);
    serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)
}
