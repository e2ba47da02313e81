//! Construction of the HTTP application serving the schema.
use crate::BookSchema;
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Router,
    extract::State,
    response::{Html, IntoResponse},
    routing::get,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Path of the GraphQL endpoint. Requests to the root are served the same way.
const ENDPOINT: &str = "/graphql";

/// The handler. It's the function that's run when there's a GraphQL request.
async fn handler(
    State(schema): State<BookSchema>,
    graphql_request: GraphQLRequest,
) -> GraphQLResponse {
    schema.execute(graphql_request.into_inner()).await.into()
}

/// Serves a GraphiQL page for trying out queries in the browser.
async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint(ENDPOINT).finish())
}

/// Builder function for the Router app.
pub(crate) fn build_app(schema: BookSchema) -> Router {
    Router::new()
        .route("/", get(graphiql).post(handler))
        .route(ENDPOINT, get(graphiql).post(handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(schema)
}
