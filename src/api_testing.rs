use crate::{app_builder::build_app, build_schema, memory_db::MemoryDb};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{
        Method, Request, StatusCode,
        header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE, ORIGIN},
    },
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt as _; // trait for calling the app

/// Builds the app over an empty in-memory store.
fn init_test_app() -> Router {
    build_app(build_schema(Arc::new(MemoryDb::default())))
}

/// Posts a GraphQL request to `uri` and returns the status and the JSON body.
/// # Panics
/// Panics if the request couldn't be built or sent, or the body isn't JSON.
async fn post_graphql(app: &Router, uri: &str, query: &str) -> (StatusCode, Value) {
    let body = serde_json::to_vec(&json!({ "query": query })).expect("Failed to encode request");
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .expect("Failed to build request"),
        )
        .await
        .expect("Failed to execute request");

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    (
        status,
        serde_json::from_slice(&bytes).expect("Failed to deserialize body"),
    )
}

/// # Panics
/// Panics if any step of the scenario doesn't give the expected response.
#[tokio::test]
async fn dune_test() {
    let app = init_test_app();

    let (status, added) = post_graphql(
        &app,
        "/graphql",
        r#"mutation { addBook(title: "Dune", author: "Herbert") { id title author } }"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(added["data"]["addBook"]["title"], "Dune");
    assert_eq!(added["data"]["addBook"]["author"], "Herbert");
    let id = added["data"]["addBook"]["id"]
        .as_str()
        .expect("addBook should return an id")
        .to_owned();

    let (_, listed) = post_graphql(&app, "/", "{ books { id title author } }").await;
    assert_eq!(
        listed["data"]["books"],
        json!([{ "id": id, "title": "Dune", "author": "Herbert" }])
    );

    let (_, updated) = post_graphql(
        &app,
        "/graphql",
        &format!(
            r#"mutation {{ updateBook(id: "{id}", input: {{ author: "F. Herbert" }}) {{ id title author }} }}"#
        ),
    )
    .await;
    assert_eq!(
        updated["data"]["updateBook"],
        json!({ "id": id, "title": "Dune", "author": "F. Herbert" })
    );

    let (_, deleted) = post_graphql(
        &app,
        "/graphql",
        &format!(r#"mutation {{ deleteBook(id: "{id}") {{ message }} }}"#),
    )
    .await;
    assert_eq!(
        deleted["data"]["deleteBook"]["message"],
        format!("Book with id: {id} has been deleted")
    );

    let (_, listed_after) = post_graphql(&app, "/graphql", "{ books { id } }").await;
    assert_eq!(listed_after["data"]["books"], json!([]));
}

/// # Panics
/// Panics if a malformed id doesn't produce a `BAD_USER_INPUT` error.
#[tokio::test]
async fn malformed_id_test() {
    let app = init_test_app();

    let (status, response) = post_graphql(
        &app,
        "/graphql",
        r#"mutation { deleteBook(id: "123") { message } }"#,
    )
    .await;

    // GraphQL errors still come back as a 200.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        response["errors"][0]["extensions"]["code"],
        "BAD_USER_INPUT"
    );
    assert_eq!(response["errors"][0]["path"], json!(["deleteBook"]));
}

/// # Panics
/// Panics if the GraphiQL page isn't served as HTML.
#[tokio::test]
async fn graphiql_test() {
    let response = init_test_app()
        .oneshot(
            Request::builder()
                .uri("/graphql")
                .body(Body::empty())
                .expect("Failed to build request"),
        )
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .expect("Response should have a content type");
    assert!(content_type.starts_with("text/html"));

    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let page = String::from_utf8_lossy(&body);
    assert!(page.contains("/graphql"));
}

/// # Panics
/// Panics if cross-origin requests aren't allowed.
#[tokio::test]
async fn cors_test() {
    let response = init_test_app()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/graphql")
                .header(ORIGIN, "https://studio.apollographql.com")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"query":"{ books { id } }"}"#))
                .expect("Failed to build request"),
        )
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok()),
        Some("*")
    );
}
