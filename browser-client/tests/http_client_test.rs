//! `HttpProxyClient` against a local server answering with canned envelopes.

use axum::{http::StatusCode, routing::post, Json, Router};
use browser_client::{HttpProxyClient, ProxyApi};
use common::config::ClientConfig;
use common::errors::AppError;
use common::models::{ConnectionParameters, TableDescriptor};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Serves `router` on an ephemeral port and returns a client pointed at it.
async fn client_for(router: Router) -> HttpProxyClient {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    HttpProxyClient::new(ClientConfig::resolve(Some(format!("http://{}", addr))))
}

fn params() -> ConnectionParameters {
    ConnectionParameters::new("db.local", "alice", "secret", "shop")
}

#[tokio::test]
async fn test_test_connection_success() {
    let client = client_for(Router::new().route(
        "/api/test-connection",
        post(|| async { Json(json!({ "success": true })) }),
    ))
    .await;

    client.test_connection(&params()).await.unwrap();
}

#[tokio::test]
async fn test_list_tables_decodes_flat_envelope() {
    let client = client_for(Router::new().route(
        "/api/list-tables",
        post(|| async {
            Json(json!({
                "success": true,
                "tables": [
                    { "table_schema": "public", "table_name": "customers" },
                    { "table_schema": "sales", "table_name": "orders" }
                ]
            }))
        }),
    ))
    .await;

    let tables = client.list_tables(&params()).await.unwrap();
    assert_eq!(
        tables,
        vec![
            TableDescriptor::new("public", "customers"),
            TableDescriptor::new("sales", "orders"),
        ]
    );
}

#[tokio::test]
async fn test_execute_query_sends_flat_request_and_decodes_rows() {
    // Echoes what the client sent so the request shape is checked too.
    let client = client_for(Router::new().route(
        "/api/query",
        post(|Json(body): Json<Value>| async move {
            Json(json!({
                "success": true,
                "columns": ["query", "host", "database"],
                "rows": [{
                    "query": body["query"],
                    "host": body["host"],
                    "database": body["database"]
                }]
            }))
        }),
    ))
    .await;

    let result = client.execute_query(&params(), "SELECT 1 AS x").await.unwrap();

    assert_eq!(result.columns, vec!["query", "host", "database"]);
    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.rows[0]["query"], json!("SELECT 1 AS x"));
    assert_eq!(result.rows[0]["host"], json!("db.local"));
    assert_eq!(result.rows[0]["database"], json!("shop"));
}

#[tokio::test]
async fn test_failure_message_is_passed_through_verbatim() {
    let client = client_for(Router::new().route(
        "/api/test-connection",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "error": "password authentication failed for user \"alice\""
                })),
            )
        }),
    ))
    .await;

    let err = client.test_connection(&params()).await.unwrap_err();
    assert!(matches!(err, AppError::ExternalService(_)));
    assert_eq!(
        err.to_string(),
        "password authentication failed for user \"alice\""
    );
}

#[tokio::test]
async fn test_failure_without_message_uses_fallback() {
    let client = client_for(Router::new().route(
        "/api/query",
        post(|| async { (StatusCode::BAD_REQUEST, Json(json!({ "success": false }))) }),
    ))
    .await;

    let err = client.execute_query(&params(), "SELECT 1").await.unwrap_err();
    assert_eq!(err.to_string(), "Query failed");
}

#[tokio::test]
async fn test_mismatched_success_payload_is_external_error() {
    let client = client_for(Router::new().route(
        "/api/list-tables",
        post(|| async { Json(json!({ "success": true, "tables": "not a list" })) }),
    ))
    .await;

    let err = client.list_tables(&params()).await.unwrap_err();
    assert!(matches!(err, AppError::ExternalService(_)));
    assert_eq!(err.to_string(), "Failed to fetch tables");
}

#[tokio::test]
async fn test_non_json_response_is_external_error() {
    // No routes: every call gets an empty 404.
    let client = client_for(Router::new()).await;

    let err = client.list_tables(&params()).await.unwrap_err();
    assert!(matches!(err, AppError::ExternalService(_)));
    assert!(err.to_string().contains("404"), "got: {}", err);
}
