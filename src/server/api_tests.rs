//! Tests driving the router in-process and over a real socket

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower::ServiceExt;

use super::{router, serve_with_shutdown};
use crate::client::ForumClient;
use crate::error::AppError;
use crate::forum::QuestionId;
use crate::page::{SearchPage, SearchStatus};
use crate::search::{FilterState, ResolvedFilter};
use crate::store::test_helpers::scenario_store;

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn ids(json: &Value) -> Vec<i64> {
    json.as_array()
        .unwrap()
        .iter()
        .map(|q| q["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_scenario_filters_over_http() {
    let app = router(scenario_store().await);

    let (status, json) = get(app.clone(), "/api/get-questions?tag=concurrency").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&json), vec![1]);

    let (_, json) = get(app.clone(), "/api/get-questions?isResolved=true").await;
    assert_eq!(ids(&json), vec![2]);

    let (_, json) = get(app.clone(), "/api/get-questions?keyword=paging").await;
    assert_eq!(ids(&json), vec![2]);

    let (_, json) = get(app, "/api/get-questions").await;
    assert_eq!(ids(&json), vec![2, 1]);
}

#[tokio::test]
async fn test_response_shape() {
    let app = router(scenario_store().await);
    let (_, json) = get(app, "/api/get-questions?tag=memory").await;

    let question = &json[0];
    assert_eq!(question["title"], "Paging");
    assert_eq!(question["isResolved"], true);
    assert!(question["createdAt"].as_str().unwrap().starts_with("2024-06-01T10:05:00"));
    assert_eq!(question["tags"][0]["name"], "memory");
    assert!(question["tags"][0]["id"].is_i64());
}

#[tokio::test]
async fn test_comma_list_and_repeated_tags() {
    let app = router(scenario_store().await);

    let (_, json) = get(app.clone(), "/api/get-questions?tag=memory,concurrency").await;
    assert_eq!(ids(&json), vec![2, 1]);

    let (_, json) = get(app, "/api/get-questions?tag=memory&tag=concurrency").await;
    assert_eq!(ids(&json), vec![2, 1]);
}

#[tokio::test]
async fn test_unrecognized_resolved_value_is_unset() {
    let app = router(scenario_store().await);
    let (status, json) = get(app, "/api/get-questions?isResolved=maybe").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&json), vec![2, 1]);
}

#[tokio::test]
async fn test_encoded_keyword() {
    let app = router(scenario_store().await);
    let (_, json) = get(app, "/api/get-questions?keyword=%20Page%20Tables%20").await;
    assert_eq!(ids(&json), vec![2]);
}

#[tokio::test]
async fn test_store_failure_returns_500_error_body() {
    let store = scenario_store().await;
    let app = router(store.clone());
    store.close().await;

    let (status, json) = get(app, "/api/get-questions?tag=memory").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, serde_json::json!({ "error": "Failed to fetch questions" }));
}

#[tokio::test]
async fn test_question_detail_and_not_found() {
    let app = router(scenario_store().await);

    let (status, json) = get(app.clone(), "/api/questions/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "Deadlock");

    let (status, json) = get(app.clone(), "/api/questions/404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Question 404 does not exist");

    let (status, _) = get(app, "/api/questions/abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_tags_endpoint_sorted() {
    let app = router(scenario_store().await);
    let (status, json) = get(app, "/api/tags").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["concurrency", "memory"]);
}

#[tokio::test]
async fn test_client_and_page_against_running_server() {
    let store = scenario_store().await;
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(serve_with_shutdown(listener, store, async move {
        let _ = stop_rx.await;
    }));

    let client = ForumClient::new(&format!("http://{}", address), Duration::from_secs(5)).unwrap();

    let filter = FilterState::new().with_resolved(ResolvedFilter::Unresolved);
    let found = client.fetch_questions(&filter).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Deadlock");

    let err = client.fetch_question(QuestionId(77)).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let mut page = SearchPage::from_query("tag=memory");
    page.mount(&client, Duration::from_secs(5)).await.unwrap();
    assert_eq!(page.status(), &SearchStatus::Loaded);
    assert_eq!(page.questions()[0].title, "Paging");
    assert_eq!(page.tag_catalog().map(|t| t.len()), Some(2));

    stop_tx.send(()).unwrap();
    server.await.unwrap().unwrap();

    // Server gone: the page lands in Error and keeps no stale results
    page.search(&client, Duration::from_secs(5)).await.unwrap();
    assert!(matches!(page.status(), SearchStatus::Error(_)));
    assert!(page.questions().is_empty());
}
