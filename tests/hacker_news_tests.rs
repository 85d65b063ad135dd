use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

mod common;

const UNUSED: &str = "http://127.0.0.1:9";

/// Stub serving `total` ranked stories. Item fetches are counted; the item
/// with `fail_id` answers a bare 500, the way the real API fails.
fn news_stub(total: u64, fail_id: Option<u64>, item_hits: Arc<AtomicUsize>) -> Router {
    Router::new()
        .route(
            "/topstories.json",
            get(move || async move { Json((1..=total).collect::<Vec<u64>>()) }),
        )
        .route(
            "/item/{file}",
            get(move |Path(file): Path<String>| {
                let item_hits = item_hits.clone();
                async move {
                    item_hits.fetch_add(1, Ordering::SeqCst);
                    let id: u64 = file.trim_end_matches(".json").parse().unwrap();
                    if Some(id) == fail_id {
                        return (StatusCode::INTERNAL_SERVER_ERROR, "item failed".to_string())
                            .into_response();
                    }
                    Json(json!({
                        "id": id,
                        "title": format!("Story {id}"),
                        "url": format!("https://news.example/{id}"),
                        "score": 100 + id,
                        "by": format!("user{id}"),
                        "descendants": 3,
                        "type": "story",
                    }))
                    .into_response()
                }
            }),
        )
}

async fn spawn_news_app(total: u64, fail_id: Option<u64>) -> (SocketAddr, Arc<AtomicUsize>) {
    let item_hits = Arc::new(AtomicUsize::new(0));
    let news_addr = common::spawn_router(news_stub(total, fail_id, item_hits.clone())).await;
    let config = common::test_config(&format!("http://{news_addr}"), UNUSED, UNUSED, UNUSED);
    (common::spawn_app(config).await, item_hits)
}

fn expected_story(id: u64) -> Value {
    json!({
        "title": format!("Story {id}"),
        "url": format!("https://news.example/{id}"),
        "score": 100 + id,
        "by": format!("user{id}"),
    })
}

#[tokio::test]
async fn test_feed_returns_top_five_by_default() {
    let (addr, item_hits) = spawn_news_app(30, None).await;

    let response = reqwest::get(format!("http://{addr}/api/hacker-news"))
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let stories: Vec<Value> = response.json().await.unwrap();
    assert_eq!(stories.len(), 5);
    // Rank order, and only the projected fields
    assert_eq!(stories[0], expected_story(1));
    assert_eq!(stories[4], expected_story(5));
    assert_eq!(item_hits.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_feed_accepts_quantity_ten() {
    let (addr, _) = spawn_news_app(30, None).await;

    let response = reqwest::get(format!("http://{addr}/api/hacker-news?q=10"))
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let stories: Vec<Value> = response.json().await.unwrap();
    assert_eq!(stories.len(), 10);
}

#[tokio::test]
async fn test_feed_caps_at_available_stories() {
    let (addr, _) = spawn_news_app(3, None).await;

    let response = reqwest::get(format!("http://{addr}/api/hacker-news?q=5"))
        .await
        .unwrap();
    let stories: Vec<Value> = response.json().await.unwrap();
    assert_eq!(stories.len(), 3);
}

#[tokio::test]
async fn test_feed_rejects_quantity_outside_set() {
    let (addr, item_hits) = spawn_news_app(30, None).await;

    let response = reqwest::get(format!("http://{addr}/api/hacker-news?q=7"))
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "error": [{ "field": "q", "message": "Quantity must be 5, 10, 15, or 20" }] })
    );
    assert_eq!(item_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_feed_rejects_present_but_empty_quantity() {
    // `?q=` is a supplied value, not an omitted one.
    let (addr, item_hits) = spawn_news_app(30, None).await;

    let response = reqwest::get(format!("http://{addr}/api/hacker-news?q="))
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "error": [{ "field": "q", "message": "Quantity must be 5, 10, 15, or 20" }] })
    );
    assert_eq!(item_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_feed_collapses_item_failure_to_empty() {
    let (addr, _) = spawn_news_app(30, Some(3)).await;

    let response = reqwest::get(format!("http://{addr}/api/hacker-news"))
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let stories: Vec<Value> = response.json().await.unwrap();
    assert!(stories.is_empty());
}

#[tokio::test]
async fn test_feed_collapses_ranking_failure_to_empty() {
    let broken = Router::new().route(
        "/topstories.json",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "down".to_string()) }),
    );
    let news_addr = common::spawn_router(broken).await;
    let config = common::test_config(&format!("http://{news_addr}"), UNUSED, UNUSED, UNUSED);
    let addr = common::spawn_app(config).await;

    let response = reqwest::get(format!("http://{addr}/api/hacker-news"))
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let stories: Vec<Value> = response.json().await.unwrap();
    assert!(stories.is_empty());
}

#[tokio::test]
async fn test_digest_sends_one_combined_message() {
    let (addr, item_hits) = spawn_news_app(30, None).await;
    let received = Arc::new(Mutex::new(Vec::new()));
    let webhook_addr =
        common::spawn_router(common::webhook_stub(received.clone(), usize::MAX)).await;

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/api/hacker-news/send-to-discord"))
        .json(&json!({
            "q": "15",
            "webhookUrl": format!("http://{webhook_addr}/hooks/test"),
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "status": "Hacker News stories sent to Discord successfully" })
    );
    assert_eq!(item_hits.load(Ordering::SeqCst), 15);

    let expected = (1..=15)
        .map(|id| format!("{id}. **Story {id}**\n<https://news.example/{id}>"))
        .collect::<Vec<_>>()
        .join("\n\n");
    let received = received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0], json!({ "content": expected }));
}

#[tokio::test]
async fn test_digest_rejects_quantity_ten() {
    // The digest's allowed set is narrower than the feed's.
    let (addr, _) = spawn_news_app(30, None).await;

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/api/hacker-news/send-to-discord"))
        .json(&json!({ "q": "10", "webhookUrl": "https://example.com/hook" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "error": [{ "field": "q", "message": "Quantity must be 5, 15, or 20" }] })
    );
}

#[tokio::test]
async fn test_digest_rejects_numeric_quantity() {
    // `q` travels as a string, even in a JSON body.
    let (addr, _) = spawn_news_app(30, None).await;

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/api/hacker-news/send-to-discord"))
        .json(&json!({ "q": 15, "webhookUrl": "https://example.com/hook" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_digest_without_stories_is_an_error() {
    let broken = Router::new().route(
        "/topstories.json",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "down".to_string()) }),
    );
    let news_addr = common::spawn_router(broken).await;
    let config = common::test_config(&format!("http://{news_addr}"), UNUSED, UNUSED, UNUSED);
    let addr = common::spawn_app(config).await;

    let received = Arc::new(Mutex::new(Vec::new()));
    let webhook_addr =
        common::spawn_router(common::webhook_stub(received.clone(), usize::MAX)).await;

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/api/hacker-news/send-to-discord"))
        .json(&json!({ "webhookUrl": format!("http://{webhook_addr}/hooks/test") }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.text().await.unwrap(),
        "No Hacker News data available to send"
    );
    assert!(received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_digest_relay_failure_is_embedded() {
    let (addr, _) = spawn_news_app(30, None).await;
    let received = Arc::new(Mutex::new(Vec::new()));
    let webhook_addr = common::spawn_router(common::webhook_stub(received, 0)).await;

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/api/hacker-news/send-to-discord"))
        .json(&json!({
            "q": "5",
            "webhookUrl": format!("http://{webhook_addr}/hooks/test"),
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        r#"Failed to send to Discord: {"error":"Failed to send message: boom"}"#
    );
}
