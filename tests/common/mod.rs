//! Shared helpers for integration tests: boot the relay and stub upstreams
//! on ephemeral local ports.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use courier::config::AppConfig;
use courier::routes::{self, AppState};
use serde_json::Value;
use tokio::net::TcpListener;

/// Serve any router on an ephemeral local port, returning its address.
#[allow(dead_code)]
pub async fn spawn_router(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub listener address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve stub");
    });
    addr
}

/// Boot the relay itself with every upstream pointed at the given bases.
pub async fn spawn_app(config: AppConfig) -> SocketAddr {
    let app = routes::app(AppState::new(config));
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind app listener");
    let addr = listener.local_addr().expect("app listener address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve app");
    });
    addr
}

/// A config whose upstream bases all point at local stubs.
pub fn test_config(news: &str, gmail: &str, openai: &str, token_url: &str) -> AppConfig {
    AppConfig {
        port: 0,
        public_url: "http://localhost:8080".to_string(),
        hacker_news_url: news.to_string(),
        gmail_url: gmail.to_string(),
        openai_url: openai.to_string(),
        oauth_token_url: token_url.to_string(),
        oauth_client_id: "test-client-id".to_string(),
        oauth_client_secret: "test-client-secret".to_string(),
        openai_api_key: "test-openai-key".to_string(),
        openai_model: "gpt-4o-mini".to_string(),
    }
}

/// A webhook stub that records every body it receives. Calls with index
/// `>= fail_from` answer 500 "boom" after recording the attempt.
#[allow(dead_code)]
pub fn webhook_stub(received: Arc<Mutex<Vec<Value>>>, fail_from: usize) -> Router {
    let calls = Arc::new(AtomicUsize::new(0));
    Router::new().route(
        "/hooks/test",
        post(move |Json(body): Json<Value>| {
            let received = received.clone();
            let calls = calls.clone();
            async move {
                let call = calls.fetch_add(1, Ordering::SeqCst);
                received.lock().unwrap().push(body);
                if call >= fail_from {
                    (StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string())
                } else {
                    (StatusCode::NO_CONTENT, String::new())
                }
            }
        }),
    )
}

/// An address nothing is listening on, for transport-failure tests.
#[allow(dead_code)]
pub async fn unreachable_base() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind throwaway listener");
    let addr = listener.local_addr().expect("throwaway address");
    drop(listener);
    format!("http://{}", addr)
}
