use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    middleware::from_fn_with_state,
    routing::get,
};
use hotel_order_api::{
    kv::{KvError, KvStore, MemoryStore, RateDecision, RateLimiter},
    middleware::rate_limit::rate_limit,
};
use tower::ServiceExt;

struct DownStore;

#[async_trait]
impl KvStore for DownStore {
    fn backend(&self) -> &'static str {
        "down"
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, KvError> {
        Err(KvError::Unavailable("down".into()))
    }

    async fn set_ex(&self, _key: &str, _value: &str, _ttl_secs: u64) -> Result<(), KvError> {
        Err(KvError::Unavailable("down".into()))
    }

    async fn del(&self, _key: &str) -> Result<(), KvError> {
        Err(KvError::Unavailable("down".into()))
    }

    async fn incr_window(&self, _key: &str, _window_secs: u64) -> Result<(u64, u64), KvError> {
        Err(KvError::Unavailable("down".into()))
    }
}

fn limited_router(limiter: RateLimiter) -> Router {
    Router::new()
        .route("/ping", get(|| async { "pong" }))
        .layer(from_fn_with_state(limiter, rate_limit))
}

fn ping_from(client: &str) -> Request<Body> {
    Request::builder()
        .uri("/ping")
        .header("x-forwarded-for", client)
        .body(Body::empty())
        .expect("request")
}

#[tokio::test]
async fn allows_up_to_max_then_counts_down() {
    let limiter = RateLimiter::new(Arc::new(MemoryStore::new()), 3, 60);
    assert_eq!(
        limiter.check("10.0.0.1").await,
        RateDecision::Allowed { remaining: 2 }
    );
    assert_eq!(
        limiter.check("10.0.0.1").await,
        RateDecision::Allowed { remaining: 1 }
    );
    assert_eq!(
        limiter.check("10.0.0.1").await,
        RateDecision::Allowed { remaining: 0 }
    );
    match limiter.check("10.0.0.1").await {
        RateDecision::Limited { retry_after } => assert!((1..=60).contains(&retry_after)),
        other => panic!("expected limit, got {other:?}"),
    }
}

#[tokio::test]
async fn request_over_limit_gets_429_with_retry_after() {
    let window = 30;
    let app = limited_router(RateLimiter::new(Arc::new(MemoryStore::new()), 2, window));

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(ping_from("203.0.113.7"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(ping_from("203.0.113.7"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let header_value: u64 = response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .expect("retry-after header");
    assert!((1..=window).contains(&header_value));

    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
    let retry_after = body["data"]["retryAfter"].as_u64().expect("retryAfter");
    assert!(retry_after >= 1 && retry_after <= window);
    assert_eq!(retry_after, header_value);
    assert_eq!(body["data"]["error"], "Rate limit exceeded");
}

#[tokio::test]
async fn clients_are_counted_separately() {
    let app = limited_router(RateLimiter::new(Arc::new(MemoryStore::new()), 1, 60));

    let first = app.clone().oneshot(ping_from("198.51.100.1")).await.expect("response");
    assert_eq!(first.status(), StatusCode::OK);
    let blocked = app.clone().oneshot(ping_from("198.51.100.1")).await.expect("response");
    assert_eq!(blocked.status(), StatusCode::TOO_MANY_REQUESTS);

    let other = app
        .clone()
        .oneshot(ping_from("198.51.100.2, 10.0.0.1"))
        .await
        .expect("response");
    assert_eq!(other.status(), StatusCode::OK);
}

#[tokio::test]
async fn window_resets_after_expiry() {
    let limiter = RateLimiter::new(Arc::new(MemoryStore::new()), 1, 1);
    assert!(matches!(
        limiter.check("client").await,
        RateDecision::Allowed { .. }
    ));
    assert!(matches!(
        limiter.check("client").await,
        RateDecision::Limited { retry_after: 1 }
    ));

    tokio::time::sleep(Duration::from_millis(1_100)).await;
    assert!(matches!(
        limiter.check("client").await,
        RateDecision::Allowed { .. }
    ));
}

#[tokio::test]
async fn fails_open_when_store_is_down() {
    let app = limited_router(RateLimiter::new(Arc::new(DownStore), 1, 60));

    for _ in 0..5 {
        let response = app
            .clone()
            .oneshot(ping_from("192.0.2.10"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
