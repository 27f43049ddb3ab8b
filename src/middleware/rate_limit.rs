use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    error::AppError,
    kv::{RateDecision, RateLimiter},
};

/// Fixed-window request limiter keyed by client address.
pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    let client = client_key(&req);
    match limiter.check(&client).await {
        RateDecision::Allowed { .. } => next.run(req).await,
        RateDecision::Limited { retry_after } => {
            tracing::debug!(client = %client, retry_after, "rate limit exceeded");
            AppError::TooManyRequests { retry_after }.into_response()
        }
    }
}

fn client_key(req: &Request) -> String {
    let forwarded = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "anonymous".to_string())
}
