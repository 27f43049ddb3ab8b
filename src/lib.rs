use axum::{
    Json, Router,
    http::{StatusCode, Uri},
    middleware::from_fn_with_state,
    routing::get,
};

use crate::{
    middleware::rate_limit::rate_limit,
    response::{ApiResponse, Meta},
    routes::{create_api_router, doc::scalar_docs, health},
    state::AppState,
};

pub mod audit;
pub mod config;
pub mod db;
pub mod domain;
pub mod dto;
pub mod entity;
pub mod error;
pub mod kv;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;

/// Application routes with the `/api` tree behind the rate limiter.
/// Transport layers (tracing, request ids, body limits) are added by the binary.
pub fn app(state: AppState) -> Router {
    let api_router = create_api_router().layer(from_fn_with_state(
        state.limiter.clone(),
        rate_limit,
    ));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_router)
        .merge(scalar_docs())
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    let body = ApiResponse::success(
        "Not Found",
        serde_json::json!({ "path": uri.path() }),
        Some(Meta::empty()),
    );
    (StatusCode::NOT_FOUND, Json(body))
}
