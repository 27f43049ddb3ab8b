use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::orders::{LocationUpdateRequest, OrderList, OrderWithItems},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::fulfilment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders/available", get(available_orders))
        .route("/orders/{id}/accept", post(accept_order))
        .route("/orders/{id}/deliver", post(deliver_order))
        .route("/orders/{id}/location", patch(update_location))
}

#[utoipa::path(
    get,
    path = "/api/delivery/orders/available",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "Ready orders without a courier", body = ApiResponse<OrderList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Delivery"
)]
pub async fn available_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = fulfilment_service::available_for_delivery(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/delivery/orders/{id}/accept",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order picked up", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Already taken or not ready")
    ),
    security(("bearer_auth" = [])),
    tag = "Delivery"
)]
pub async fn accept_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = fulfilment_service::accept_delivery(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/delivery/orders/{id}/deliver",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order delivered", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Invalid transition")
    ),
    security(("bearer_auth" = [])),
    tag = "Delivery"
)]
pub async fn deliver_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = fulfilment_service::complete_delivery(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/delivery/orders/{id}/location",
    request_body = LocationUpdateRequest,
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Courier position stored", body = ApiResponse<serde_json::Value>),
        (status = 400, description = "Coordinates out of range"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Delivery"
)]
pub async fn update_location(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<LocationUpdateRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = fulfilment_service::update_location(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
