//! Restaurant owner endpoints: menu upkeep and the kitchen side of the order lifecycle.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        catalog::{CreateMenuItemRequest, UpdateMenuItemRequest},
        orders::{OrderList, OrderWithItems, UpdateOrderStatusRequest},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::MenuItem,
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::{catalog_service, fulfilment_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/menu", post(create_menu_item))
        .route("/menu/{id}", patch(update_menu_item))
        .route("/orders", get(restaurant_orders))
        .route("/orders/{id}/status", patch(update_order_status))
}

#[utoipa::path(
    post,
    path = "/api/restaurant/menu",
    request_body = CreateMenuItemRequest,
    responses(
        (status = 201, description = "Menu item created", body = ApiResponse<MenuItem>),
        (status = 400, description = "Bad request"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Restaurant"
)]
pub async fn create_menu_item(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateMenuItemRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<MenuItem>>)> {
    let resp = catalog_service::create_menu_item(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    patch,
    path = "/api/restaurant/menu/{id}",
    request_body = UpdateMenuItemRequest,
    params(
        ("id" = Uuid, Path, description = "Menu item ID")
    ),
    responses(
        (status = 200, description = "Menu item updated", body = ApiResponse<MenuItem>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Restaurant"
)]
pub async fn update_menu_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMenuItemRequest>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    let resp = catalog_service::update_menu_item(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/restaurant/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("sort_order" = Option<String>, Query, description = "asc or desc, default desc")
    ),
    responses(
        (status = 200, description = "Orders placed with this restaurant", body = ApiResponse<OrderList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Restaurant"
)]
pub async fn restaurant_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = fulfilment_service::restaurant_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/restaurant/orders/{id}/status",
    request_body = UpdateOrderStatusRequest,
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order status updated", body = ApiResponse<OrderWithItems>),
        (status = 403, description = "Move not allowed for a restaurant"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Invalid transition")
    ),
    security(("bearer_auth" = [])),
    tag = "Restaurant"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = fulfilment_service::restaurant_update_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
