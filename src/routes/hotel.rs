use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        catalog::HotelQr,
        orders::{OrderList, OrderWithItems},
        settlement::HotelSettlement,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::{catalog_service, fulfilment_service, settlement_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(hotel_orders))
        .route("/orders/{id}/deliver", post(mark_delivered))
        .route("/settlement", get(settlement))
        .route("/qr", get(qr))
}

#[utoipa::path(
    get,
    path = "/api/hotel/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status")
    ),
    responses(
        (status = 200, description = "Orders placed through this hotel", body = ApiResponse<OrderList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Hotel"
)]
pub async fn hotel_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = fulfilment_service::hotel_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/hotel/orders/{id}/deliver",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Handed to the guest", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Order not ready")
    ),
    security(("bearer_auth" = [])),
    tag = "Hotel"
)]
pub async fn mark_delivered(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = fulfilment_service::hotel_mark_delivered(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/hotel/settlement",
    responses(
        (status = 200, description = "Cash collected and commission owed", body = ApiResponse<HotelSettlement>)
    ),
    security(("bearer_auth" = [])),
    tag = "Hotel"
)]
pub async fn settlement(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<HotelSettlement>>> {
    let resp = settlement_service::own_settlement(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/hotel/qr",
    responses(
        (status = 200, description = "Menu URL to encode in the room QR code", body = ApiResponse<HotelQr>)
    ),
    security(("bearer_auth" = [])),
    tag = "Hotel"
)]
pub async fn qr(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<HotelQr>>> {
    let resp = catalog_service::own_hotel_qr(&state, &user).await?;
    Ok(Json(resp))
}
