use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        auth::UpdateRoleRequest,
        catalog::{CreateHotelRequest, CreateRestaurantRequest, HotelQr},
        orders::{OrderList, OrderWithItems},
        settlement::{HotelSettlement, RecordSettlementRequest},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Hotel, Restaurant, SettlementPayment, User},
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::{admin_service, catalog_service, settlement_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_all_orders))
        .route("/orders/{id}", get(get_order_admin))
        .route("/orders/{id}/cancel", post(cancel_order_admin))
        .route("/users/{id}/role", patch(update_user_role))
        .route("/hotels", post(create_hotel))
        .route("/restaurants", post(create_restaurant))
        .route("/hotels/{id}/settlement", get(hotel_settlement))
        .route("/hotels/{id}/settlements", post(record_settlement))
        .route("/hotels/{id}/qr", get(hotel_qr))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "All orders", body = ApiResponse<OrderList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_all_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = admin_service::list_all_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order detail", body = ApiResponse<OrderWithItems>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_order_admin(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = admin_service::get_order_admin(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/orders/{id}/cancel",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order cancelled", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Order already finished")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn cancel_order_admin(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = admin_service::cancel_order_admin(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/users/{id}/role",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = ApiResponse<User>),
        (status = 400, description = "Bad request"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_user_role(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRoleRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = admin_service::update_user_role(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/hotels",
    request_body = CreateHotelRequest,
    responses(
        (status = 201, description = "Hotel created", body = ApiResponse<Hotel>),
        (status = 400, description = "Bad request"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_hotel(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateHotelRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Hotel>>)> {
    let resp = catalog_service::create_hotel(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/admin/restaurants",
    request_body = CreateRestaurantRequest,
    responses(
        (status = 201, description = "Restaurant created", body = ApiResponse<Restaurant>),
        (status = 400, description = "Bad request"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_restaurant(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateRestaurantRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Restaurant>>)> {
    let resp = catalog_service::create_restaurant(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/admin/hotels/{id}/settlement",
    params(
        ("id" = Uuid, Path, description = "Hotel ID")
    ),
    responses(
        (status = 200, description = "Hotel settlement summary", body = ApiResponse<HotelSettlement>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn hotel_settlement(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<HotelSettlement>>> {
    let resp = settlement_service::hotel_settlement(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/hotels/{id}/settlements",
    request_body = RecordSettlementRequest,
    params(
        ("id" = Uuid, Path, description = "Hotel ID")
    ),
    responses(
        (status = 201, description = "Settlement payment recorded", body = ApiResponse<SettlementPayment>),
        (status = 400, description = "Amount not positive or above the remaining settlement"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn record_settlement(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordSettlementRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<SettlementPayment>>)> {
    let resp = settlement_service::record_settlement(&state, &user, id, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/admin/hotels/{id}/qr",
    params(
        ("id" = Uuid, Path, description = "Hotel ID")
    ),
    responses(
        (status = 200, description = "Menu URL for the hotel QR code", body = ApiResponse<HotelQr>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn hotel_qr(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<HotelQr>>> {
    let resp = catalog_service::admin_hotel_qr(&state, &user, id).await?;
    Ok(Json(resp))
}
