use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::catalog::{HotelMenu, HotelMenuQuery, RestaurantList, RestaurantMenu},
    error::AppResult,
    response::ApiResponse,
    routes::params::Pagination,
    services::catalog_service,
    state::AppState,
};

pub fn restaurants_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_restaurants))
        .route("/{id}/menu", get(restaurant_menu))
}

pub fn hotel_menu_router() -> Router<AppState> {
    Router::new().route("/", get(hotel_menu))
}

#[utoipa::path(
    get,
    path = "/api/restaurants",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "Open restaurants", body = ApiResponse<RestaurantList>)
    ),
    tag = "Catalog"
)]
pub async fn list_restaurants(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<RestaurantList>>> {
    let resp = catalog_service::list_restaurants(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/restaurants/{id}/menu",
    params(
        ("id" = Uuid, Path, description = "Restaurant ID")
    ),
    responses(
        (status = 200, description = "Available menu items", body = ApiResponse<RestaurantMenu>),
        (status = 404, description = "Not Found")
    ),
    tag = "Catalog"
)]
pub async fn restaurant_menu(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<RestaurantMenu>>> {
    let resp = catalog_service::restaurant_menu(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/hotel-menu",
    params(
        ("ref" = String, Query, description = "Hotel reference from the QR code")
    ),
    responses(
        (status = 200, description = "Hotel landing menu", body = ApiResponse<HotelMenu>),
        (status = 400, description = "Malformed reference"),
        (status = 404, description = "Unknown hotel")
    ),
    tag = "Catalog"
)]
pub async fn hotel_menu(
    State(state): State<AppState>,
    Query(query): Query<HotelMenuQuery>,
) -> AppResult<Json<ApiResponse<HotelMenu>>> {
    let resp = catalog_service::hotel_menu(&state, &query.reference).await?;
    Ok(Json(resp))
}
