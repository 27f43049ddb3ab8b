use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod delivery;
pub mod doc;
pub mod health;
pub mod hotel;
pub mod orders;
pub mod params;
pub mod restaurant;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/restaurants", catalog::restaurants_router())
        .nest("/hotel-menu", catalog::hotel_menu_router())
        .nest("/cart", cart::router())
        .nest("/orders", orders::router())
        .nest("/restaurant", restaurant::router())
        .nest("/delivery", delivery::router())
        .nest("/hotel", hotel::router())
        .nest("/admin", admin::router())
}
