use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Hotel, MenuItem, Restaurant};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateHotelRequest {
    pub owner_id: Uuid,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRestaurantRequest {
    pub owner_id: Uuid,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMenuItemRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateMenuItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantList {
    pub items: Vec<Restaurant>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RestaurantMenu {
    pub restaurant: Restaurant,
    pub items: Vec<MenuItem>,
}

/// What a guest sees after scanning a hotel QR code.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HotelMenu {
    pub hotel: Hotel,
    pub restaurants: Vec<Restaurant>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HotelQr {
    pub hotel_id: Uuid,
    pub url: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct HotelMenuQuery {
    #[serde(rename = "ref")]
    pub reference: String,
}
