use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::MenuItem;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub menu_item_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartList {
    pub items: Vec<CartItemDto>,
    pub total_amount: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartItemDto {
    pub id: Uuid,
    pub menu_item: MenuItem,
    pub quantity: i32,
}
