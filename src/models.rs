use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::order_status::{OrderStatus, OrderTracking, OrderType, PaymentMethod};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Hotel {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Restaurant {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub is_open: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MenuItem {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    pub id: Uuid,
    pub menu_item_id: Uuid,
    pub user_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

/// Amounts are minor currency units.
///
/// Fields serialize in snake_case like the other models, except `hotelCommission`
/// and `commissionDistributed`, whose names are fixed by the frontend contract.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub restaurant_id: Uuid,
    pub hotel_id: Option<Uuid>,
    pub delivery_partner_id: Option<Uuid>,
    pub order_type: OrderType,
    pub payment_method: PaymentMethod,
    pub payment_status: String,
    pub status: OrderStatus,
    pub invoice_number: String,
    pub room_number: Option<String>,
    pub total_amount: i64,
    #[serde(rename = "hotelCommission")]
    pub hotel_commission: i64,
    pub admin_commission: i64,
    pub restaurant_amount: i64,
    #[serde(rename = "commissionDistributed")]
    pub commission_distributed: bool,
    pub tracking: OrderTracking,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub menu_item_id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub price: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct SettlementPayment {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub amount: i64,
    pub note: Option<String>,
    pub recorded_by: Uuid,
    pub created_at: DateTime<Utc>,
}
