use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    domain::{
        geo::Coordinates,
        order_status::{OrderStatus, OrderTracking, PaymentMethod},
    },
    models::{Order, OrderItem},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub payment_method: Option<PaymentMethod>,
    /// Hotel id from a scanned QR code.
    pub hotel_ref: Option<String>,
    pub room_number: Option<String>,
    pub delivery_latitude: Option<f64>,
    pub delivery_longitude: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PayOrderRequest {
    pub invoice_number: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LocationUpdateRequest {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderTrackingView {
    pub order_id: Uuid,
    pub status: OrderStatus,
    pub tracking: OrderTracking,
    pub destination: Coordinates,
    pub courier: Option<Coordinates>,
    pub distance_km: Option<f64>,
    pub bearing_degrees: Option<f64>,
    pub eta_minutes: Option<u32>,
}
