use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    PickedUp,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::PickedUp => "picked_up",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = TransitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "preparing" => Ok(OrderStatus::Preparing),
            "ready" => Ok(OrderStatus::Ready),
            "picked_up" => Ok(OrderStatus::PickedUp),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(TransitionError::Unknown(other.to_string())),
        }
    }
}

/// Direct delivery to a customer address, or an order placed through a hotel QR code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    Delivery,
    Hotel,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Delivery => "delivery",
            OrderType::Hotel => "hotel",
        }
    }
}

impl FromStr for OrderType {
    type Err = TransitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "delivery" => Ok(OrderType::Delivery),
            "hotel" => Ok(OrderType::Hotel),
            other => Err(TransitionError::Unknown(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Online,
    CashOnDelivery,
    PayAtHotel,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Online => "online",
            PaymentMethod::CashOnDelivery => "cash_on_delivery",
            PaymentMethod::PayAtHotel => "pay_at_hotel",
        }
    }

    /// Cash changes hands at the door, so the order is settled when it is delivered.
    pub fn collected_on_delivery(&self) -> bool {
        matches!(self, PaymentMethod::CashOnDelivery | PaymentMethod::PayAtHotel)
    }
}

impl FromStr for PaymentMethod {
    type Err = TransitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(PaymentMethod::Online),
            "cash_on_delivery" => Ok(PaymentMethod::CashOnDelivery),
            "pay_at_hotel" => Ok(PaymentMethod::PayAtHotel),
            other => Err(TransitionError::Unknown(other.to_string())),
        }
    }
}

/// Who is asking for a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Customer,
    Restaurant,
    Delivery,
    HotelStaff,
    Admin,
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Actor::Customer => "customer",
            Actor::Restaurant => "restaurant",
            Actor::Delivery => "delivery partner",
            Actor::HotelStaff => "hotel staff",
            Actor::Admin => "admin",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("order is already {0} and can no longer change")]
    Terminal(OrderStatus),

    #[error("cannot move order from {from} to {to}")]
    NotAllowed { from: OrderStatus, to: OrderStatus },

    #[error("{actor} may not move order from {from} to {to}")]
    Forbidden {
        actor: Actor,
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("unknown value `{0}`")]
    Unknown(String),
}

/// Per-status timestamps. A transition only ever stamps the field of the status it enters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrderTracking {
    pub confirmed_at: Option<DateTime<Utc>>,
    pub preparing_at: Option<DateTime<Utc>>,
    pub ready_at: Option<DateTime<Utc>>,
    pub picked_up_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl OrderTracking {
    pub fn stamp(&mut self, status: OrderStatus, at: DateTime<Utc>) {
        let slot = match status {
            OrderStatus::Pending => return,
            OrderStatus::Confirmed => &mut self.confirmed_at,
            OrderStatus::Preparing => &mut self.preparing_at,
            OrderStatus::Ready => &mut self.ready_at,
            OrderStatus::PickedUp => &mut self.picked_up_at,
            OrderStatus::Delivered => &mut self.delivered_at,
            OrderStatus::Cancelled => &mut self.cancelled_at,
        };
        *slot = Some(at);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lifecycle {
    pub status: OrderStatus,
    pub order_type: OrderType,
    pub tracking: OrderTracking,
}

impl Lifecycle {
    pub fn new(status: OrderStatus, order_type: OrderType, tracking: OrderTracking) -> Self {
        Self {
            status,
            order_type,
            tracking,
        }
    }

    pub fn transition(
        &mut self,
        to: OrderStatus,
        actor: Actor,
        at: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        check_transition(self.status, to, actor, self.order_type)?;
        self.status = to;
        self.tracking.stamp(to, at);
        Ok(())
    }
}

pub fn check_transition(
    from: OrderStatus,
    to: OrderStatus,
    actor: Actor,
    order_type: OrderType,
) -> Result<(), TransitionError> {
    if from.is_terminal() {
        return Err(TransitionError::Terminal(from));
    }
    if !edge_exists(from, to) {
        return Err(TransitionError::NotAllowed { from, to });
    }
    if !actor_may(actor, from, to, order_type) {
        return Err(TransitionError::Forbidden { actor, from, to });
    }
    Ok(())
}

fn edge_exists(from: OrderStatus, to: OrderStatus) -> bool {
    use OrderStatus::*;
    matches!(
        (from, to),
        (Pending, Confirmed)
            | (Confirmed, Preparing)
            | (Preparing, Ready)
            | (Ready, PickedUp)
            | (Ready, Delivered)
            | (PickedUp, Delivered)
            | (Pending | Confirmed | Preparing | Ready | PickedUp, Cancelled)
    )
}

fn actor_may(actor: Actor, from: OrderStatus, to: OrderStatus, order_type: OrderType) -> bool {
    use OrderStatus::*;
    match actor {
        Actor::Restaurant => matches!(
            (from, to),
            (Pending, Confirmed)
                | (Confirmed, Preparing)
                | (Preparing, Ready)
                | (Pending | Confirmed, Cancelled)
        ),
        Actor::Delivery => matches!((from, to), (Ready, PickedUp) | (PickedUp, Delivered)),
        Actor::HotelStaff => {
            order_type == OrderType::Hotel && matches!((from, to), (Ready | PickedUp, Delivered))
        }
        Actor::Customer => matches!((from, to), (Pending, Cancelled)),
        Actor::Admin => to == Cancelled,
    }
}
