//! Commission split between hotel, platform (admin) and restaurant.
//!
//! Amounts are integer minor units. Two shares are rounded half-up from
//! their percentage, the restaurant share is the exact remainder so the
//! three parts always add back to the order total.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommissionError {
    #[error("commission percentages must sum to 100, got {0}")]
    InvalidTotal(Decimal),

    #[error("commission percentage must not be negative, got {0}")]
    Negative(Decimal),

    #[error("commission amount overflow")]
    Overflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommissionRates {
    hotel: Decimal,
    admin: Decimal,
    restaurant: Decimal,
}

impl CommissionRates {
    pub fn new(hotel: Decimal, admin: Decimal, restaurant: Decimal) -> Result<Self, CommissionError> {
        for pct in [hotel, admin, restaurant] {
            if pct.is_sign_negative() && !pct.is_zero() {
                return Err(CommissionError::Negative(pct));
            }
        }
        let sum = hotel + admin + restaurant;
        if sum != Decimal::ONE_HUNDRED {
            return Err(CommissionError::InvalidTotal(sum));
        }
        Ok(Self {
            hotel,
            admin,
            restaurant,
        })
    }

    pub fn hotel(&self) -> Decimal {
        self.hotel
    }

    pub fn admin(&self) -> Decimal {
        self.admin
    }

    pub fn restaurant(&self) -> Decimal {
        self.restaurant
    }

    /// Rates for an order with no hotel party: the hotel share goes to the restaurant.
    pub fn without_hotel(&self) -> Self {
        Self {
            hotel: Decimal::ZERO,
            admin: self.admin,
            restaurant: self.restaurant + self.hotel,
        }
    }

    pub fn split(&self, total: i64) -> Result<CommissionSplit, CommissionError> {
        let hotel_amount = percentage_of(total, self.hotel)?;
        let admin_amount = percentage_of(total, self.admin)?;
        let restaurant_amount = total
            .checked_sub(hotel_amount)
            .and_then(|rest| rest.checked_sub(admin_amount))
            .ok_or(CommissionError::Overflow)?;

        Ok(CommissionSplit {
            hotel_amount,
            admin_amount,
            restaurant_amount,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct CommissionSplit {
    pub hotel_amount: i64,
    pub admin_amount: i64,
    pub restaurant_amount: i64,
}

impl CommissionSplit {
    pub fn total(&self) -> i64 {
        self.hotel_amount + self.admin_amount + self.restaurant_amount
    }
}

fn percentage_of(total: i64, pct: Decimal) -> Result<i64, CommissionError> {
    Decimal::from(total)
        .checked_mul(pct)
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .map(|v| v.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|v| v.to_i64())
        .ok_or(CommissionError::Overflow)
}
