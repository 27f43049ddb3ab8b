//! Per-hotel settlement accounting for pay-at-hotel orders.
//!
//! A hotel collects the full order total in cash and owes the platform its
//! admin commission. Payments recorded by an admin reduce the balance.

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettlementError {
    #[error("settlement amount must be positive")]
    NonPositive,

    #[error("settlement amount {amount} exceeds remaining balance {remaining}")]
    Overpayment { amount: i64, remaining: i64 },
}

/// Balances for one hotel. Only delivered pay-at-hotel orders feed the totals;
/// the aggregation query applies that filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettlementLedger {
    cash_collected: i64,
    commission_due: i64,
    paid: i64,
    order_count: i64,
}

impl SettlementLedger {
    pub fn from_totals(cash_collected: i64, commission_due: i64, paid: i64, order_count: i64) -> Self {
        Self {
            cash_collected,
            commission_due,
            paid,
            order_count,
        }
    }

    pub fn remaining(&self) -> i64 {
        self.commission_due - self.paid
    }

    pub fn check_payment(&self, amount: i64) -> Result<(), SettlementError> {
        if amount <= 0 {
            return Err(SettlementError::NonPositive);
        }
        let remaining = self.remaining();
        if amount > remaining {
            return Err(SettlementError::Overpayment { amount, remaining });
        }
        Ok(())
    }

    pub fn summary(&self) -> SettlementSummary {
        SettlementSummary {
            total_cash_collected: self.cash_collected,
            admin_commission_due: self.commission_due,
            settlement_paid: self.paid,
            remaining_settlement: self.remaining(),
            order_count: self.order_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettlementSummary {
    pub total_cash_collected: i64,
    pub admin_commission_due: i64,
    pub settlement_paid: i64,
    pub remaining_settlement: i64,
    pub order_count: i64,
}
