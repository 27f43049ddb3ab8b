//! Shared order status plumbing for every actor that moves an order forward.

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, sea_query::LockType,
};
use uuid::Uuid;

use crate::{
    domain::{
        commission::CommissionRates,
        order_status::{Actor, OrderStatus, OrderType},
    },
    dto::orders::OrderWithItems,
    entity::{
        order_items::{Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
    },
    error::{AppError, AppResult},
    services::convert::{lifecycle_of, order_from_entity, order_item_from_entity, payment_method_of},
};

/// Validates the move and returns the active model with the new status and the
/// timestamp of that status. Delivery also distributes the commission once and
/// settles cash payments.
pub fn prepare_transition(
    order: OrderModel,
    to: OrderStatus,
    actor: Actor,
    rates: &CommissionRates,
    now: DateTime<Utc>,
) -> AppResult<OrderActive> {
    let mut lifecycle = lifecycle_of(&order)?;
    lifecycle.transition(to, actor, now)?;

    let payment_method = payment_method_of(&order)?;
    let already_paid = order.payment_status == "paid";
    let commission_distributed = order.commission_distributed;
    let total = order.total_amount;
    let has_hotel = lifecycle.order_type == OrderType::Hotel && order.hotel_id.is_some();

    let mut active: OrderActive = order.into();
    active.status = Set(lifecycle.status.as_str().to_string());
    active.updated_at = Set(now.into());

    let stamp = |at: Option<DateTime<Utc>>| -> Option<DateTime<FixedOffset>> {
        at.map(Into::into)
    };
    let tracking = &lifecycle.tracking;
    match to {
        OrderStatus::Pending => {}
        OrderStatus::Confirmed => active.confirmed_at = Set(stamp(tracking.confirmed_at)),
        OrderStatus::Preparing => active.preparing_at = Set(stamp(tracking.preparing_at)),
        OrderStatus::Ready => active.ready_at = Set(stamp(tracking.ready_at)),
        OrderStatus::PickedUp => active.picked_up_at = Set(stamp(tracking.picked_up_at)),
        OrderStatus::Delivered => active.delivered_at = Set(stamp(tracking.delivered_at)),
        OrderStatus::Cancelled => active.cancelled_at = Set(stamp(tracking.cancelled_at)),
    }

    if to == OrderStatus::Delivered {
        if !commission_distributed {
            let rates = if has_hotel {
                *rates
            } else {
                rates.without_hotel()
            };
            let split = rates.split(total)?;
            active.hotel_commission = Set(split.hotel_amount);
            active.admin_commission = Set(split.admin_amount);
            active.restaurant_amount = Set(split.restaurant_amount);
            active.commission_distributed = Set(true);
        }
        if payment_method.collected_on_delivery() && !already_paid {
            active.payment_status = Set("paid".into());
            active.paid_at = Set(Some(now.into()));
        }
    }

    Ok(active)
}

pub async fn apply_transition<C: ConnectionTrait>(
    conn: &C,
    order: OrderModel,
    to: OrderStatus,
    actor: Actor,
    rates: &CommissionRates,
) -> AppResult<OrderModel> {
    let from = order.status.clone();
    let id = order.id;
    let active = prepare_transition(order, to, actor, rates, Utc::now())?;
    let updated = active.update(conn).await?;
    tracing::info!(order_id = %id, from = %from, to = %to, actor = %actor, "order status changed");
    Ok(updated)
}

pub async fn find_order_for_update<C: ConnectionTrait>(
    conn: &C,
    condition: Condition,
) -> AppResult<OrderModel> {
    Orders::find()
        .filter(condition)
        .lock(LockType::Update)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn with_items<C: ConnectionTrait>(
    conn: &C,
    order: OrderModel,
) -> AppResult<OrderWithItems> {
    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .order_by_asc(OrderItemCol::CreatedAt)
        .all(conn)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();

    Ok(OrderWithItems {
        order: order_from_entity(order)?,
        items,
    })
}

pub fn by_id(id: Uuid) -> Condition {
    Condition::all().add(OrderCol::Id.eq(id))
}
