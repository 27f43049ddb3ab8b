use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, Set, TransactionTrait};
use uuid::Uuid;

use crate::{
    audit,
    domain::{
        geo::Coordinates,
        order_status::{Actor, OrderStatus},
    },
    dto::orders::{LocationUpdateRequest, OrderList, OrderWithItems, UpdateOrderStatusRequest},
    entity::orders::{ActiveModel as OrderActive, Column as OrderCol},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, Role, ensure_role},
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    services::{
        catalog_service::{owned_hotel, owned_restaurant},
        convert::lifecycle_of,
        lifecycle::{apply_transition, by_id, find_order_for_update, prepare_transition, with_items},
        order_service::paginate_orders,
    },
    state::AppState,
};

pub async fn restaurant_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let restaurant = owned_restaurant(state, user).await?;
    let mut condition = Condition::all().add(OrderCol::RestaurantId.eq(restaurant.id));
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status.as_str()));
    }
    paginate_orders(state, condition, &query, "Restaurant orders").await
}

/// Restaurant side of the lifecycle: confirm, prepare, mark ready or reject.
pub async fn restaurant_update_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let restaurant = owned_restaurant(state, user).await?;
    let txn = state.orm.begin().await?;
    let order = find_order_for_update(
        &txn,
        by_id(id).add(OrderCol::RestaurantId.eq(restaurant.id)),
    )
    .await?;
    let order = apply_transition(
        &txn,
        order,
        payload.status,
        Actor::Restaurant,
        &state.config.commission,
    )
    .await?;
    let data = with_items(&txn, order).await?;
    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        "order_status_update",
        "orders",
        serde_json::json!({ "order_id": id, "status": payload.status.as_str() }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order updated",
        data,
        Some(Meta::empty()),
    ))
}

pub async fn available_for_delivery(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_role(user, Role::Delivery)?;
    let condition = Condition::all()
        .add(OrderCol::Status.eq(OrderStatus::Ready.as_str()))
        .add(OrderCol::DeliveryPartnerId.is_null());
    paginate_orders(state, condition, &query, "Available orders").await
}

pub async fn accept_delivery(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_role(user, Role::Delivery)?;
    let txn = state.orm.begin().await?;
    let order = find_order_for_update(&txn, by_id(id)).await?;

    if let Some(partner) = order.delivery_partner_id {
        if partner != user.user_id {
            return Err(AppError::Conflict(
                "Order already assigned to another partner".into(),
            ));
        }
    }

    let mut active = prepare_transition(
        order,
        OrderStatus::PickedUp,
        Actor::Delivery,
        &state.config.commission,
        Utc::now(),
    )?;
    active.delivery_partner_id = Set(Some(user.user_id));
    let order = active.update(&txn).await?;
    tracing::info!(order_id = %id, partner = %user.user_id, "delivery accepted");

    let data = with_items(&txn, order).await?;
    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        "delivery_accept",
        "orders",
        serde_json::json!({ "order_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order picked up",
        data,
        Some(Meta::empty()),
    ))
}

pub async fn complete_delivery(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_role(user, Role::Delivery)?;
    let txn = state.orm.begin().await?;
    let order = find_order_for_update(
        &txn,
        by_id(id).add(OrderCol::DeliveryPartnerId.eq(user.user_id)),
    )
    .await?;
    let order = apply_transition(
        &txn,
        order,
        OrderStatus::Delivered,
        Actor::Delivery,
        &state.config.commission,
    )
    .await?;
    let data = with_items(&txn, order).await?;
    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        "order_delivered",
        "orders",
        serde_json::json!({ "order_id": id, "by": "delivery" }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order delivered",
        data,
        Some(Meta::empty()),
    ))
}

pub async fn update_location(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: LocationUpdateRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_role(user, Role::Delivery)?;
    let position = Coordinates::new(payload.latitude, payload.longitude)?;

    let txn = state.orm.begin().await?;
    let order = find_order_for_update(
        &txn,
        by_id(id).add(OrderCol::DeliveryPartnerId.eq(user.user_id)),
    )
    .await?;
    let status = lifecycle_of(&order)?.status;
    if status.is_terminal() {
        return Err(AppError::Conflict(format!("Order is already {status}")));
    }

    let mut active: OrderActive = order.into();
    active.courier_latitude = Set(Some(position.latitude));
    active.courier_longitude = Set(Some(position.longitude));
    active.updated_at = Set(Utc::now().into());
    active.update(&txn).await?;
    txn.commit().await?;

    Ok(ApiResponse::success(
        "Location updated",
        serde_json::json!({ "order_id": id, "latitude": position.latitude, "longitude": position.longitude }),
        Some(Meta::empty()),
    ))
}

pub async fn hotel_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let hotel = owned_hotel(state, user).await?;
    let mut condition = Condition::all().add(OrderCol::HotelId.eq(hotel.id));
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status.as_str()));
    }
    paginate_orders(state, condition, &query, "Hotel orders").await
}

/// Hotel staff hand a QR order to the guest.
pub async fn hotel_mark_delivered(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let hotel = owned_hotel(state, user).await?;
    let txn = state.orm.begin().await?;
    let order =
        find_order_for_update(&txn, by_id(id).add(OrderCol::HotelId.eq(hotel.id))).await?;
    let order = apply_transition(
        &txn,
        order,
        OrderStatus::Delivered,
        Actor::HotelStaff,
        &state.config.commission,
    )
    .await?;
    let data = with_items(&txn, order).await?;
    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        "order_delivered",
        "orders",
        serde_json::json!({ "order_id": id, "by": "hotel" }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order delivered",
        data,
        Some(Meta::empty()),
    ))
}
