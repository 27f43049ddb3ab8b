use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    domain::{
        geo::{self, Coordinates},
        money,
        order_status::{Actor, OrderStatus, OrderType, PaymentMethod},
        qr,
    },
    dto::orders::{CheckoutRequest, OrderList, OrderTrackingView, OrderWithItems, PayOrderRequest},
    entity::{
        cart_items::{Column as CartCol, Entity as CartItems},
        hotels::Entity as Hotels,
        menu_items::Entity as MenuItems,
        order_items::ActiveModel as OrderItemActive,
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
        restaurants::Entity as Restaurants,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, Role, ensure_role},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::{
        convert::{courier_of, destination_of, lifecycle_of, orders_from_entities, payment_method_of},
        lifecycle::{apply_transition, by_id, find_order_for_update, with_items},
    },
    state::AppState,
};

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let mut condition = Condition::all().add(OrderCol::UserId.eq(user.user_id));
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status.as_str()));
    }
    paginate_orders(state, condition, &query, "Ok").await
}

/// Shared by every order list endpoint: applies sort and paging to `condition`.
pub async fn paginate_orders(
    state: &AppState,
    condition: Condition,
    query: &OrderListQuery,
    message: &str,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let mut finder = Orders::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    Ok(ApiResponse::success(
        message,
        OrderList {
            items: orders_from_entities(orders)?,
        },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_role(user, Role::User)?;
    let txn = state.orm.begin().await?;

    let rows = CartItems::find()
        .find_also_related(MenuItems)
        .filter(CartCol::UserId.eq(user.user_id))
        .all(&txn)
        .await?;

    if rows.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    let mut lines = Vec::with_capacity(rows.len());
    for (cart_item, menu_item) in rows {
        let menu_item = menu_item
            .ok_or_else(|| AppError::BadRequest("Cart references a removed menu item".into()))?;
        if !menu_item.is_available {
            return Err(AppError::BadRequest(format!(
                "{} is no longer available",
                menu_item.name
            )));
        }
        if cart_item.quantity <= 0 {
            return Err(AppError::BadRequest("Cart has invalid quantity".into()));
        }
        lines.push((cart_item.quantity, menu_item));
    }

    let restaurant_id = lines[0].1.restaurant_id;
    if lines.iter().any(|(_, item)| item.restaurant_id != restaurant_id) {
        return Err(AppError::BadRequest(
            "Cart holds items from more than one restaurant".into(),
        ));
    }
    let restaurant = Restaurants::find_by_id(restaurant_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    if !restaurant.is_open {
        return Err(AppError::BadRequest("Restaurant is closed".into()));
    }

    let (order_type, hotel_id, payment_method, destination) = match payload.hotel_ref.as_deref() {
        Some(reference) => {
            let hotel_id = qr::parse_hotel_ref(reference)
                .ok_or_else(|| AppError::BadRequest("Invalid hotel reference".into()))?;
            let hotel = Hotels::find_by_id(hotel_id)
                .one(&txn)
                .await?
                .ok_or(AppError::NotFound)?;
            let payment_method = payload.payment_method.unwrap_or(PaymentMethod::PayAtHotel);
            let destination = Coordinates {
                latitude: hotel.latitude,
                longitude: hotel.longitude,
            };
            (OrderType::Hotel, Some(hotel.id), payment_method, destination)
        }
        None => {
            let payment_method = payload.payment_method.unwrap_or(PaymentMethod::Online);
            if payment_method == PaymentMethod::PayAtHotel {
                return Err(AppError::BadRequest(
                    "pay_at_hotel requires a hotel reference".into(),
                ));
            }
            let (Some(latitude), Some(longitude)) =
                (payload.delivery_latitude, payload.delivery_longitude)
            else {
                return Err(AppError::BadRequest(
                    "Delivery coordinates are required".into(),
                ));
            };
            let destination = Coordinates::new(latitude, longitude)?;
            (OrderType::Delivery, None, payment_method, destination)
        }
    };

    let total_amount = money::order_total(lines.iter().map(|(qty, item)| (*qty, item.price)))
        .ok_or_else(|| AppError::BadRequest("Order total is too large".into()))?;

    let order_id = Uuid::new_v4();
    let order = OrderActive {
        id: Set(order_id),
        user_id: Set(user.user_id),
        restaurant_id: Set(restaurant_id),
        hotel_id: Set(hotel_id),
        delivery_partner_id: Set(None),
        order_type: Set(order_type.as_str().into()),
        payment_method: Set(payment_method.as_str().into()),
        payment_status: Set("unpaid".into()),
        status: Set(OrderStatus::Pending.as_str().into()),
        invoice_number: Set(build_invoice_number(order_id)),
        room_number: Set(payload.room_number.filter(|_| order_type == OrderType::Hotel)),
        total_amount: Set(total_amount),
        hotel_commission: Set(0),
        admin_commission: Set(0),
        restaurant_amount: Set(0),
        commission_distributed: Set(false),
        delivery_latitude: Set(destination.latitude),
        delivery_longitude: Set(destination.longitude),
        courier_latitude: Set(None),
        courier_longitude: Set(None),
        confirmed_at: Set(None),
        preparing_at: Set(None),
        ready_at: Set(None),
        picked_up_at: Set(None),
        delivered_at: Set(None),
        cancelled_at: Set(None),
        paid_at: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    for (quantity, menu_item) in &lines {
        OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            menu_item_id: Set(menu_item.id),
            name: Set(menu_item.name.clone()),
            quantity: Set(*quantity),
            price: Set(menu_item.price),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
    }

    // clear cart
    CartItems::delete_many()
        .filter(CartCol::UserId.eq(user.user_id))
        .exec(&txn)
        .await?;

    let data = with_items(&txn, order).await?;
    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        "checkout",
        "orders",
        serde_json::json!({ "order_id": order_id, "order_type": order_type.as_str() }),
    )
    .await;

    Ok(ApiResponse::success(
        "Checkout success",
        data,
        Some(Meta::empty()),
    ))
}

pub async fn pay_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: PayOrderRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let txn = state.orm.begin().await?;

    let order =
        find_order_for_update(&txn, by_id(id).add(OrderCol::UserId.eq(user.user_id))).await?;

    if order.invoice_number != payload.invoice_number {
        return Err(AppError::BadRequest("Invoice number does not match".into()));
    }
    if payment_method_of(&order)? != PaymentMethod::Online {
        return Err(AppError::BadRequest(
            "Only online orders are paid in advance".into(),
        ));
    }
    if order.payment_status == "paid" {
        return Err(AppError::Conflict("Order already paid".into()));
    }
    if lifecycle_of(&order)?.status == OrderStatus::Cancelled {
        return Err(AppError::Conflict("Order is cancelled".into()));
    }

    let now = Utc::now();
    let mut active: OrderActive = order.into();
    active.payment_status = Set("paid".into());
    active.paid_at = Set(Some(now.into()));
    active.updated_at = Set(now.into());
    let order = active.update(&txn).await?;

    let data = with_items(&txn, order).await?;
    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        "order_paid",
        "orders",
        serde_json::json!({ "order_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Payment recorded",
        data,
        Some(Meta::empty()),
    ))
}

pub async fn cancel_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let txn = state.orm.begin().await?;
    let order =
        find_order_for_update(&txn, by_id(id).add(OrderCol::UserId.eq(user.user_id))).await?;
    let order = apply_transition(
        &txn,
        order,
        OrderStatus::Cancelled,
        Actor::Customer,
        &state.config.commission,
    )
    .await?;
    let data = with_items(&txn, order).await?;
    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        "order_cancel",
        "orders",
        serde_json::json!({ "order_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order cancelled",
        data,
        Some(Meta::empty()),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find()
        .filter(by_id(id).add(OrderCol::UserId.eq(user.user_id)))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success(
        "OK",
        with_items(&state.orm, order).await?,
        Some(Meta::empty()),
    ))
}

pub async fn track_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderTrackingView>> {
    let order = Orders::find()
        .filter(by_id(id).add(OrderCol::UserId.eq(user.user_id)))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let lifecycle = lifecycle_of(&order)?;
    let destination = destination_of(&order);
    let courier = courier_of(&order);

    let (distance_km, bearing_degrees, eta_minutes) = match courier {
        Some(courier) if !lifecycle.status.is_terminal() => {
            let distance = geo::haversine_km(courier, destination);
            (
                Some(distance),
                Some(geo::bearing_degrees(courier, destination)),
                Some(geo::eta_minutes(distance, state.config.courier_speed_kmh)),
            )
        }
        _ => (None, None, None),
    };

    Ok(ApiResponse::success(
        "OK",
        OrderTrackingView {
            order_id: order.id,
            status: lifecycle.status,
            tracking: lifecycle.tracking,
            destination,
            courier,
            distance_km,
            bearing_degrees,
            eta_minutes,
        },
        Some(Meta::empty()),
    ))
}

fn build_invoice_number(order_id: Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = order_id.simple().to_string();
    format!("INV-{}-{}", date, &suffix[..8].to_uppercase())
}
