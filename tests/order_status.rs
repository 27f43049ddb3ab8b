use axum::{http::StatusCode, response::IntoResponse};
use chrono::{Duration, Utc};
use uuid::Uuid;
use hotel_order_api::{
    domain::order_status::{
        Actor, Lifecycle, OrderStatus, OrderTracking, OrderType, PaymentMethod, TransitionError,
    },
    error::AppError,
    models::Order,
};

fn lifecycle(status: OrderStatus, order_type: OrderType) -> Lifecycle {
    Lifecycle::new(status, order_type, OrderTracking::default())
}

fn walk_to_ready(order_type: OrderType) -> Lifecycle {
    let mut order = lifecycle(OrderStatus::Pending, order_type);
    let now = Utc::now();
    for to in [
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
    ] {
        order.transition(to, Actor::Restaurant, now).expect("kitchen step");
    }
    order
}

#[test]
fn ready_never_sets_delivered_at() {
    for order_type in [OrderType::Delivery, OrderType::Hotel] {
        let order = walk_to_ready(order_type);
        assert_eq!(order.status, OrderStatus::Ready);
        assert!(order.tracking.ready_at.is_some());
        assert!(order.tracking.delivered_at.is_none(), "{order_type:?}");
        assert!(order.tracking.picked_up_at.is_none());
    }
}

#[test]
fn each_step_stamps_only_its_own_timestamp() {
    let mut order = lifecycle(OrderStatus::Pending, OrderType::Delivery);
    let t0 = Utc::now();
    order
        .transition(OrderStatus::Confirmed, Actor::Restaurant, t0)
        .expect("confirm");
    let t1 = t0 + Duration::minutes(5);
    order
        .transition(OrderStatus::Preparing, Actor::Restaurant, t1)
        .expect("prepare");

    assert_eq!(order.tracking.confirmed_at, Some(t0));
    assert_eq!(order.tracking.preparing_at, Some(t1));
    assert_eq!(order.tracking.ready_at, None);
    assert_eq!(order.tracking.cancelled_at, None);
}

#[test]
fn courier_picks_up_then_delivers() {
    let mut order = walk_to_ready(OrderType::Delivery);
    let now = Utc::now();
    order
        .transition(OrderStatus::PickedUp, Actor::Delivery, now)
        .expect("pick up");
    assert!(order.tracking.delivered_at.is_none());
    order
        .transition(OrderStatus::Delivered, Actor::Delivery, now)
        .expect("deliver");
    assert_eq!(order.tracking.delivered_at, Some(now));
}

#[test]
fn hotel_staff_deliver_ready_hotel_orders() {
    let mut order = walk_to_ready(OrderType::Hotel);
    let now = Utc::now();
    order
        .transition(OrderStatus::Delivered, Actor::HotelStaff, now)
        .expect("hand over");
    assert_eq!(order.status, OrderStatus::Delivered);
    assert_eq!(order.tracking.delivered_at, Some(now));
}

#[test]
fn hotel_staff_cannot_deliver_direct_orders() {
    let mut order = walk_to_ready(OrderType::Delivery);
    let err = order
        .transition(OrderStatus::Delivered, Actor::HotelStaff, Utc::now())
        .expect_err("forbidden");
    assert!(matches!(err, TransitionError::Forbidden { .. }));
    assert_eq!(order.status, OrderStatus::Ready);
}

#[test]
fn restaurant_cannot_skip_steps_or_deliver() {
    let mut order = lifecycle(OrderStatus::Pending, OrderType::Delivery);
    let err = order
        .transition(OrderStatus::Ready, Actor::Restaurant, Utc::now())
        .expect_err("skip");
    assert_eq!(
        err,
        TransitionError::NotAllowed {
            from: OrderStatus::Pending,
            to: OrderStatus::Ready
        }
    );

    let mut order = walk_to_ready(OrderType::Delivery);
    let err = order
        .transition(OrderStatus::PickedUp, Actor::Restaurant, Utc::now())
        .expect_err("not a courier");
    assert!(matches!(err, TransitionError::Forbidden { .. }));
}

#[test]
fn terminal_orders_reject_every_move() {
    let mut order = lifecycle(OrderStatus::Delivered, OrderType::Hotel);
    let err = order
        .transition(OrderStatus::Cancelled, Actor::Admin, Utc::now())
        .expect_err("terminal");
    assert_eq!(err, TransitionError::Terminal(OrderStatus::Delivered));

    let mut order = lifecycle(OrderStatus::Cancelled, OrderType::Delivery);
    let err = order
        .transition(OrderStatus::Confirmed, Actor::Restaurant, Utc::now())
        .expect_err("terminal");
    assert_eq!(err, TransitionError::Terminal(OrderStatus::Cancelled));
}

#[test]
fn customer_may_only_cancel_pending_orders() {
    let mut order = lifecycle(OrderStatus::Pending, OrderType::Delivery);
    order
        .transition(OrderStatus::Cancelled, Actor::Customer, Utc::now())
        .expect("cancel");
    assert!(order.tracking.cancelled_at.is_some());

    let mut order = lifecycle(OrderStatus::Confirmed, OrderType::Delivery);
    let err = order
        .transition(OrderStatus::Cancelled, Actor::Customer, Utc::now())
        .expect_err("too late");
    assert!(matches!(err, TransitionError::Forbidden { .. }));
}

#[test]
fn admin_may_cancel_any_open_order() {
    for from in [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::PickedUp,
    ] {
        let mut order = lifecycle(from, OrderType::Delivery);
        order
            .transition(OrderStatus::Cancelled, Actor::Admin, Utc::now())
            .expect("admin cancel");
    }
}

#[test]
fn status_names_use_snake_case() {
    assert_eq!(
        serde_json::to_string(&OrderStatus::PickedUp).expect("json"),
        "\"picked_up\""
    );
    assert_eq!("picked_up".parse::<OrderStatus>(), Ok(OrderStatus::PickedUp));
    assert!(matches!(
        "shipped".parse::<OrderStatus>(),
        Err(TransitionError::Unknown(_))
    ));
}

#[test]
fn transition_errors_map_to_http_status() {
    let conflict = AppError::from(TransitionError::Terminal(OrderStatus::Delivered));
    assert_eq!(conflict.into_response().status(), StatusCode::CONFLICT);

    let forbidden = AppError::from(TransitionError::Forbidden {
        actor: Actor::Customer,
        from: OrderStatus::Ready,
        to: OrderStatus::Cancelled,
    });
    assert_eq!(forbidden.into_response().status(), StatusCode::FORBIDDEN);

    let bad = AppError::from(TransitionError::Unknown("shipped".into()));
    assert_eq!(bad.into_response().status(), StatusCode::BAD_REQUEST);
}

#[test]
fn order_json_keeps_commission_contract_names() {
    let now = Utc::now();
    let order = Order {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        restaurant_id: Uuid::new_v4(),
        hotel_id: Some(Uuid::new_v4()),
        delivery_partner_id: None,
        order_type: OrderType::Hotel,
        payment_method: PaymentMethod::PayAtHotel,
        payment_status: "paid".into(),
        status: OrderStatus::Delivered,
        invoice_number: "INV-1".into(),
        room_number: Some("1204".into()),
        total_amount: 13_400,
        hotel_commission: 1_340,
        admin_commission: 2_680,
        restaurant_amount: 9_380,
        commission_distributed: true,
        tracking: OrderTracking::default(),
        paid_at: Some(now),
        created_at: now,
        updated_at: now,
    };
    let body = serde_json::to_value(&order).expect("json");

    assert_eq!(body["hotelCommission"], 1_340);
    assert_eq!(body["commissionDistributed"], true);
    assert_eq!(body["admin_commission"], 2_680);
    assert_eq!(body["restaurant_amount"], 9_380);
    assert_eq!(body["order_type"], "hotel");
    assert!(body.get("hotel_commission").is_none());
}
