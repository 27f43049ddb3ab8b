use hotel_order_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    domain::{
        commission::CommissionRates,
        order_status::{OrderStatus, PaymentMethod},
    },
    dto::{
        auth::UpdateRoleRequest,
        cart::AddToCartRequest,
        catalog::{CreateHotelRequest, CreateMenuItemRequest, CreateRestaurantRequest},
        orders::{CheckoutRequest, LocationUpdateRequest, PayOrderRequest, UpdateOrderStatusRequest},
        settlement::RecordSettlementRequest,
    },
    entity::users::ActiveModel as UserActive,
    error::AppError,
    middleware::auth::{AuthUser, Role},
    models::{Hotel, MenuItem},
    services::{
        admin_service, cart_service, catalog_service, fulfilment_service, order_service,
        settlement_service,
    },
    state::AppState,
};
use rust_decimal::Decimal;
use sea_orm::ActiveModelTrait;
use sea_orm::ActiveValue::{NotSet, Set};
use uuid::Uuid;

struct Cast {
    admin: AuthUser,
    guest: AuthUser,
    courier: AuthUser,
    hotel_staff: AuthUser,
    kitchen: AuthUser,
}

// Integration flow: hotel QR order settles through the hotel, direct order goes through a courier.
#[tokio::test]
async fn hotel_and_direct_order_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let cast = create_cast(&state).await?;
    let (hotel, item) = create_venues(&state, &cast).await?;

    // Hotel order: 2 x 67.00 = 134.00
    cart_service::add_to_cart(
        &state,
        &cast.guest,
        AddToCartRequest {
            menu_item_id: item.id,
            quantity: 2,
        },
    )
    .await?;
    let placed = order_service::checkout(
        &state,
        &cast.guest,
        CheckoutRequest {
            payment_method: None,
            hotel_ref: Some(hotel.id.to_string()),
            room_number: Some("1204".into()),
            delivery_latitude: None,
            delivery_longitude: None,
        },
    )
    .await?
    .data
    .expect("order");
    let order_id = placed.order.id;
    assert_eq!(placed.order.total_amount, 13_400);
    assert_eq!(placed.order.payment_method, PaymentMethod::PayAtHotel);
    assert_eq!(placed.order.hotel_id, Some(hotel.id));
    assert_eq!(placed.items.len(), 1);

    let cart = cart_service::list_cart(&state, &cast.guest)
        .await?
        .data
        .expect("cart");
    assert!(cart.items.is_empty());

    let ready = walk_kitchen(&state, &cast, order_id).await?;
    assert_eq!(ready.status, OrderStatus::Ready);
    assert!(ready.tracking.ready_at.is_some());
    assert!(ready.tracking.delivered_at.is_none());
    assert!(!ready.commission_distributed);

    let delivered = fulfilment_service::hotel_mark_delivered(&state, &cast.hotel_staff, order_id)
        .await?
        .data
        .expect("delivered");
    let order = delivered.order;
    assert_eq!(order.status, OrderStatus::Delivered);
    assert!(order.tracking.delivered_at.is_some());
    assert!(order.commission_distributed);
    assert_eq!(order.hotel_commission, 1_340);
    assert_eq!(order.admin_commission, 2_680);
    assert_eq!(order.restaurant_amount, 9_380);
    assert_eq!(order.payment_status, "paid");

    // Delivered is terminal
    let err = order_service::cancel_order(&state, &cast.guest, order_id)
        .await
        .expect_err("terminal");
    assert!(matches!(err, AppError::Conflict(_)));

    let summary = settlement_service::own_settlement(&state, &cast.hotel_staff)
        .await?
        .data
        .expect("settlement")
        .summary;
    assert_eq!(summary.total_cash_collected, 13_400);
    assert_eq!(summary.admin_commission_due, 2_680);
    assert_eq!(summary.settlement_paid, 0);
    assert_eq!(summary.remaining_settlement, 2_680);

    let err = settlement_service::record_settlement(
        &state,
        &cast.admin,
        hotel.id,
        RecordSettlementRequest {
            amount: 3_000,
            note: None,
        },
    )
    .await
    .expect_err("overpayment");
    assert!(matches!(err, AppError::BadRequest(_)));

    settlement_service::record_settlement(
        &state,
        &cast.admin,
        hotel.id,
        RecordSettlementRequest {
            amount: 2_000,
            note: Some("bank transfer".into()),
        },
    )
    .await?;
    let summary = settlement_service::hotel_settlement(&state, &cast.admin, hotel.id)
        .await?
        .data
        .expect("settlement")
        .summary;
    assert_eq!(summary.settlement_paid, 2_000);
    assert_eq!(summary.remaining_settlement, 680);

    // Direct delivery order, paid online
    cart_service::add_to_cart(
        &state,
        &cast.guest,
        AddToCartRequest {
            menu_item_id: item.id,
            quantity: 2,
        },
    )
    .await?;
    let placed = order_service::checkout(
        &state,
        &cast.guest,
        CheckoutRequest {
            payment_method: Some(PaymentMethod::Online),
            hotel_ref: None,
            room_number: None,
            delivery_latitude: Some(-6.2146),
            delivery_longitude: Some(106.8451),
        },
    )
    .await?
    .data
    .expect("order");
    let order_id = placed.order.id;
    assert_eq!(placed.order.hotel_id, None);

    order_service::pay_order(
        &state,
        &cast.guest,
        order_id,
        PayOrderRequest {
            invoice_number: placed.order.invoice_number.clone(),
        },
    )
    .await?;
    walk_kitchen(&state, &cast, order_id).await?;

    let err = fulfilment_service::hotel_mark_delivered(&state, &cast.hotel_staff, order_id)
        .await
        .expect_err("not a hotel order");
    assert!(matches!(err, AppError::NotFound));

    let picked = fulfilment_service::accept_delivery(&state, &cast.courier, order_id)
        .await?
        .data
        .expect("picked up");
    assert_eq!(picked.order.status, OrderStatus::PickedUp);
    assert_eq!(picked.order.delivery_partner_id, Some(cast.courier.user_id));

    fulfilment_service::update_location(
        &state,
        &cast.courier,
        order_id,
        LocationUpdateRequest {
            latitude: -6.2088,
            longitude: 106.8456,
        },
    )
    .await?;
    let tracking = order_service::track_order(&state, &cast.guest, order_id)
        .await?
        .data
        .expect("tracking");
    let distance = tracking.distance_km.expect("distance");
    assert!(distance > 0.0 && distance < 2.0);
    assert!(tracking.eta_minutes.is_some());

    let delivered = fulfilment_service::complete_delivery(&state, &cast.courier, order_id)
        .await?
        .data
        .expect("delivered");
    assert_eq!(delivered.order.hotel_commission, 0);
    assert_eq!(delivered.order.admin_commission, 2_680);
    assert_eq!(delivered.order.restaurant_amount, 10_720);

    // Online orders do not change the hotel's settlement
    let summary = settlement_service::own_settlement(&state, &cast.hotel_staff)
        .await?
        .data
        .expect("settlement")
        .summary;
    assert_eq!(summary.total_cash_collected, 13_400);

    Ok(())
}

#[tokio::test]
async fn customer_cannot_cancel_after_confirmation() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let cast = create_cast(&state).await?;
    let (_, item) = create_venues(&state, &cast).await?;

    cart_service::add_to_cart(
        &state,
        &cast.guest,
        AddToCartRequest {
            menu_item_id: item.id,
            quantity: 1,
        },
    )
    .await?;
    let order_id = order_service::checkout(
        &state,
        &cast.guest,
        CheckoutRequest {
            payment_method: Some(PaymentMethod::CashOnDelivery),
            hotel_ref: None,
            room_number: None,
            delivery_latitude: Some(-6.2),
            delivery_longitude: Some(106.8),
        },
    )
    .await?
    .data
    .expect("order")
    .order
    .id;

    fulfilment_service::restaurant_update_status(
        &state,
        &cast.kitchen,
        order_id,
        UpdateOrderStatusRequest {
            status: OrderStatus::Confirmed,
        },
    )
    .await?;

    let err = order_service::cancel_order(&state, &cast.guest, order_id)
        .await
        .expect_err("too late");
    assert!(matches!(err, AppError::Forbidden));

    let cancelled = hotel_order_api::services::admin_service::cancel_order_admin(
        &state,
        &cast.admin,
        order_id,
    )
    .await?
    .data
    .expect("cancelled");
    assert_eq!(cancelled.order.status, OrderStatus::Cancelled);
    assert!(cancelled.order.tracking.cancelled_at.is_some());
    assert!(!cancelled.order.commission_distributed);
    Ok(())
}

#[tokio::test]
async fn checkout_rejects_empty_cart_and_pay_at_hotel_without_hotel() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let cast = create_cast(&state).await?;
    let (_, item) = create_venues(&state, &cast).await?;

    let direct = |payment_method| CheckoutRequest {
        payment_method: Some(payment_method),
        hotel_ref: None,
        room_number: None,
        delivery_latitude: Some(-6.2),
        delivery_longitude: Some(106.8),
    };

    let err = order_service::checkout(&state, &cast.guest, direct(PaymentMethod::Online))
        .await
        .expect_err("empty cart");
    assert!(matches!(err, AppError::BadRequest(_)));

    cart_service::add_to_cart(
        &state,
        &cast.guest,
        AddToCartRequest {
            menu_item_id: item.id,
            quantity: 1,
        },
    )
    .await?;
    let err = order_service::checkout(&state, &cast.guest, direct(PaymentMethod::PayAtHotel))
        .await
        .expect_err("no hotel");
    assert!(matches!(err, AppError::BadRequest(_)));
    Ok(())
}

#[tokio::test]
async fn settlement_counts_only_delivered_pay_at_hotel_orders() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let cast = create_cast(&state).await?;
    let (hotel, item) = create_venues(&state, &cast).await?;
    let at_hotel = |payment_method| CheckoutRequest {
        payment_method: Some(payment_method),
        hotel_ref: Some(hotel.id.to_string()),
        room_number: Some("808".into()),
        delivery_latitude: None,
        delivery_longitude: None,
    };

    // Delivered and paid at the hotel: counts.
    add_item(&state, &cast.guest, item.id, 2).await?;
    let counted = order_service::checkout(&state, &cast.guest, at_hotel(PaymentMethod::PayAtHotel))
        .await?
        .data
        .expect("order")
        .order
        .id;
    walk_kitchen(&state, &cast, counted).await?;
    fulfilment_service::hotel_mark_delivered(&state, &cast.hotel_staff, counted).await?;

    // Delivered through the hotel but paid online: the hotel never held the cash.
    add_item(&state, &cast.guest, item.id, 3).await?;
    let online = order_service::checkout(&state, &cast.guest, at_hotel(PaymentMethod::Online))
        .await?
        .data
        .expect("order")
        .order;
    order_service::pay_order(
        &state,
        &cast.guest,
        online.id,
        PayOrderRequest {
            invoice_number: online.invoice_number.clone(),
        },
    )
    .await?;
    walk_kitchen(&state, &cast, online.id).await?;
    let delivered = fulfilment_service::hotel_mark_delivered(&state, &cast.hotel_staff, online.id)
        .await?
        .data
        .expect("delivered");
    assert!(delivered.order.commission_distributed);

    // Pay at hotel but still pending: commission not distributed yet.
    add_item(&state, &cast.guest, item.id, 1).await?;
    order_service::checkout(&state, &cast.guest, at_hotel(PaymentMethod::PayAtHotel)).await?;

    let summary = settlement_service::own_settlement(&state, &cast.hotel_staff)
        .await?
        .data
        .expect("settlement")
        .summary;
    assert_eq!(summary.order_count, 1);
    assert_eq!(summary.total_cash_collected, 13_400);
    assert_eq!(summary.admin_commission_due, 2_680);
    assert_eq!(summary.remaining_settlement, 2_680);
    Ok(())
}

#[tokio::test]
async fn cart_total_overflow_is_rejected() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let cast = create_cast(&state).await?;
    create_venues(&state, &cast).await?;

    let platter = catalog_service::create_menu_item(
        &state,
        &cast.kitchen,
        CreateMenuItemRequest {
            name: "Gold Leaf Platter".into(),
            description: None,
            price: i64::MAX / 2,
        },
    )
    .await?
    .data
    .expect("menu item");
    add_item(&state, &cast.guest, platter.id, 3).await?;

    let err = cart_service::list_cart(&state, &cast.guest)
        .await
        .expect_err("overflowing total");
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = order_service::checkout(
        &state,
        &cast.guest,
        CheckoutRequest {
            payment_method: Some(PaymentMethod::Online),
            hotel_ref: None,
            room_number: None,
            delivery_latitude: Some(-6.2),
            delivery_longitude: Some(106.8),
        },
    )
    .await
    .expect_err("overflowing total");
    assert!(matches!(err, AppError::BadRequest(_)));
    Ok(())
}

#[tokio::test]
async fn admin_grants_staff_roles() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let admin = create_user(&state, Role::Admin).await?;
    let applicant = create_user(&state, Role::User).await?;
    let hotel_request = || CreateHotelRequest {
        owner_id: applicant.user_id,
        name: format!("Harbour View {}", Uuid::new_v4().simple()),
        address: "3 Pier Lane".into(),
        latitude: -6.1,
        longitude: 106.8,
    };

    let err = catalog_service::create_hotel(&state, &admin, hotel_request())
        .await
        .expect_err("owner is not hotel staff");
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = admin_service::update_user_role(
        &state,
        &applicant,
        applicant.user_id,
        UpdateRoleRequest { role: Role::Admin },
    )
    .await
    .expect_err("not an admin");
    assert!(matches!(err, AppError::Forbidden));

    let err = admin_service::update_user_role(
        &state,
        &admin,
        admin.user_id,
        UpdateRoleRequest { role: Role::User },
    )
    .await
    .expect_err("own role");
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = admin_service::update_user_role(
        &state,
        &admin,
        Uuid::new_v4(),
        UpdateRoleRequest { role: Role::Hotel },
    )
    .await
    .expect_err("unknown user");
    assert!(matches!(err, AppError::NotFound));

    let promoted = admin_service::update_user_role(
        &state,
        &admin,
        applicant.user_id,
        UpdateRoleRequest { role: Role::Hotel },
    )
    .await?
    .data
    .expect("user");
    assert_eq!(promoted.role, "hotel");

    let hotel = catalog_service::create_hotel(&state, &admin, hotel_request())
        .await?
        .data
        .expect("hotel");
    assert_eq!(hotel.owner_id, applicant.user_id);
    Ok(())
}

async fn add_item(
    state: &AppState,
    user: &AuthUser,
    menu_item_id: Uuid,
    quantity: i32,
) -> anyhow::Result<()> {
    cart_service::add_to_cart(
        state,
        user,
        AddToCartRequest {
            menu_item_id,
            quantity,
        },
    )
    .await?;
    Ok(())
}

async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(None);
        }
    };

    let pool = create_pool(&database_url).await?;
    let orm = create_orm_conn(&database_url).await?;
    run_migrations(&orm).await?;

    let config = AppConfig {
        database_url,
        host: "127.0.0.1".into(),
        port: 0,
        redis_url: None,
        frontend_base_url: "http://localhost:5173".into(),
        commission: CommissionRates::new(
            Decimal::from(10),
            Decimal::from(20),
            Decimal::from(70),
        )?,
        rate_limit_max: 1_000,
        rate_limit_window_secs: 60,
        cache_ttl_secs: 60,
        courier_speed_kmh: 25.0,
    };
    Ok(Some(AppState::new(pool, orm, config)?))
}

async fn create_user(state: &AppState, role: Role) -> anyhow::Result<AuthUser> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(format!("{}-{}@example.com", role, Uuid::new_v4())),
        password_hash: Set("not-a-real-hash".into()),
        role: Set(role.as_str().into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(AuthUser {
        user_id: user.id,
        role,
    })
}

async fn create_cast(state: &AppState) -> anyhow::Result<Cast> {
    Ok(Cast {
        admin: create_user(state, Role::Admin).await?,
        guest: create_user(state, Role::User).await?,
        courier: create_user(state, Role::Delivery).await?,
        hotel_staff: create_user(state, Role::Hotel).await?,
        kitchen: create_user(state, Role::Restaurant).await?,
    })
}

async fn create_venues(state: &AppState, cast: &Cast) -> anyhow::Result<(Hotel, MenuItem)> {
    let suffix = Uuid::new_v4().simple().to_string();
    let hotel = catalog_service::create_hotel(
        state,
        &cast.admin,
        CreateHotelRequest {
            owner_id: cast.hotel_staff.user_id,
            name: format!("Test Hotel {suffix}"),
            address: "1 Quay Street".into(),
            latitude: -6.2000,
            longitude: 106.8166,
        },
    )
    .await?
    .data
    .expect("hotel");

    catalog_service::create_restaurant(
        state,
        &cast.admin,
        CreateRestaurantRequest {
            owner_id: cast.kitchen.user_id,
            name: format!("Test Kitchen {suffix}"),
            address: "22 Market Road".into(),
            latitude: -6.2088,
            longitude: 106.8456,
        },
    )
    .await?;

    let item = catalog_service::create_menu_item(
        state,
        &cast.kitchen,
        CreateMenuItemRequest {
            name: "Nasi Goreng".into(),
            description: None,
            price: 6_700,
        },
    )
    .await?
    .data
    .expect("menu item");

    Ok((hotel, item))
}

async fn walk_kitchen(
    state: &AppState,
    cast: &Cast,
    order_id: Uuid,
) -> anyhow::Result<hotel_order_api::models::Order> {
    let mut last = None;
    for status in [
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
    ] {
        let resp = fulfilment_service::restaurant_update_status(
            state,
            &cast.kitchen,
            order_id,
            UpdateOrderStatusRequest { status },
        )
        .await?;
        last = resp.data;
    }
    Ok(last.expect("order").order)
}
