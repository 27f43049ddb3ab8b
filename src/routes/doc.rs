use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    domain::{
        geo::Coordinates,
        order_status::{OrderStatus, OrderTracking, OrderType, PaymentMethod},
        settlement::SettlementSummary,
    },
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest, UpdateRoleRequest},
        cart::{AddToCartRequest, CartItemDto, CartList},
        catalog::{
            CreateHotelRequest, CreateMenuItemRequest, CreateRestaurantRequest, HotelMenu, HotelQr,
            RestaurantList, RestaurantMenu, UpdateMenuItemRequest,
        },
        orders::{
            CheckoutRequest, LocationUpdateRequest, OrderList, OrderTrackingView, OrderWithItems,
            PayOrderRequest, UpdateOrderStatusRequest,
        },
        settlement::{HotelSettlement, RecordSettlementRequest},
    },
    middleware::auth::Role,
    models::{CartItem, Hotel, MenuItem, Order, OrderItem, Restaurant, SettlementPayment, User},
    response::{ApiResponse, Meta},
    routes::{admin, auth, cart, catalog, delivery, health, hotel, orders, params, restaurant},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        catalog::list_restaurants,
        catalog::restaurant_menu,
        catalog::hotel_menu,
        cart::cart_list,
        cart::add_to_cart,
        cart::remove_from_cart,
        orders::list_orders,
        orders::checkout,
        orders::get_order,
        orders::pay_order,
        orders::cancel_order,
        orders::track_order,
        restaurant::create_menu_item,
        restaurant::update_menu_item,
        restaurant::restaurant_orders,
        restaurant::update_order_status,
        delivery::available_orders,
        delivery::accept_order,
        delivery::deliver_order,
        delivery::update_location,
        hotel::hotel_orders,
        hotel::mark_delivered,
        hotel::settlement,
        hotel::qr,
        admin::list_all_orders,
        admin::get_order_admin,
        admin::cancel_order_admin,
        admin::update_user_role,
        admin::create_hotel,
        admin::create_restaurant,
        admin::hotel_settlement,
        admin::record_settlement,
        admin::hotel_qr
    ),
    components(
        schemas(
            User,
            Hotel,
            Restaurant,
            MenuItem,
            CartItem,
            Order,
            OrderItem,
            SettlementPayment,
            OrderStatus,
            OrderType,
            PaymentMethod,
            OrderTracking,
            Coordinates,
            SettlementSummary,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            Role,
            UpdateRoleRequest,
            AddToCartRequest,
            CartItemDto,
            CartList,
            CreateHotelRequest,
            CreateRestaurantRequest,
            CreateMenuItemRequest,
            UpdateMenuItemRequest,
            RestaurantList,
            RestaurantMenu,
            HotelMenu,
            HotelQr,
            CheckoutRequest,
            PayOrderRequest,
            UpdateOrderStatusRequest,
            LocationUpdateRequest,
            OrderWithItems,
            OrderList,
            OrderTrackingView,
            HotelSettlement,
            RecordSettlementRequest,
            params::Pagination,
            params::OrderListQuery,
            Meta,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<HotelSettlement>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Catalog", description = "Restaurants, menus and hotel QR landing"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Customer order endpoints"),
        (name = "Restaurant", description = "Restaurant owner endpoints"),
        (name = "Delivery", description = "Delivery partner endpoints"),
        (name = "Hotel", description = "Hotel staff endpoints"),
        (name = "Admin", description = "Admin endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
