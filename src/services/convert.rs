use chrono::{DateTime, FixedOffset, Utc};

use crate::{
    domain::{
        geo::Coordinates,
        order_status::{Lifecycle, OrderStatus, OrderTracking, OrderType, PaymentMethod},
    },
    entity::{
        cart_items::Model as CartItemModel, hotels::Model as HotelModel,
        menu_items::Model as MenuItemModel, order_items::Model as OrderItemModel,
        orders::Model as OrderModel, restaurants::Model as RestaurantModel,
        users::Model as UserModel,
    },
    error::AppError,
    models::{CartItem, Hotel, MenuItem, Order, OrderItem, Restaurant, User},
};

fn utc(dt: DateTime<FixedOffset>) -> DateTime<Utc> {
    dt.with_timezone(&Utc)
}

fn utc_opt(dt: Option<DateTime<FixedOffset>>) -> Option<DateTime<Utc>> {
    dt.map(utc)
}

pub fn user_from_entity(model: UserModel) -> User {
    User {
        id: model.id,
        email: model.email,
        role: model.role,
        created_at: utc(model.created_at),
    }
}

pub fn hotel_from_entity(model: HotelModel) -> Hotel {
    Hotel {
        id: model.id,
        owner_id: model.owner_id,
        name: model.name,
        address: model.address,
        latitude: model.latitude,
        longitude: model.longitude,
        created_at: utc(model.created_at),
    }
}

pub fn restaurant_from_entity(model: RestaurantModel) -> Restaurant {
    Restaurant {
        id: model.id,
        owner_id: model.owner_id,
        name: model.name,
        address: model.address,
        latitude: model.latitude,
        longitude: model.longitude,
        is_open: model.is_open,
        created_at: utc(model.created_at),
    }
}

pub fn menu_item_from_entity(model: MenuItemModel) -> MenuItem {
    MenuItem {
        id: model.id,
        restaurant_id: model.restaurant_id,
        name: model.name,
        description: model.description,
        price: model.price,
        is_available: model.is_available,
        created_at: utc(model.created_at),
    }
}

pub fn cart_item_from_entity(model: CartItemModel) -> CartItem {
    CartItem {
        id: model.id,
        menu_item_id: model.menu_item_id,
        user_id: model.user_id,
        quantity: model.quantity,
        created_at: utc(model.created_at),
    }
}

pub fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        menu_item_id: model.menu_item_id,
        name: model.name,
        quantity: model.quantity,
        price: model.price,
        created_at: utc(model.created_at),
    }
}

pub fn tracking_of(model: &OrderModel) -> OrderTracking {
    OrderTracking {
        confirmed_at: utc_opt(model.confirmed_at),
        preparing_at: utc_opt(model.preparing_at),
        ready_at: utc_opt(model.ready_at),
        picked_up_at: utc_opt(model.picked_up_at),
        delivered_at: utc_opt(model.delivered_at),
        cancelled_at: utc_opt(model.cancelled_at),
    }
}

/// Stored enum columns that fail to parse mean the row was written by something else.
fn stored<T, E: std::fmt::Display>(value: Result<T, E>) -> Result<T, AppError> {
    value.map_err(|e| AppError::Internal(anyhow::anyhow!("corrupt order row: {e}")))
}

pub fn lifecycle_of(model: &OrderModel) -> Result<Lifecycle, AppError> {
    Ok(Lifecycle::new(
        stored(model.status.parse::<OrderStatus>())?,
        stored(model.order_type.parse::<OrderType>())?,
        tracking_of(model),
    ))
}

pub fn payment_method_of(model: &OrderModel) -> Result<PaymentMethod, AppError> {
    stored(model.payment_method.parse::<PaymentMethod>())
}

pub fn destination_of(model: &OrderModel) -> Coordinates {
    Coordinates {
        latitude: model.delivery_latitude,
        longitude: model.delivery_longitude,
    }
}

pub fn courier_of(model: &OrderModel) -> Option<Coordinates> {
    match (model.courier_latitude, model.courier_longitude) {
        (Some(latitude), Some(longitude)) => Some(Coordinates {
            latitude,
            longitude,
        }),
        _ => None,
    }
}

pub fn order_from_entity(model: OrderModel) -> Result<Order, AppError> {
    let lifecycle = lifecycle_of(&model)?;
    let payment_method = payment_method_of(&model)?;
    Ok(Order {
        id: model.id,
        user_id: model.user_id,
        restaurant_id: model.restaurant_id,
        hotel_id: model.hotel_id,
        delivery_partner_id: model.delivery_partner_id,
        order_type: lifecycle.order_type,
        payment_method,
        payment_status: model.payment_status,
        status: lifecycle.status,
        invoice_number: model.invoice_number,
        room_number: model.room_number,
        total_amount: model.total_amount,
        hotel_commission: model.hotel_commission,
        admin_commission: model.admin_commission,
        restaurant_amount: model.restaurant_amount,
        commission_distributed: model.commission_distributed,
        tracking: lifecycle.tracking,
        paid_at: utc_opt(model.paid_at),
        created_at: utc(model.created_at),
        updated_at: utc(model.updated_at),
    })
}

pub fn orders_from_entities(models: Vec<OrderModel>) -> Result<Vec<Order>, AppError> {
    models.into_iter().map(order_from_entity).collect()
}
