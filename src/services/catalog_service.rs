use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    domain::{geo::Coordinates, qr},
    dto::catalog::{
        CreateHotelRequest, CreateMenuItemRequest, CreateRestaurantRequest, HotelMenu, HotelQr,
        RestaurantList, RestaurantMenu, UpdateMenuItemRequest,
    },
    entity::{
        hotels::{ActiveModel as HotelActive, Column as HotelCol, Entity as Hotels, Model as HotelModel},
        menu_items::{ActiveModel as MenuItemActive, Column as MenuCol, Entity as MenuItems},
        restaurants::{
            ActiveModel as RestaurantActive, Column as RestaurantCol, Entity as Restaurants,
            Model as RestaurantModel,
        },
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    kv::cache::{hotel_menu_key, restaurant_menu_key},
    middleware::auth::{AuthUser, Role, ensure_admin, ensure_role},
    models::{Hotel, MenuItem, Restaurant},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::convert::{hotel_from_entity, menu_item_from_entity, restaurant_from_entity},
    state::AppState,
};

pub async fn list_restaurants(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<RestaurantList>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = Restaurants::find()
        .filter(RestaurantCol::IsOpen.eq(true))
        .order_by_asc(RestaurantCol::Name);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(restaurant_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        RestaurantList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn restaurant_menu(
    state: &AppState,
    restaurant_id: Uuid,
) -> AppResult<ApiResponse<RestaurantMenu>> {
    let key = restaurant_menu_key(restaurant_id);
    if let Some(menu) = state.cache.get_json::<RestaurantMenu>(&key).await {
        return Ok(ApiResponse::success("Ok", menu, Some(Meta::empty())));
    }

    let restaurant = Restaurants::find_by_id(restaurant_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let items = MenuItems::find()
        .filter(MenuCol::RestaurantId.eq(restaurant_id))
        .filter(MenuCol::IsAvailable.eq(true))
        .order_by_asc(MenuCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(menu_item_from_entity)
        .collect();

    let menu = RestaurantMenu {
        restaurant: restaurant_from_entity(restaurant),
        items,
    };
    state.cache.set_json(&key, &menu).await;

    Ok(ApiResponse::success("Ok", menu, Some(Meta::empty())))
}

pub async fn owned_restaurant(state: &AppState, user: &AuthUser) -> AppResult<RestaurantModel> {
    ensure_role(user, Role::Restaurant)?;
    Restaurants::find()
        .filter(RestaurantCol::OwnerId.eq(user.user_id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn owned_hotel(state: &AppState, user: &AuthUser) -> AppResult<HotelModel> {
    ensure_role(user, Role::Hotel)?;
    Hotels::find()
        .filter(HotelCol::OwnerId.eq(user.user_id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn create_menu_item(
    state: &AppState,
    user: &AuthUser,
    payload: CreateMenuItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    let restaurant = owned_restaurant(state, user).await?;
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }
    if payload.price < 0 {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }

    let item = MenuItemActive {
        id: Set(Uuid::new_v4()),
        restaurant_id: Set(restaurant.id),
        name: Set(name),
        description: Set(payload.description),
        price: Set(payload.price),
        is_available: Set(true),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    state.cache.invalidate(&restaurant_menu_key(restaurant.id)).await;
    audit::record(
        state,
        user.user_id,
        "menu_item_create",
        "menu_items",
        serde_json::json!({ "menu_item_id": item.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Menu item created",
        menu_item_from_entity(item),
        Some(Meta::empty()),
    ))
}

pub async fn update_menu_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateMenuItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    let restaurant = owned_restaurant(state, user).await?;
    let existing = MenuItems::find_by_id(id)
        .filter(MenuCol::RestaurantId.eq(restaurant.id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: MenuItemActive = existing.into();
    if let Some(name) = payload.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::BadRequest("name must not be empty".into()));
        }
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(price) = payload.price {
        if price < 0 {
            return Err(AppError::BadRequest("price must not be negative".into()));
        }
        active.price = Set(price);
    }
    if let Some(is_available) = payload.is_available {
        active.is_available = Set(is_available);
    }
    let item = active.update(&state.orm).await?;

    state.cache.invalidate(&restaurant_menu_key(restaurant.id)).await;
    audit::record(
        state,
        user.user_id,
        "menu_item_update",
        "menu_items",
        serde_json::json!({ "menu_item_id": item.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Menu item updated",
        menu_item_from_entity(item),
        Some(Meta::empty()),
    ))
}

async fn ensure_owner_role(state: &AppState, owner_id: Uuid, role: Role) -> AppResult<()> {
    let owner = Users::find_by_id(owner_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::BadRequest("owner not found".into()))?;
    if owner.role != role.as_str() {
        return Err(AppError::BadRequest(format!(
            "owner must have the {role} role"
        )));
    }
    Ok(())
}

pub async fn create_hotel(
    state: &AppState,
    user: &AuthUser,
    payload: CreateHotelRequest,
) -> AppResult<ApiResponse<Hotel>> {
    ensure_admin(user)?;
    let location = Coordinates::new(payload.latitude, payload.longitude)?;
    ensure_owner_role(state, payload.owner_id, Role::Hotel).await?;

    let hotel = HotelActive {
        id: Set(Uuid::new_v4()),
        owner_id: Set(payload.owner_id),
        name: Set(payload.name.trim().to_string()),
        address: Set(payload.address),
        latitude: Set(location.latitude),
        longitude: Set(location.longitude),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        user.user_id,
        "hotel_create",
        "hotels",
        serde_json::json!({ "hotel_id": hotel.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Hotel created",
        hotel_from_entity(hotel),
        Some(Meta::empty()),
    ))
}

pub async fn create_restaurant(
    state: &AppState,
    user: &AuthUser,
    payload: CreateRestaurantRequest,
) -> AppResult<ApiResponse<Restaurant>> {
    ensure_admin(user)?;
    let location = Coordinates::new(payload.latitude, payload.longitude)?;
    ensure_owner_role(state, payload.owner_id, Role::Restaurant).await?;

    let restaurant = RestaurantActive {
        id: Set(Uuid::new_v4()),
        owner_id: Set(payload.owner_id),
        name: Set(payload.name.trim().to_string()),
        address: Set(payload.address),
        latitude: Set(location.latitude),
        longitude: Set(location.longitude),
        is_open: Set(true),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        user.user_id,
        "restaurant_create",
        "restaurants",
        serde_json::json!({ "restaurant_id": restaurant.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Restaurant created",
        restaurant_from_entity(restaurant),
        Some(Meta::empty()),
    ))
}

/// Public landing for a scanned hotel QR code.
pub async fn hotel_menu(state: &AppState, reference: &str) -> AppResult<ApiResponse<HotelMenu>> {
    let hotel_id = qr::parse_hotel_ref(reference)
        .ok_or_else(|| AppError::BadRequest("Invalid hotel reference".into()))?;

    let key = hotel_menu_key(hotel_id);
    if let Some(menu) = state.cache.get_json::<HotelMenu>(&key).await {
        return Ok(ApiResponse::success("Ok", menu, Some(Meta::empty())));
    }

    let hotel = Hotels::find_by_id(hotel_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let restaurants = Restaurants::find()
        .filter(RestaurantCol::IsOpen.eq(true))
        .order_by_asc(RestaurantCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(restaurant_from_entity)
        .collect();

    let menu = HotelMenu {
        hotel: hotel_from_entity(hotel),
        restaurants,
    };
    state.cache.set_json(&key, &menu).await;

    Ok(ApiResponse::success("Ok", menu, Some(Meta::empty())))
}

pub async fn own_hotel_qr(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<HotelQr>> {
    let hotel = owned_hotel(state, user).await?;
    Ok(ApiResponse::success(
        "Ok",
        hotel_qr(state, hotel.id),
        Some(Meta::empty()),
    ))
}

pub async fn admin_hotel_qr(
    state: &AppState,
    user: &AuthUser,
    hotel_id: Uuid,
) -> AppResult<ApiResponse<HotelQr>> {
    ensure_admin(user)?;
    let hotel = Hotels::find_by_id(hotel_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success(
        "Ok",
        hotel_qr(state, hotel.id),
        Some(Meta::empty()),
    ))
}

fn hotel_qr(state: &AppState, hotel_id: Uuid) -> HotelQr {
    HotelQr {
        hotel_id,
        url: qr::hotel_menu_url(&state.config.frontend_base_url, hotel_id),
    }
}
