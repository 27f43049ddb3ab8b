use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    domain::money::order_total,
    dto::cart::{AddToCartRequest, CartItemDto, CartList},
    entity::{
        cart_items::{ActiveModel as CartActive, Column as CartCol, Entity as CartItems},
        menu_items::Entity as MenuItems,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::CartItem,
    response::{ApiResponse, Meta},
    services::convert::{cart_item_from_entity, menu_item_from_entity},
    state::AppState,
};

pub async fn list_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartList>> {
    let rows = CartItems::find()
        .find_also_related(MenuItems)
        .filter(CartCol::UserId.eq(user.user_id))
        .order_by_desc(CartCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let mut items = Vec::with_capacity(rows.len());
    for (cart_item, menu_item) in rows {
        let Some(menu_item) = menu_item else { continue };
        items.push(CartItemDto {
            id: cart_item.id,
            menu_item: menu_item_from_entity(menu_item),
            quantity: cart_item.quantity,
        });
    }

    let total_amount = order_total(
        items
            .iter()
            .map(|item| (item.quantity, item.menu_item.price)),
    )
    .ok_or_else(|| AppError::BadRequest("Cart total is too large".into()))?;

    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "OK",
        CartList {
            items,
            total_amount,
        },
        Some(Meta::new(1, total, total)),
    ))
}

pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartItem>> {
    if payload.quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let menu_item = MenuItems::find_by_id(payload.menu_item_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::BadRequest("menu item not found".to_string()))?;
    if !menu_item.is_available {
        return Err(AppError::BadRequest("menu item is not available".to_string()));
    }

    // A cart is bound to a single restaurant.
    let current = CartItems::find()
        .find_also_related(MenuItems)
        .filter(CartCol::UserId.eq(user.user_id))
        .all(&state.orm)
        .await?;
    let mixed = current.iter().any(|(_, item)| {
        item.as_ref()
            .is_some_and(|item| item.restaurant_id != menu_item.restaurant_id)
    });
    if mixed {
        return Err(AppError::Conflict(
            "cart already holds items from another restaurant".to_string(),
        ));
    }

    let existing = current
        .into_iter()
        .map(|(cart_item, _)| cart_item)
        .find(|cart_item| cart_item.menu_item_id == payload.menu_item_id);

    let cart_item = match existing {
        Some(cart_item) => {
            let mut active: CartActive = cart_item.into();
            active.quantity = Set(payload.quantity);
            active.update(&state.orm).await?
        }
        None => {
            CartActive {
                id: Set(Uuid::new_v4()),
                user_id: Set(user.user_id),
                menu_item_id: Set(payload.menu_item_id),
                quantity: Set(payload.quantity),
                created_at: NotSet,
            }
            .insert(&state.orm)
            .await?
        }
    };

    audit::record(
        state,
        user.user_id,
        "cart_update",
        "cart_items",
        serde_json::json!({ "menu_item_id": payload.menu_item_id, "quantity": payload.quantity }),
    )
    .await;

    Ok(ApiResponse::success(
        "OK",
        cart_item_from_entity(cart_item),
        Some(Meta::empty()),
    ))
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = CartItems::delete_many()
        .filter(
            Condition::all()
                .add(CartCol::Id.eq(id))
                .add(CartCol::UserId.eq(user.user_id)),
        )
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        state,
        user.user_id,
        "cart_remove",
        "cart_items",
        serde_json::json!({ "cart_item_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Removed from cart",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
