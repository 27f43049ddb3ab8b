use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, Set, TransactionTrait};
use uuid::Uuid;

use crate::{
    audit,
    domain::order_status::{Actor, OrderStatus},
    dto::{
        auth::UpdateRoleRequest,
        orders::{OrderList, OrderWithItems},
    },
    entity::{
        orders::{Column as OrderCol, Entity as Orders},
        users::{ActiveModel as UserActive, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::User,
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    services::{
        lifecycle::{apply_transition, by_id, find_order_for_update, with_items},
        convert::user_from_entity,
        order_service::paginate_orders,
    },
    state::AppState,
};

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    let mut condition = Condition::all();
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status.as_str()));
    }
    paginate_orders(state, condition, &query, "Orders").await
}

pub async fn get_order_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_admin(user)?;
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success(
        "Order found",
        with_items(&state.orm, order).await?,
        Some(Meta::empty()),
    ))
}

pub async fn cancel_order_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;
    let order = find_order_for_update(&txn, by_id(id)).await?;
    let order = apply_transition(
        &txn,
        order,
        OrderStatus::Cancelled,
        Actor::Admin,
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
        serde_json::json!({ "order_id": id, "by": "admin" }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order cancelled",
        data,
        Some(Meta::empty()),
    ))
}

/// Grants a staff role to a registered account. Hotels and restaurants can only
/// be created for owners holding the matching role.
pub async fn update_user_role(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateRoleRequest,
) -> AppResult<ApiResponse<User>> {
    ensure_admin(user)?;
    if id == user.user_id {
        return Err(AppError::BadRequest("Admins cannot change their own role".into()));
    }

    let target = Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let previous = target.role.clone();

    let mut active: UserActive = target.into();
    active.role = Set(payload.role.as_str().to_string());
    let updated = active.update(&state.orm).await?;
    tracing::info!(user_id = %id, from = %previous, to = %payload.role, "user role changed");

    audit::record(
        state,
        user.user_id,
        "user_role_update",
        "users",
        serde_json::json!({ "user_id": id, "from": previous, "to": payload.role.as_str() }),
    )
    .await;

    Ok(ApiResponse::success(
        "Role updated",
        user_from_entity(updated),
        Some(Meta::empty()),
    ))
}
