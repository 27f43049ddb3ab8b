use sqlx::{FromRow, PgConnection};
use uuid::Uuid;

use crate::{
    audit,
    domain::{order_status::PaymentMethod, settlement::SettlementLedger},
    dto::settlement::{HotelSettlement, RecordSettlementRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::SettlementPayment,
    response::{ApiResponse, Meta},
    services::catalog_service::owned_hotel,
    state::AppState,
};

#[derive(Debug, FromRow)]
struct CollectedTotals {
    cash_collected: i64,
    commission_due: i64,
    order_count: i64,
}

async fn ledger_for(conn: &mut PgConnection, hotel_id: Uuid) -> AppResult<SettlementLedger> {
    let totals = sqlx::query_as::<_, CollectedTotals>(
        r#"
        SELECT COALESCE(SUM(total_amount), 0)::BIGINT AS cash_collected,
               COALESCE(SUM(admin_commission), 0)::BIGINT AS commission_due,
               COUNT(*) AS order_count
        FROM orders
        WHERE hotel_id = $1
          AND payment_method = $2
          AND commission_distributed
        "#,
    )
    .bind(hotel_id)
    .bind(PaymentMethod::PayAtHotel.as_str())
    .fetch_one(&mut *conn)
    .await?;

    let (paid,): (i64,) = sqlx::query_as(
        "SELECT COALESCE(SUM(amount), 0)::BIGINT FROM settlement_payments WHERE hotel_id = $1",
    )
    .bind(hotel_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(SettlementLedger::from_totals(
        totals.cash_collected,
        totals.commission_due,
        paid,
        totals.order_count,
    ))
}

async fn hotel_exists(conn: &mut PgConnection, hotel_id: Uuid, lock: bool) -> AppResult<()> {
    let sql = if lock {
        "SELECT id FROM hotels WHERE id = $1 FOR UPDATE"
    } else {
        "SELECT id FROM hotels WHERE id = $1"
    };
    let found: Option<(Uuid,)> = sqlx::query_as(sql)
        .bind(hotel_id)
        .fetch_optional(&mut *conn)
        .await?;
    found.map(|_| ()).ok_or(AppError::NotFound)
}

async fn settlement_of(state: &AppState, hotel_id: Uuid) -> AppResult<HotelSettlement> {
    let mut conn = state.pool.acquire().await?;
    hotel_exists(&mut conn, hotel_id, false).await?;
    let ledger = ledger_for(&mut conn, hotel_id).await?;
    Ok(HotelSettlement {
        hotel_id,
        summary: ledger.summary(),
    })
}

pub async fn own_settlement(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<HotelSettlement>> {
    let hotel = owned_hotel(state, user).await?;
    Ok(ApiResponse::success(
        "Settlement",
        settlement_of(state, hotel.id).await?,
        Some(Meta::empty()),
    ))
}

pub async fn hotel_settlement(
    state: &AppState,
    user: &AuthUser,
    hotel_id: Uuid,
) -> AppResult<ApiResponse<HotelSettlement>> {
    ensure_admin(user)?;
    Ok(ApiResponse::success(
        "Settlement",
        settlement_of(state, hotel_id).await?,
        Some(Meta::empty()),
    ))
}

pub async fn record_settlement(
    state: &AppState,
    user: &AuthUser,
    hotel_id: Uuid,
    payload: RecordSettlementRequest,
) -> AppResult<ApiResponse<SettlementPayment>> {
    ensure_admin(user)?;
    let mut tx = state.pool.begin().await?;

    // The hotel row lock serialises concurrent payments for the same hotel.
    hotel_exists(&mut tx, hotel_id, true).await?;
    let ledger = ledger_for(&mut tx, hotel_id).await?;
    ledger.check_payment(payload.amount)?;

    let payment = sqlx::query_as::<_, SettlementPayment>(
        r#"
        INSERT INTO settlement_payments (id, hotel_id, amount, note, recorded_by)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, hotel_id, amount, note, recorded_by, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(hotel_id)
    .bind(payload.amount)
    .bind(payload.note.as_deref())
    .bind(user.user_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        hotel_id = %hotel_id,
        amount = payment.amount,
        remaining = ledger.remaining() - payment.amount,
        "settlement payment recorded"
    );
    audit::record(
        state,
        user.user_id,
        "settlement_record",
        "settlement_payments",
        serde_json::json!({ "hotel_id": hotel_id, "amount": payment.amount }),
    )
    .await;

    Ok(ApiResponse::success(
        "Settlement recorded",
        payment,
        Some(Meta::empty()),
    ))
}
