//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::{AdminUser, CurrentUser};
use crate::core::ServerState;
use crate::db::repository::{order, user};
use crate::utils::time::{format_date, local_date_of, parse_date};
use crate::utils::{AppError, AppResult};
use crate::views;
use shared::models::{
    BaggingPerson, CookingRow, ManualOrderCreate, ManualOrderUpdate, Order, OrderCreate,
    OrderDetail, OrderWithUser, PaymentRow, PaymentUpdate,
};

#[derive(Deserialize)]
pub struct DateParam {
    pub date: String,
}

#[derive(Deserialize)]
pub struct OptionalDateParam {
    pub date: Option<String>,
}

/// POST /api/orders - customer checkout. The caller's mirror row is
/// refreshed from the validated claims; the total is re-derived
/// server-side from the current catalog.
pub async fn create_order(
    caller: CurrentUser,
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    payload.validate()?;
    user::upsert(
        &state.db.pool,
        caller.id,
        &caller.name,
        caller.phone_number.as_deref(),
        caller.is_anonymous,
        caller.role,
    )
    .await?;
    let order = order::create(&state.db.pool, caller.id, &payload.lines).await?;
    Ok(Json(order))
}

/// POST /api/orders/manual (admin) - order on a customer's behalf
pub async fn create_manual_order(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Json(payload): Json<ManualOrderCreate>,
) -> AppResult<Json<Order>> {
    payload.validate()?;
    let order = order::create_manual(&state.db.pool, &payload).await?;
    Ok(Json(order))
}

/// PUT /api/orders/manual/{id} (admin) - replace the full item set
pub async fn update_manual_order(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ManualOrderUpdate>,
) -> AppResult<Json<Order>> {
    payload.validate()?;
    let order = order::update_manual(&state.db.pool, id, &payload.lines).await?;
    Ok(Json(order))
}

/// DELETE /api/orders/{id} (admin) - hard delete, cascading
pub async fn delete_order(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let deleted = order::delete(&state.db.pool, id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Order {id}")));
    }
    Ok(Json(true))
}

/// GET /api/orders?date= - orders, optionally narrowed to a local day
pub async fn get_orders(
    State(state): State<ServerState>,
    Query(params): Query<OptionalDateParam>,
) -> AppResult<Json<Vec<OrderWithUser>>> {
    let date = params.date.as_deref().map(parse_date).transpose()?;
    let orders = order::list(&state.db.pool, date).await?;
    Ok(Json(orders))
}

/// GET /api/orders/{id} - detail with frozen line prices
pub async fn get_order(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderDetail>> {
    let detail = order::detail(&state.db.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id}")))?;
    Ok(Json(detail))
}

/// GET /api/orders/dates - local days that have orders, newest first
pub async fn get_dates_with_orders(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<String>>> {
    let instants = order::dates_with_orders(&state.db.pool).await?;
    let mut days: Vec<String> = Vec::with_capacity(instants.len());
    for millis in instants {
        let day = local_date_of(millis)
            .map(format_date)
            .ok_or_else(|| AppError::internal("stored entry date out of range"))?;
        if days.last() != Some(&day) {
            days.push(day);
        }
    }
    Ok(Json(days))
}

// ── Payments ────────────────────────────────────────────────────────────

/// PUT /api/orders/{id}/payment (admin) - set cents_paid in [0, total]
pub async fn update_payment(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<PaymentUpdate>,
) -> AppResult<Json<Order>> {
    let order = order::update_payment(&state.db.pool, id, payload.cents_paid).await?;
    Ok(Json(order))
}

/// POST /api/orders/{id}/paid-in-full (admin)
pub async fn mark_paid_in_full(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let order = order::mark_paid_in_full(&state.db.pool, id).await?;
    Ok(Json(order))
}

// ── Views ───────────────────────────────────────────────────────────────

/// GET /api/orders/views/cooking?date=
pub async fn get_cooking_view(
    State(state): State<ServerState>,
    Query(params): Query<DateParam>,
) -> AppResult<Json<Vec<CookingRow>>> {
    let date = parse_date(&params.date)?;
    let details = order::item_details_for_day(&state.db.pool, date).await?;
    Ok(Json(views::cooking_view(&details)))
}

/// GET /api/orders/views/bagging?date=
pub async fn get_bagging_view(
    State(state): State<ServerState>,
    Query(params): Query<DateParam>,
) -> AppResult<Json<Vec<BaggingPerson>>> {
    let date = parse_date(&params.date)?;
    let details = order::item_details_for_day(&state.db.pool, date).await?;
    Ok(Json(views::bagging_view(&details)))
}

/// GET /api/orders/views/payment?date=
pub async fn get_payment_view(
    State(state): State<ServerState>,
    Query(params): Query<DateParam>,
) -> AppResult<Json<Vec<PaymentRow>>> {
    let date = parse_date(&params.date)?;
    let sources = order::payment_sources_for_day(&state.db.pool, date).await?;
    Ok(Json(views::payment_view(&sources)))
}

#[derive(Serialize)]
pub struct BaggedResult {
    pub updated: u64,
}

/// POST /api/orders/bagging/{user_id}/mark?date= (admin) - one batch
/// update over every unbagged item of the (user, day) pair
pub async fn mark_person_bagged(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
    Query(params): Query<DateParam>,
) -> AppResult<Json<BaggedResult>> {
    let date = parse_date(&params.date)?;
    let updated = order::mark_person_bagged(&state.db.pool, user_id, date).await?;
    Ok(Json(BaggedResult { updated }))
}

/// POST /api/orders/bagging/{user_id}/unmark?date= (admin)
pub async fn unmark_person_bagged(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
    Query(params): Query<DateParam>,
) -> AppResult<Json<BaggedResult>> {
    let date = parse_date(&params.date)?;
    let updated = order::unmark_person_bagged(&state.db.pool, user_id, date).await?;
    Ok(Json(BaggedResult { updated }))
}
