//! Menu Calendar API Handlers
//!
//! Dates in paths and query strings are local `YYYY-MM-DD` strings.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::db::repository::menu_entry;
use crate::utils::time::{format_date, local_date_of, parse_date};
use crate::utils::{AppError, AppResult};
use shared::models::{CustomMenuEntryCreate, MenuDaySave, MenuEntry, MenuEntryFull};

/// GET /api/menu/{date} - the public menu for one local day
pub async fn get_by_date(
    State(state): State<ServerState>,
    Path(date): Path<String>,
) -> AppResult<Json<Vec<MenuEntryFull>>> {
    let date = parse_date(&date)?;
    let entries = menu_entry::list_for_day(&state.db.pool, date).await?;
    Ok(Json(entries))
}

#[derive(Deserialize)]
pub struct RangeParams {
    pub from: String,
    pub to: String,
}

/// GET /api/menu/range?from=&to= - entries grouped by local day
pub async fn get_by_date_range(
    State(state): State<ServerState>,
    Query(params): Query<RangeParams>,
) -> AppResult<Json<BTreeMap<String, Vec<MenuEntryFull>>>> {
    let from = parse_date(&params.from)?;
    let to = parse_date(&params.to)?;
    let entries = menu_entry::list_for_range(&state.db.pool, from, to).await?;

    let mut by_day: BTreeMap<String, Vec<MenuEntryFull>> = BTreeMap::new();
    for entry in entries {
        let day = local_date_of(entry.entry.date)
            .map(format_date)
            .ok_or_else(|| AppError::internal("stored entry date out of range"))?;
        by_day.entry(day).or_default().push(entry);
    }
    Ok(Json(by_day))
}

/// PUT /api/menu/{date} (admin) - replace the day's normal entries
pub async fn save(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Path(date): Path<String>,
    Json(payload): Json<MenuDaySave>,
) -> AppResult<Json<Vec<MenuEntryFull>>> {
    let date = parse_date(&date)?;
    menu_entry::save_day(&state.db.pool, date, payload).await?;
    let entries = menu_entry::list_for_day(&state.db.pool, date).await?;
    Ok(Json(entries))
}

/// POST /api/menu/custom (admin) - ad hoc entry backing a manual order
pub async fn create_custom_entry(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Json(payload): Json<CustomMenuEntryCreate>,
) -> AppResult<Json<MenuEntry>> {
    let date = parse_date(&payload.date)?;
    let entry = menu_entry::create_custom(&state.db.pool, date, payload.menu_item_id).await?;
    Ok(Json(entry))
}

/// POST /api/menu/entries/{id}/convert (admin) - custom -> normal
pub async fn convert_custom_to_normal(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MenuEntry>> {
    let entry = menu_entry::convert_custom_to_normal(&state.db.pool, id).await?;
    Ok(Json(entry))
}
