//! Menu Item API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::db::repository::menu_item;
use crate::utils::{AppError, AppResult};
use shared::models::{ItemModifierGroupsSet, MenuItem, MenuItemCreate, MenuItemFull, MenuItemUpdate};

/// GET /api/menu-items - active items with their modifier groups
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<MenuItemFull>>> {
    let items = menu_item::list_full(&state.db.pool).await?;
    Ok(Json(items))
}

/// GET /api/menu-items/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MenuItem>> {
    let item = menu_item::get(&state.db.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {id}")))?;
    Ok(Json(item))
}

/// POST /api/menu-items (admin)
pub async fn create(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<MenuItem>> {
    payload.validate()?;
    let item = menu_item::create(&state.db.pool, payload).await?;
    Ok(Json(item))
}

/// PUT /api/menu-items/{id} (admin)
pub async fn update(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    payload.validate()?;
    let item = menu_item::update(&state.db.pool, id, payload).await?;
    Ok(Json(item))
}

/// DELETE /api/menu-items/{id} (admin, soft)
pub async fn delete(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let deleted = menu_item::delete(&state.db.pool, id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Menu item {id}")));
    }
    Ok(Json(true))
}

/// PUT /api/menu-items/{id}/modifier-groups (admin) - replace assignments
pub async fn set_modifier_groups(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ItemModifierGroupsSet>,
) -> AppResult<Json<bool>> {
    menu_item::set_modifier_groups(&state.db.pool, id, &payload.group_ids).await?;
    Ok(Json(true))
}
