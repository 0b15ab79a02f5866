//! Modifier Group API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::db::repository::modifier_group;
use crate::utils::{AppError, AppResult};
use shared::models::{
    ModifierGroupCreate, ModifierGroupFull, ModifierGroupUpdate, ModifierOption,
    ModifierOptionCreate, ModifierOptionUpdate,
};

/// GET /api/modifier-groups - active groups with active options
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<ModifierGroupFull>>> {
    let groups = modifier_group::list_full(&state.db.pool).await?;
    Ok(Json(groups))
}

/// GET /api/modifier-groups/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ModifierGroupFull>> {
    let group = modifier_group::get_full(&state.db.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Modifier group {id}")))?;
    Ok(Json(group))
}

/// POST /api/modifier-groups (admin)
pub async fn create(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Json(payload): Json<ModifierGroupCreate>,
) -> AppResult<Json<ModifierGroupFull>> {
    payload.validate()?;
    let group = modifier_group::create(&state.db.pool, payload).await?;
    Ok(Json(group))
}

/// PUT /api/modifier-groups/{id} (admin)
pub async fn update(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ModifierGroupUpdate>,
) -> AppResult<Json<ModifierGroupFull>> {
    payload.validate()?;
    let group = modifier_group::update(&state.db.pool, id, payload).await?;
    Ok(Json(group))
}

/// DELETE /api/modifier-groups/{id} (admin, soft; options go with it)
pub async fn delete(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let deleted = modifier_group::delete(&state.db.pool, id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Modifier group {id}")));
    }
    Ok(Json(true))
}

/// POST /api/modifier-groups/{id}/options (admin)
pub async fn add_option(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ModifierOptionCreate>,
) -> AppResult<Json<ModifierOption>> {
    payload.validate()?;
    let option = modifier_group::add_option(&state.db.pool, id, payload).await?;
    Ok(Json(option))
}

/// PUT /api/modifier-groups/options/{option_id} (admin)
pub async fn update_option(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Path(option_id): Path<i64>,
    Json(payload): Json<ModifierOptionUpdate>,
) -> AppResult<Json<ModifierOption>> {
    payload.validate()?;
    let option = modifier_group::update_option(&state.db.pool, option_id, payload).await?;
    Ok(Json(option))
}

/// DELETE /api/modifier-groups/options/{option_id} (admin, soft)
pub async fn delete_option(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Path(option_id): Path<i64>,
) -> AppResult<Json<bool>> {
    let deleted = modifier_group::delete_option(&state.db.pool, option_id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Modifier option {option_id}")));
    }
    Ok(Json(true))
}
