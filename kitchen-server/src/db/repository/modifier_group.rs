//! Modifier Group Repository
//!
//! Groups and options soft-delete so historical order lines keep their
//! references. `(group_id, name)` is unique among non-deleted options
//! (partial index); the unique-violation surfaces as `Duplicate`.

use super::{menu_item, RepoError, RepoResult};
use shared::models::{
    ModifierGroup, ModifierGroupCreate, ModifierGroupFull, ModifierGroupUpdate, ModifierOption,
    ModifierOptionCreate, ModifierOptionUpdate,
};
use shared::util::now_millis;
use sqlx::SqlitePool;

const GROUP_COLUMNS: &str = "id, name, min_select, max_select, created_at, updated_at, deleted_at";
const OPTION_COLUMNS: &str =
    "id, group_id, name, price_delta, sort_order, created_at, updated_at, deleted_at";

/// min/max invariant, checked at write time (not left to the schema)
fn check_select_bounds(min_select: i64, max_select: Option<i64>) -> RepoResult<()> {
    if min_select < 0 {
        return Err(RepoError::Validation("min_select must be >= 0".into()));
    }
    if let Some(max) = max_select
        && max < min_select
    {
        return Err(RepoError::Validation(format!(
            "max_select ({max}) must be >= min_select ({min_select})"
        )));
    }
    Ok(())
}

pub async fn list_full(pool: &SqlitePool) -> RepoResult<Vec<ModifierGroupFull>> {
    let groups = sqlx::query_as::<_, ModifierGroup>(&format!(
        "SELECT {GROUP_COLUMNS} FROM modifier_group WHERE deleted_at IS NULL ORDER BY name",
    ))
    .fetch_all(pool)
    .await?;

    let group_ids: Vec<i64> = groups.iter().map(|g| g.id).collect();
    let mut options_by_group = menu_item::options_for_groups(pool, &group_ids).await?;

    Ok(groups
        .into_iter()
        .map(|group| {
            let options = options_by_group.remove(&group.id).unwrap_or_default();
            ModifierGroupFull { group, options }
        })
        .collect())
}

pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<Option<ModifierGroup>> {
    let group = sqlx::query_as::<_, ModifierGroup>(&format!(
        "SELECT {GROUP_COLUMNS} FROM modifier_group WHERE id = ? AND deleted_at IS NULL",
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(group)
}

pub async fn get_full(pool: &SqlitePool, id: i64) -> RepoResult<Option<ModifierGroupFull>> {
    let Some(group) = get(pool, id).await? else {
        return Ok(None);
    };
    let mut options_by_group = menu_item::options_for_groups(pool, &[id]).await?;
    Ok(Some(ModifierGroupFull {
        group,
        options: options_by_group.remove(&id).unwrap_or_default(),
    }))
}

pub async fn create(pool: &SqlitePool, data: ModifierGroupCreate) -> RepoResult<ModifierGroupFull> {
    let min_select = data.min_select.unwrap_or(0);
    check_select_bounds(min_select, data.max_select)?;

    let now = now_millis();
    let mut tx = pool.begin().await?;
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO modifier_group (name, min_select, max_select, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?4) RETURNING id",
    )
    .bind(&data.name)
    .bind(min_select)
    .bind(data.max_select)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    for (idx, option) in data.options.iter().enumerate() {
        sqlx::query(
            "INSERT INTO modifier_option (group_id, name, price_delta, sort_order, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        )
        .bind(id)
        .bind(&option.name)
        .bind(option.price_delta.unwrap_or(0))
        .bind(option.sort_order.unwrap_or(idx as i64))
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    get_full(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create modifier group".into()))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: ModifierGroupUpdate,
) -> RepoResult<ModifierGroupFull> {
    let stored = get(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Modifier group {id} not found")))?;

    // Validate the effective bounds after applying the patch
    let min_select = data.min_select.unwrap_or(stored.min_select);
    let max_select = match data.max_select {
        Some(explicit) => explicit,
        None => stored.max_select,
    };
    check_select_bounds(min_select, max_select)?;

    let now = now_millis();
    sqlx::query(
        "UPDATE modifier_group SET name = COALESCE(?1, name), min_select = ?2, max_select = ?3, updated_at = ?4 \
         WHERE id = ?5 AND deleted_at IS NULL",
    )
    .bind(&data.name)
    .bind(min_select)
    .bind(max_select)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    get_full(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Modifier group {id} not found")))
}

/// Soft delete the group and its options, and detach it from items.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = now_millis();
    let mut tx = pool.begin().await?;
    let rows = sqlx::query(
        "UPDATE modifier_group SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
    )
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Ok(false);
    }
    sqlx::query("UPDATE modifier_option SET deleted_at = ?1 WHERE group_id = ?2 AND deleted_at IS NULL")
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM item_modifier_group WHERE group_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(true)
}

// ── Options ─────────────────────────────────────────────────────────────

pub async fn add_option(
    pool: &SqlitePool,
    group_id: i64,
    data: ModifierOptionCreate,
) -> RepoResult<ModifierOption> {
    if get(pool, group_id).await?.is_none() {
        return Err(RepoError::NotFound(format!(
            "Modifier group {group_id} not found"
        )));
    }
    let now = now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO modifier_option (group_id, name, price_delta, sort_order, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?5) RETURNING id",
    )
    .bind(group_id)
    .bind(&data.name)
    .bind(data.price_delta.unwrap_or(0))
    .bind(data.sort_order.unwrap_or(0))
    .bind(now)
    .fetch_one(pool)
    .await?;

    get_option(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create modifier option".into()))
}

pub async fn get_option(pool: &SqlitePool, id: i64) -> RepoResult<Option<ModifierOption>> {
    let option = sqlx::query_as::<_, ModifierOption>(&format!(
        "SELECT {OPTION_COLUMNS} FROM modifier_option WHERE id = ? AND deleted_at IS NULL",
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(option)
}

pub async fn update_option(
    pool: &SqlitePool,
    id: i64,
    data: ModifierOptionUpdate,
) -> RepoResult<ModifierOption> {
    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE modifier_option SET \
             name = COALESCE(?1, name), \
             price_delta = COALESCE(?2, price_delta), \
             sort_order = COALESCE(?3, sort_order), \
             updated_at = ?4 \
         WHERE id = ?5 AND deleted_at IS NULL",
    )
    .bind(&data.name)
    .bind(data.price_delta)
    .bind(data.sort_order)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Modifier option {id} not found"
        )));
    }
    get_option(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Modifier option {id} not found")))
}

pub async fn delete_option(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE modifier_option SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
