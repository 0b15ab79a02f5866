//! Menu Item Repository

use std::collections::HashMap;

use super::{RepoError, RepoResult};
use shared::models::{
    MenuItem, MenuItemCreate, MenuItemFull, MenuItemUpdate, ModifierGroup, ModifierGroupFull,
    ModifierOption,
};
use shared::util::now_millis;
use sqlx::SqlitePool;

const ITEM_COLUMNS: &str = "id, name, description, base_price, created_at, updated_at, deleted_at";

pub async fn list(pool: &SqlitePool) -> RepoResult<Vec<MenuItem>> {
    let items = sqlx::query_as::<_, MenuItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM menu_item WHERE deleted_at IS NULL ORDER BY name",
    ))
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Active items with their assigned modifier groups and options.
pub async fn list_full(pool: &SqlitePool) -> RepoResult<Vec<MenuItemFull>> {
    let items = list(pool).await?;
    let ids: Vec<i64> = items.iter().map(|i| i.id).collect();
    let mut groups = groups_for_items(pool, &ids).await?;
    Ok(items
        .into_iter()
        .map(|item| {
            let modifier_groups = groups.remove(&item.id).unwrap_or_default();
            MenuItemFull { item, modifier_groups }
        })
        .collect())
}

pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<Option<MenuItem>> {
    let item = sqlx::query_as::<_, MenuItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM menu_item WHERE id = ? AND deleted_at IS NULL",
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(item)
}

pub async fn create(pool: &SqlitePool, data: MenuItemCreate) -> RepoResult<MenuItem> {
    if data.base_price < 0 {
        return Err(RepoError::Validation("base_price must be >= 0".into()));
    }
    let now = now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO menu_item (name, description, base_price, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?4) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.base_price)
    .bind(now)
    .fetch_one(pool)
    .await?;

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create menu item".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: MenuItemUpdate) -> RepoResult<MenuItem> {
    if data.base_price.is_some_and(|p| p < 0) {
        return Err(RepoError::Validation("base_price must be >= 0".into()));
    }
    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE menu_item SET \
             name = COALESCE(?1, name), \
             description = COALESCE(?2, description), \
             base_price = COALESCE(?3, base_price), \
             updated_at = ?4 \
         WHERE id = ?5 AND deleted_at IS NULL",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.base_price)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu item {id} not found")));
    }

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu item {id} not found")))
}

/// Soft delete. The row stays for historical order references.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = now_millis();
    let rows = sqlx::query("UPDATE menu_item SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL")
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Replace the item's modifier group assignments; list order is display
/// order.
pub async fn set_modifier_groups(
    pool: &SqlitePool,
    item_id: i64,
    group_ids: &[i64],
) -> RepoResult<()> {
    if get(pool, item_id).await?.is_none() {
        return Err(RepoError::NotFound(format!("Menu item {item_id} not found")));
    }
    for group_id in group_ids {
        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM modifier_group WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(group_id)
        .fetch_one(pool)
        .await?;
        if exists == 0 {
            return Err(RepoError::NotFound(format!(
                "Modifier group {group_id} not found"
            )));
        }
    }

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM item_modifier_group WHERE menu_item_id = ?")
        .bind(item_id)
        .execute(&mut *tx)
        .await?;
    for (sort_order, group_id) in group_ids.iter().enumerate() {
        sqlx::query(
            "INSERT INTO item_modifier_group (menu_item_id, group_id, sort_order) VALUES (?1, ?2, ?3)",
        )
        .bind(item_id)
        .bind(group_id)
        .bind(sort_order as i64)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(())
}

/// Active modifier groups (with active options) for a set of items,
/// keyed by item ID. Shared by the item detail and the menu-by-date
/// assembly.
pub async fn groups_for_items(
    pool: &SqlitePool,
    item_ids: &[i64],
) -> RepoResult<HashMap<i64, Vec<ModifierGroupFull>>> {
    let mut result: HashMap<i64, Vec<ModifierGroupFull>> = HashMap::new();
    if item_ids.is_empty() {
        return Ok(result);
    }

    #[derive(sqlx::FromRow)]
    struct BindingRow {
        menu_item_id: i64,
        id: i64,
        name: String,
        min_select: i64,
        max_select: Option<i64>,
        created_at: i64,
        updated_at: i64,
        deleted_at: Option<i64>,
    }

    let mut qb = sqlx::QueryBuilder::new(
        "SELECT img.menu_item_id, g.id, g.name, g.min_select, g.max_select, \
                g.created_at, g.updated_at, g.deleted_at \
         FROM item_modifier_group img \
         JOIN modifier_group g ON g.id = img.group_id \
         WHERE g.deleted_at IS NULL AND img.menu_item_id IN (",
    );
    let mut sep = qb.separated(", ");
    for id in item_ids {
        sep.push_bind(id);
    }
    qb.push(") ORDER BY img.menu_item_id, img.sort_order");
    let bindings: Vec<BindingRow> = qb.build_query_as().fetch_all(pool).await?;

    let group_ids: Vec<i64> = bindings.iter().map(|b| b.id).collect();
    let options_by_group = options_for_groups(pool, &group_ids).await?;

    for b in bindings {
        let group = ModifierGroup {
            id: b.id,
            name: b.name,
            min_select: b.min_select,
            max_select: b.max_select,
            created_at: b.created_at,
            updated_at: b.updated_at,
            deleted_at: b.deleted_at,
        };
        // A group may be bound to several items; clone rather than move
        let options = options_by_group.get(&b.id).cloned().unwrap_or_default();
        result
            .entry(b.menu_item_id)
            .or_default()
            .push(ModifierGroupFull { group, options });
    }
    Ok(result)
}

/// Active options for a set of groups, keyed by group ID.
pub async fn options_for_groups(
    pool: &SqlitePool,
    group_ids: &[i64],
) -> RepoResult<HashMap<i64, Vec<ModifierOption>>> {
    let mut result: HashMap<i64, Vec<ModifierOption>> = HashMap::new();
    if group_ids.is_empty() {
        return Ok(result);
    }

    let mut qb = sqlx::QueryBuilder::new(
        "SELECT id, group_id, name, price_delta, sort_order, created_at, updated_at, deleted_at \
         FROM modifier_option WHERE deleted_at IS NULL AND group_id IN (",
    );
    let mut sep = qb.separated(", ");
    for id in group_ids {
        sep.push_bind(id);
    }
    qb.push(") ORDER BY group_id, sort_order, id");
    let options: Vec<ModifierOption> = qb.build_query_as().fetch_all(pool).await?;

    for option in options {
        result.entry(option.group_id).or_default().push(option);
    }
    Ok(result)
}
