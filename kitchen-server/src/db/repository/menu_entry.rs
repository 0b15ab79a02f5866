//! Menu Entry Repository
//!
//! Day-keyed placements of catalog items. The save operation diffs the
//! submitted item list against the stored entries for that day; custom
//! entries exist only to back manual orders and never appear on the
//! public calendar.

use std::collections::{HashMap, HashSet};

use super::{menu_item, RepoError, RepoResult};
use chrono::NaiveDate;
use shared::models::{MenuDaySave, MenuEntry, MenuEntryFull, MenuItem};
use shared::util::now_millis;
use sqlx::SqlitePool;

use crate::utils::time::{local_day_bounds, local_midnight_millis};

const ENTRY_COLUMNS: &str = "id, date, menu_item_id, sort_order, is_custom, created_at";

pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<Option<MenuEntry>> {
    let entry =
        sqlx::query_as::<_, MenuEntry>(&format!("SELECT {ENTRY_COLUMNS} FROM menu_entry WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(entry)
}

/// Public menu for one local day: normal entries whose item is still
/// active, with the item's modifier groups and options.
pub async fn list_for_day(pool: &SqlitePool, date: NaiveDate) -> RepoResult<Vec<MenuEntryFull>> {
    let (start, end) = local_day_bounds(date).map_err(|e| RepoError::Validation(e.to_string()))?;
    list_between(pool, start, end).await
}

/// Public menu across an inclusive local date range.
pub async fn list_for_range(
    pool: &SqlitePool,
    from: NaiveDate,
    to: NaiveDate,
) -> RepoResult<Vec<MenuEntryFull>> {
    if from > to {
        return Err(RepoError::Validation("from must be <= to".into()));
    }
    let (start, _) = local_day_bounds(from).map_err(|e| RepoError::Validation(e.to_string()))?;
    let (_, end) = local_day_bounds(to).map_err(|e| RepoError::Validation(e.to_string()))?;
    list_between(pool, start, end).await
}

async fn list_between(pool: &SqlitePool, start: i64, end: i64) -> RepoResult<Vec<MenuEntryFull>> {
    #[derive(sqlx::FromRow)]
    struct Row {
        id: i64,
        date: i64,
        menu_item_id: i64,
        sort_order: i64,
        is_custom: bool,
        created_at: i64,
        item_name: String,
        item_description: Option<String>,
        base_price: i64,
        item_created_at: i64,
        item_updated_at: i64,
    }

    let rows: Vec<Row> = sqlx::query_as(
        "SELECT e.id, e.date, e.menu_item_id, e.sort_order, e.is_custom, e.created_at, \
                mi.name AS item_name, mi.description AS item_description, mi.base_price, \
                mi.created_at AS item_created_at, mi.updated_at AS item_updated_at \
         FROM menu_entry e \
         JOIN menu_item mi ON mi.id = e.menu_item_id \
         WHERE e.date >= ?1 AND e.date < ?2 AND e.is_custom = 0 AND mi.deleted_at IS NULL \
         ORDER BY e.date, e.sort_order",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    let item_ids: Vec<i64> = rows.iter().map(|r| r.menu_item_id).collect();
    let groups_by_item = menu_item::groups_for_items(pool, &item_ids).await?;

    Ok(rows
        .into_iter()
        .map(|r| MenuEntryFull {
            entry: MenuEntry {
                id: r.id,
                date: r.date,
                menu_item_id: r.menu_item_id,
                sort_order: r.sort_order,
                is_custom: r.is_custom,
                created_at: r.created_at,
            },
            item: MenuItem {
                id: r.menu_item_id,
                name: r.item_name,
                description: r.item_description,
                base_price: r.base_price,
                created_at: r.item_created_at,
                updated_at: r.item_updated_at,
                deleted_at: None,
            },
            modifier_groups: groups_by_item
                .get(&r.menu_item_id)
                .cloned()
                .unwrap_or_default(),
        })
        .collect())
}

/// Replace a day's normal entries with the submitted list (display order
/// = list order): insert new placements, re-order kept ones, delete
/// removed ones. Removing an entry that order items already reference is
/// refused: operational data wins over calendar edits.
pub async fn save_day(pool: &SqlitePool, date: NaiveDate, data: MenuDaySave) -> RepoResult<()> {
    let day = local_midnight_millis(date).map_err(|e| RepoError::Validation(e.to_string()))?;

    let mut seen = HashSet::new();
    for item in &data.items {
        if !seen.insert(item.menu_item_id) {
            return Err(RepoError::Validation(format!(
                "menu item {} listed twice",
                item.menu_item_id
            )));
        }
        if menu_item::get(pool, item.menu_item_id).await?.is_none() {
            return Err(RepoError::NotFound(format!(
                "Menu item {} not found",
                item.menu_item_id
            )));
        }
    }

    let mut tx = pool.begin().await?;

    #[derive(sqlx::FromRow)]
    struct Existing {
        id: i64,
        menu_item_id: i64,
    }
    let existing: Vec<Existing> =
        sqlx::query_as("SELECT id, menu_item_id FROM menu_entry WHERE date = ?1 AND is_custom = 0")
            .bind(day)
            .fetch_all(&mut *tx)
            .await?;
    let existing_by_item: HashMap<i64, i64> =
        existing.iter().map(|e| (e.menu_item_id, e.id)).collect();

    // Delete removed placements (refused while orders reference them)
    for e in &existing {
        if !seen.contains(&e.menu_item_id) {
            let referencing = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM order_item WHERE menu_entry_id = ?",
            )
            .bind(e.id)
            .fetch_one(&mut *tx)
            .await?;
            if referencing > 0 {
                return Err(RepoError::Conflict(format!(
                    "menu entry for item {} has orders and cannot be removed",
                    e.menu_item_id
                )));
            }
            sqlx::query("DELETE FROM menu_entry WHERE id = ?")
                .bind(e.id)
                .execute(&mut *tx)
                .await?;
        }
    }

    // Insert new placements, re-order kept ones
    let now = now_millis();
    for (sort_order, item) in data.items.iter().enumerate() {
        match existing_by_item.get(&item.menu_item_id) {
            Some(entry_id) => {
                sqlx::query("UPDATE menu_entry SET sort_order = ?1 WHERE id = ?2")
                    .bind(sort_order as i64)
                    .bind(entry_id)
                    .execute(&mut *tx)
                    .await?;
            }
            None => {
                sqlx::query(
                    "INSERT INTO menu_entry (date, menu_item_id, sort_order, is_custom, created_at) \
                     VALUES (?1, ?2, ?3, 0, ?4)",
                )
                .bind(day)
                .bind(item.menu_item_id)
                .bind(sort_order as i64)
                .bind(now)
                .execute(&mut *tx)
                .await?;
            }
        }
    }

    tx.commit().await?;
    Ok(())
}

/// Create an ad hoc entry backing a manual order. Duplicate custom
/// placement for the same (date, item) is a conflict, not find-or-create.
pub async fn create_custom(
    pool: &SqlitePool,
    date: NaiveDate,
    menu_item_id: i64,
) -> RepoResult<MenuEntry> {
    let day = local_midnight_millis(date).map_err(|e| RepoError::Validation(e.to_string()))?;
    if menu_item::get(pool, menu_item_id).await?.is_none() {
        return Err(RepoError::NotFound(format!(
            "Menu item {menu_item_id} not found"
        )));
    }

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO menu_entry (date, menu_item_id, sort_order, is_custom, created_at) \
         VALUES (?1, ?2, 0, 1, ?3) RETURNING id",
    )
    .bind(day)
    .bind(menu_item_id)
    .bind(now_millis())
    .fetch_one(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => RepoError::Duplicate(format!(
            "custom entry for item {menu_item_id} already exists on this date"
        )),
        other => other,
    })?;

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create custom menu entry".into()))
}

/// Promote a custom entry to the public calendar (flag flip only).
pub async fn convert_custom_to_normal(pool: &SqlitePool, entry_id: i64) -> RepoResult<MenuEntry> {
    let entry = get(pool, entry_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu entry {entry_id} not found")))?;
    if !entry.is_custom {
        return Err(RepoError::Validation(format!(
            "menu entry {entry_id} is not a custom entry"
        )));
    }

    sqlx::query("UPDATE menu_entry SET is_custom = 0 WHERE id = ?")
        .bind(entry_id)
        .execute(pool)
        .await
        .map_err(|e| match RepoError::from(e) {
            RepoError::Duplicate(_) => RepoError::Duplicate(format!(
                "a normal entry for item {} already exists on this date",
                entry.menu_item_id
            )),
            other => other,
        })?;

    get(pool, entry_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu entry {entry_id} not found")))
}
