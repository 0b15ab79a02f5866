//! Shared test fixtures: a temporary SQLite database with migrations
//! applied, plus seeding helpers over the repository API.

// Not every test binary uses every helper
#![allow(dead_code)]

use chrono::NaiveDate;
use kitchen_server::DbService;
use kitchen_server::db::repository::{menu_entry, menu_item, modifier_group, user};
use shared::models::{
    MenuDayItem, MenuDaySave, MenuItemCreate, ModifierGroupCreate, ModifierGroupFull,
    ModifierOptionCreate, Role,
};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Open a fresh database in a temp dir. Keep the `TempDir` alive for the
/// duration of the test.
pub async fn test_db() -> (DbService, TempDir) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("kitchen-test.db");
    let db = DbService::new(path.to_str().expect("utf8 path"))
        .await
        .expect("open test db");
    (db, dir)
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("test date")
}

pub async fn seed_user(pool: &SqlitePool, id: i64, name: &str, phone: Option<&str>) {
    user::upsert(pool, id, name, phone, false, Role::Customer)
        .await
        .expect("seed user");
}

pub async fn seed_item(pool: &SqlitePool, name: &str, base_price: i64) -> i64 {
    menu_item::create(
        pool,
        MenuItemCreate {
            name: name.to_string(),
            description: None,
            base_price,
        },
    )
    .await
    .expect("seed item")
    .id
}

/// Group with options; returns the group with option IDs resolvable by
/// name.
pub async fn seed_group(
    pool: &SqlitePool,
    name: &str,
    options: &[(&str, i64)],
) -> ModifierGroupFull {
    modifier_group::create(
        pool,
        ModifierGroupCreate {
            name: name.to_string(),
            min_select: None,
            max_select: None,
            options: options
                .iter()
                .map(|(option_name, delta)| ModifierOptionCreate {
                    name: option_name.to_string(),
                    price_delta: Some(*delta),
                    sort_order: None,
                })
                .collect(),
        },
    )
    .await
    .expect("seed group")
}

pub fn option_id(group: &ModifierGroupFull, name: &str) -> i64 {
    group
        .options
        .iter()
        .find(|o| o.name == name)
        .unwrap_or_else(|| panic!("option {name} in group {}", group.group.name))
        .id
}

/// Put items on the day's menu and return the entry ID for each item, in
/// input order.
pub async fn seed_day(pool: &SqlitePool, day: NaiveDate, item_ids: &[i64]) -> Vec<i64> {
    menu_entry::save_day(
        pool,
        day,
        MenuDaySave {
            items: item_ids
                .iter()
                .map(|id| MenuDayItem { menu_item_id: *id })
                .collect(),
        },
    )
    .await
    .expect("seed day");

    let entries = menu_entry::list_for_day(pool, day).await.expect("read day");
    item_ids
        .iter()
        .map(|item_id| {
            entries
                .iter()
                .find(|e| e.entry.menu_item_id == *item_id)
                .unwrap_or_else(|| panic!("entry for item {item_id}"))
                .entry
                .id
        })
        .collect()
}

pub async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("count")
}
