//! Menu Entry Model
//!
//! A menu entry places one catalog item on one calendar date. Custom
//! entries back admin-created manual orders and never show on the public
//! calendar.

use serde::{Deserialize, Serialize};

use super::menu_item::MenuItem;
use super::modifier::ModifierGroupFull;

/// Menu entry entity
///
/// `date` is the local-midnight instant of the service day, in epoch
/// milliseconds. Unique on (date, menu_item_id, is_custom).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuEntry {
    pub id: i64,
    pub date: i64,
    pub menu_item_id: i64,
    pub sort_order: i64,
    pub is_custom: bool,
    pub created_at: i64,
}

/// One item placement in a day-save request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuDayItem {
    pub menu_item_id: i64,
}

/// Save-the-day payload: the submitted list fully describes the day's
/// normal entries; the server diffs it against what is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuDaySave {
    /// Item placements in display order
    pub items: Vec<MenuDayItem>,
}

/// Create a custom entry for a manual order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomMenuEntryCreate {
    /// Service day, `YYYY-MM-DD` (local)
    pub date: String,
    pub menu_item_id: i64,
}

/// Menu entry with its item and the item's modifier groups/options.
///
/// This is the shape the cart reconciles against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuEntryFull {
    #[serde(flatten)]
    pub entry: MenuEntry,
    pub item: MenuItem,
    pub modifier_groups: Vec<ModifierGroupFull>,
}
