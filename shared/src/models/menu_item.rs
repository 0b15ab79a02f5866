//! Menu Item Model

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::modifier::ModifierGroupFull;

/// Menu item entity (catalog, soft-deleted)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Price in cents
    pub base_price: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MenuItemCreate {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub base_price: i64,
}

/// Update menu item payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MenuItemUpdate {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub base_price: Option<i64>,
}

/// Replace a menu item's modifier group assignments (ordered)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemModifierGroupsSet {
    /// Group IDs in display order
    pub group_ids: Vec<i64>,
}

/// Menu item with its assigned modifier groups (admin/detail views)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemFull {
    #[serde(flatten)]
    pub item: MenuItem,
    pub modifier_groups: Vec<ModifierGroupFull>,
}
