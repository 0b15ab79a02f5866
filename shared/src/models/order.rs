//! Order Model
//!
//! Orders are operational data: hard-deleted, never soft-deleted. Prices
//! on order lines are frozen at order time and never recomputed from the
//! current catalog.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub status: String,
    /// Total in cents, computed at creation; changes only via order edit
    pub total: i64,
    /// Running payment total, `0 <= cents_paid <= total`
    pub cents_paid: i64,
    /// Admin-entered order vs. customer self-checkout
    pub is_manual: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub menu_entry_id: i64,
    pub quantity: i64,
    /// Item base price in cents at order time
    pub item_price: i64,
    /// Packing completion timestamp for this line
    pub bagged_at: Option<i64>,
}

/// Order item modifier entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItemModifier {
    pub id: i64,
    pub order_item_id: i64,
    pub modifier_option_id: i64,
    /// Option price delta in cents at order time
    pub option_price: i64,
}

// =============================================================================
// Write payloads
// =============================================================================

/// One line of an order create/update request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderLineInput {
    pub menu_entry_id: i64,
    #[validate(range(min = 1))]
    pub quantity: i64,
    #[serde(default)]
    pub modifier_option_ids: Vec<i64>,
    /// On manual-order edit: the replaced line whose bagged state this
    /// line keeps. Ignored on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior_order_item_id: Option<i64>,
}

/// Customer checkout payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderCreate {
    #[validate(length(min = 1), nested)]
    pub lines: Vec<OrderLineInput>,
}

/// Walk-in customer on a manual order (no account with the auth provider)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WalkInCustomer {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub phone_number: Option<String>,
}

/// Admin manual-order payload: an existing user or a walk-in
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ManualOrderCreate {
    pub user_id: Option<i64>,
    #[validate(nested)]
    pub walk_in: Option<WalkInCustomer>,
    #[validate(length(min = 1), nested)]
    pub lines: Vec<OrderLineInput>,
}

/// Manual-order edit payload: the full replacement item set
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ManualOrderUpdate {
    #[validate(length(min = 1), nested)]
    pub lines: Vec<OrderLineInput>,
}

/// Payment update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentUpdate {
    pub cents_paid: i64,
}

// =============================================================================
// Read models
// =============================================================================

/// Order with owner info (list views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderWithUser {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub status: String,
    pub total: i64,
    pub cents_paid: i64,
    pub is_manual: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// One line of an order detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetailLine {
    pub order_item_id: i64,
    pub menu_entry_id: i64,
    pub menu_item_id: i64,
    pub item_name: String,
    pub quantity: i64,
    pub item_price: i64,
    pub bagged_at: Option<i64>,
    pub modifiers: Vec<OrderDetailModifier>,
}

/// One frozen modifier selection on an order line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetailModifier {
    pub modifier_option_id: i64,
    pub option_name: String,
    pub option_price: i64,
}

/// Full order detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order: Order,
    pub user_name: String,
    pub lines: Vec<OrderDetailLine>,
}

// =============================================================================
// Aggregation view rows
// =============================================================================

/// Cooking view: one row per (item, modifier-combination) for a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookingRow {
    pub menu_item_id: i64,
    pub item_name: String,
    /// Selected option names, ordered by option ID (display only; the
    /// grouping key is the ID set)
    pub modifiers: Vec<String>,
    pub quantity: i64,
}

/// Bagging view: one merged line within a person's checklist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaggingLine {
    pub menu_item_id: i64,
    pub item_name: String,
    pub modifiers: Vec<String>,
    pub quantity: i64,
    /// AND of `bagged_at != null` over every contributing order item
    pub all_bagged: bool,
}

/// Bagging view: one person's packing checklist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaggingPerson {
    pub user_id: i64,
    /// Name, suffixed with last-4 phone digits when duplicated
    pub display_name: String,
    pub lines: Vec<BaggingLine>,
    pub all_bagged: bool,
}

/// Payment view: one row per order for a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRow {
    pub order_id: i64,
    pub user_id: i64,
    pub display_name: String,
    pub total: i64,
    pub cents_paid: i64,
    pub amount_owed: i64,
    pub is_paid_in_full: bool,
    pub created_at: i64,
}
