//! API Route Modules
//!
//! - [`health`] - liveness check
//! - [`menu_items`] - catalog item management
//! - [`modifier_groups`] - modifier group/option management
//! - [`menu`] - menu calendar (day save, custom entries)
//! - [`orders`] - orders, payments, and the cooking/bagging/payment views
//!
//! Reads are public; mutations require an admin caller, except customer
//! checkout which requires any authenticated user.

pub mod health;
pub mod menu;
pub mod menu_items;
pub mod modifier_groups;
pub mod orders;
