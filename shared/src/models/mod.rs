//! Data models
//!
//! Shared between kitchen-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod menu_entry;
pub mod menu_item;
pub mod modifier;
pub mod order;
pub mod user;

// Re-exports
pub use menu_entry::*;
pub use menu_item::*;
pub use modifier::*;
pub use order::*;
pub use user::*;
