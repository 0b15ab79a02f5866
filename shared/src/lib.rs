//! Saangee's Kitchen - Shared Types
//!
//! Types and pure logic shared between the kitchen server and clients:
//!
//! - **Models** (`models`): menu, modifier, calendar, order and user DTOs.
//!   DB row types derive `sqlx::FromRow` behind the `db` feature.
//! - **Pricing** (`pricing`): integer minor-unit price computation. The
//!   same functions back the client cart preview and the server-side
//!   order totals.
//! - **Cart** (`cart`): the client-held cart, its canonical SKU-key codec
//!   and the repair-on-read reconciliation against the live menu.
//! - **Util** (`util`): timestamps and ID generation.
//!
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY / snowflake-style for
//! externally issued user IDs). All money values are integer cents.

pub mod cart;
pub mod models;
pub mod pricing;
pub mod util;

pub use cart::{Cart, CartLine, SkuKey, SkuKeyError};
