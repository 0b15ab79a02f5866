//! User Model
//!
//! Users are issued by the external auth provider; the server keeps a
//! local mirror row for order ownership and the per-person views.

use serde::{Deserialize, Serialize};

/// Access tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum Role {
    Customer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Admin => "admin",
        }
    }
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub name: String,
    pub phone_number: Option<String>,
    pub is_anonymous: bool,
    pub role: Role,
    pub created_at: i64,
    pub updated_at: i64,
}
