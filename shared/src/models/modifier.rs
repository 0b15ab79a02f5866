//! Modifier Model
//!
//! Modifier groups own ordered options. Both are soft-deleted so that
//! historical order lines keep their references.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Modifier group entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ModifierGroup {
    pub id: i64,
    pub name: String,
    /// Minimum selections required (>= 0)
    pub min_select: i64,
    /// Maximum selections (None = unlimited). If set, >= min_select.
    pub max_select: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

/// Create modifier group payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ModifierGroupCreate {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub min_select: Option<i64>,
    pub max_select: Option<i64>,
    #[serde(default)]
    #[validate(nested)]
    pub options: Vec<ModifierOptionCreate>,
}

/// Update modifier group payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ModifierGroupUpdate {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    pub min_select: Option<i64>,
    /// Double-optional: `None` = leave unchanged, `Some(None)` = unlimited
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub max_select: Option<Option<i64>>,
}

/// Modifier option entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ModifierOption {
    pub id: i64,
    pub group_id: i64,
    pub name: String,
    /// Signed price delta in cents
    pub price_delta: i64,
    pub sort_order: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

/// Create modifier option payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ModifierOptionCreate {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub price_delta: Option<i64>,
    pub sort_order: Option<i64>,
}

/// Update modifier option payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ModifierOptionUpdate {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    pub price_delta: Option<i64>,
    pub sort_order: Option<i64>,
}

/// Modifier group with its active options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifierGroupFull {
    #[serde(flatten)]
    pub group: ModifierGroup,
    pub options: Vec<ModifierOption>,
}

/// Serde helper distinguishing "absent" from "explicit null" on updates.
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
