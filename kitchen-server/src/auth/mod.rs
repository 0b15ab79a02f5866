//! Authentication and Access Policy
//!
//! Token issuance belongs to the external auth provider; this module
//! validates Bearer tokens and enforces the three access tiers:
//!
//! | Tier | Mechanism |
//! |------|-----------|
//! | anonymous | no extractor (public reads) |
//! | authenticated customer | [`CurrentUser`] extractor |
//! | admin | [`AdminUser`] extractor |

mod extractor;
mod jwt;

pub use extractor::AdminUser;
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};

use shared::models::Role;

/// The authenticated caller, extracted from a validated token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub name: String,
    pub phone_number: Option<String>,
    pub is_anonymous: bool,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl TryFrom<Claims> for CurrentUser {
    type Error = String;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| format!("non-numeric subject: {:?}", claims.sub))?;
        let role = match claims.role.as_str() {
            "admin" => Role::Admin,
            "customer" => Role::Customer,
            other => return Err(format!("unknown role: {other:?}")),
        };
        Ok(CurrentUser {
            id,
            name: claims.name,
            phone_number: claims.phone_number,
            is_anonymous: claims.is_anonymous,
            role,
        })
    }
}
