//! User Repository
//!
//! Users are issued by the external auth provider; this table is a local
//! mirror kept fresh from verified token claims, plus locally created
//! anonymous rows for walk-in customers on manual orders.

use super::RepoResult;
use shared::models::{Role, User};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, phone_number, is_anonymous, role, created_at, updated_at FROM user WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// Insert or refresh the mirror row for an authenticated caller.
pub async fn upsert(
    pool: &SqlitePool,
    id: i64,
    name: &str,
    phone_number: Option<&str>,
    is_anonymous: bool,
    role: Role,
) -> RepoResult<()> {
    let now = now_millis();
    sqlx::query(
        "INSERT INTO user (id, name, phone_number, is_anonymous, role, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6) \
         ON CONFLICT(id) DO UPDATE SET \
             name = excluded.name, \
             phone_number = excluded.phone_number, \
             is_anonymous = excluded.is_anonymous, \
             role = excluded.role, \
             updated_at = excluded.updated_at",
    )
    .bind(id)
    .bind(name)
    .bind(phone_number)
    .bind(is_anonymous)
    .bind(role.as_str())
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

/// Create an anonymous walk-in user (manual orders for customers without
/// an account). Runs inside the caller's transaction.
pub async fn create_walk_in(
    tx: &mut sqlx::SqliteConnection,
    name: &str,
    phone_number: Option<&str>,
) -> RepoResult<i64> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO user (id, name, phone_number, is_anonymous, role, created_at, updated_at) \
         VALUES (?1, ?2, ?3, 1, 'customer', ?4, ?4)",
    )
    .bind(id)
    .bind(name)
    .bind(phone_number)
    .bind(now)
    .execute(tx)
    .await?;
    Ok(id)
}
