//! Order Repository
//!
//! Orders are operational data: written transactionally at checkout or
//! manual entry, fully replaced on edit, hard-deleted on delete. Line
//! prices are frozen at write time from the current catalog; the server
//! re-derives every total itself and never reads one from a client.
//!
//! Every mutation here is a single transaction. A failed lookup or
//! insert rolls back the whole operation, so partial orders are never
//! observable.

use std::collections::{HashMap, HashSet};

use super::{user, RepoError, RepoResult};
use chrono::NaiveDate;
use shared::models::{
    ManualOrderCreate, Order, OrderDetail, OrderDetailLine, OrderDetailModifier, OrderItem,
    OrderLineInput, OrderWithUser,
};
use shared::pricing;
use shared::util::now_millis;
use sqlx::{QueryBuilder, SqliteConnection, SqlitePool};

use crate::utils::time::local_day_bounds;
use crate::views::{ItemDetail, PaymentSource};

const ORDER_COLUMNS: &str =
    "id, user_id, status, total, cents_paid, is_manual, created_at, updated_at";

/// One line after ID resolution: frozen prices, ready to insert.
struct ResolvedLine {
    menu_entry_id: i64,
    quantity: i64,
    item_price: i64,
    /// (option_id, frozen price delta)
    modifiers: Vec<(i64, i64)>,
    prior_order_item_id: Option<i64>,
}

impl ResolvedLine {
    fn total(&self) -> i64 {
        let deltas: Vec<i64> = self.modifiers.iter().map(|(_, delta)| *delta).collect();
        pricing::line_total(self.item_price, &deltas, self.quantity)
    }
}

/// Resolve every menu entry to its item's current base price and every
/// modifier option to its current delta, in two batched lookups. Any
/// unresolved or soft-deleted ID fails the whole operation.
async fn resolve_lines(
    tx: &mut SqliteConnection,
    lines: &[OrderLineInput],
) -> RepoResult<Vec<ResolvedLine>> {
    if lines.is_empty() {
        return Err(RepoError::Validation("order has no lines".into()));
    }
    for line in lines {
        if line.quantity < 1 {
            return Err(RepoError::Validation(format!(
                "quantity must be >= 1 (menu entry {})",
                line.menu_entry_id
            )));
        }
    }

    // Batch 1: menu entries joined to their item's live base price
    let entry_ids: HashSet<i64> = lines.iter().map(|l| l.menu_entry_id).collect();
    #[derive(sqlx::FromRow)]
    struct EntryPrice {
        id: i64,
        base_price: i64,
    }
    let mut qb = QueryBuilder::new(
        "SELECT e.id, mi.base_price \
         FROM menu_entry e JOIN menu_item mi ON mi.id = e.menu_item_id \
         WHERE mi.deleted_at IS NULL AND e.id IN (",
    );
    let mut sep = qb.separated(", ");
    for id in &entry_ids {
        sep.push_bind(id);
    }
    qb.push(")");
    let entry_rows: Vec<EntryPrice> = qb.build_query_as().fetch_all(&mut *tx).await?;
    let price_by_entry: HashMap<i64, i64> =
        entry_rows.into_iter().map(|r| (r.id, r.base_price)).collect();

    // Batch 2: active modifier option deltas
    let option_ids: HashSet<i64> = lines
        .iter()
        .flat_map(|l| l.modifier_option_ids.iter().copied())
        .collect();
    let delta_by_option: HashMap<i64, i64> = if option_ids.is_empty() {
        HashMap::new()
    } else {
        #[derive(sqlx::FromRow)]
        struct OptionDelta {
            id: i64,
            price_delta: i64,
        }
        let mut qb = QueryBuilder::new(
            "SELECT id, price_delta FROM modifier_option WHERE deleted_at IS NULL AND id IN (",
        );
        let mut sep = qb.separated(", ");
        for id in &option_ids {
            sep.push_bind(id);
        }
        qb.push(")");
        let rows: Vec<OptionDelta> = qb.build_query_as().fetch_all(&mut *tx).await?;
        rows.into_iter().map(|r| (r.id, r.price_delta)).collect()
    };

    lines
        .iter()
        .map(|line| {
            let item_price = *price_by_entry.get(&line.menu_entry_id).ok_or_else(|| {
                RepoError::NotFound(format!("Menu entry {} not found", line.menu_entry_id))
            })?;
            // Selections are a set: repeated IDs collapse instead of
            // double-charging
            let mut selected = line.modifier_option_ids.clone();
            selected.sort_unstable();
            selected.dedup();
            let modifiers = selected
                .iter()
                .map(|option_id| {
                    delta_by_option
                        .get(option_id)
                        .map(|delta| (*option_id, *delta))
                        .ok_or_else(|| {
                            RepoError::NotFound(format!("Modifier option {option_id} not found"))
                        })
                })
                .collect::<RepoResult<Vec<_>>>()?;
            Ok(ResolvedLine {
                menu_entry_id: line.menu_entry_id,
                quantity: line.quantity,
                item_price,
                modifiers,
                prior_order_item_id: line.prior_order_item_id,
            })
        })
        .collect()
}

/// Insert the resolved lines (and their frozen modifier prices) for an
/// order. `bagged_by_prior` carries bagged timestamps forward on edits.
async fn insert_lines(
    tx: &mut SqliteConnection,
    order_id: i64,
    resolved: &[ResolvedLine],
    bagged_by_prior: &HashMap<i64, i64>,
) -> RepoResult<()> {
    for line in resolved {
        let bagged_at = line
            .prior_order_item_id
            .and_then(|prior| bagged_by_prior.get(&prior).copied());
        let item_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO order_item (order_id, menu_entry_id, quantity, item_price, bagged_at) \
             VALUES (?1, ?2, ?3, ?4, ?5) RETURNING id",
        )
        .bind(order_id)
        .bind(line.menu_entry_id)
        .bind(line.quantity)
        .bind(line.item_price)
        .bind(bagged_at)
        .fetch_one(&mut *tx)
        .await?;

        for (option_id, option_price) in &line.modifiers {
            sqlx::query(
                "INSERT INTO order_item_modifier (order_item_id, modifier_option_id, option_price) \
                 VALUES (?1, ?2, ?3)",
            )
            .bind(item_id)
            .bind(option_id)
            .bind(option_price)
            .execute(&mut *tx)
            .await?;
        }
    }
    Ok(())
}

/// Customer self-checkout. The caller is the (already upserted) user.
pub async fn create(
    pool: &SqlitePool,
    user_id: i64,
    lines: &[OrderLineInput],
) -> RepoResult<Order> {
    create_inner(pool, user_id, lines, false).await
}

/// Admin-entered order for an existing user or a walk-in customer.
pub async fn create_manual(pool: &SqlitePool, data: &ManualOrderCreate) -> RepoResult<Order> {
    let mut tx = pool.begin().await?;
    let user_id = match (data.user_id, &data.walk_in) {
        (Some(id), _) => {
            let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM user WHERE id = ?")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
            if exists == 0 {
                return Err(RepoError::NotFound(format!("User {id} not found")));
            }
            id
        }
        (None, Some(walk_in)) => {
            if walk_in.name.trim().is_empty() {
                return Err(RepoError::Validation("walk-in customer needs a name".into()));
            }
            user::create_walk_in(&mut tx, &walk_in.name, walk_in.phone_number.as_deref()).await?
        }
        (None, None) => {
            return Err(RepoError::Validation(
                "manual order needs a user_id or a walk_in customer".into(),
            ));
        }
    };

    let order_id = write_order(&mut tx, user_id, &data.lines, true).await?;
    tx.commit().await?;

    get(pool, order_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".into()))
}

async fn create_inner(
    pool: &SqlitePool,
    user_id: i64,
    lines: &[OrderLineInput],
    is_manual: bool,
) -> RepoResult<Order> {
    let mut tx = pool.begin().await?;
    let order_id = write_order(&mut tx, user_id, lines, is_manual).await?;
    tx.commit().await?;

    get(pool, order_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".into()))
}

async fn write_order(
    tx: &mut SqliteConnection,
    user_id: i64,
    lines: &[OrderLineInput],
    is_manual: bool,
) -> RepoResult<i64> {
    let resolved = resolve_lines(tx, lines).await?;
    let total: i64 = resolved.iter().map(ResolvedLine::total).sum();
    let now = now_millis();

    let order_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO orders (user_id, status, total, cents_paid, is_manual, created_at, updated_at) \
         VALUES (?1, 'placed', ?2, 0, ?3, ?4, ?4) RETURNING id",
    )
    .bind(user_id)
    .bind(total)
    .bind(is_manual)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    insert_lines(tx, order_id, &resolved, &HashMap::new()).await?;
    Ok(order_id)
}

/// Replace a manual order's full item set: delete modifiers, delete
/// items, re-resolve against the current catalog, recompute the total,
/// reinsert. A line naming a `prior_order_item_id` of this order keeps
/// that line's bagged state; everything else starts unbagged.
pub async fn update_manual(
    pool: &SqlitePool,
    order_id: i64,
    lines: &[OrderLineInput],
) -> RepoResult<Order> {
    let mut tx = pool.begin().await?;

    let order = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"
    ))
    .bind(order_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} not found")))?;
    if !order.is_manual {
        return Err(RepoError::Validation(format!(
            "order {order_id} is not a manual order"
        )));
    }

    // Bagged timestamps of the lines being replaced, for pass-through
    let prior: Vec<OrderItem> = sqlx::query_as(
        "SELECT id, order_id, menu_entry_id, quantity, item_price, bagged_at \
         FROM order_item WHERE order_id = ?",
    )
    .bind(order_id)
    .fetch_all(&mut *tx)
    .await?;
    let bagged_by_prior: HashMap<i64, i64> = prior
        .into_iter()
        .filter_map(|p| p.bagged_at.map(|at| (p.id, at)))
        .collect();

    let resolved = resolve_lines(&mut tx, lines).await?;
    let total: i64 = resolved.iter().map(ResolvedLine::total).sum();

    // Dependency order: modifiers, then items
    sqlx::query(
        "DELETE FROM order_item_modifier WHERE order_item_id IN \
         (SELECT id FROM order_item WHERE order_id = ?)",
    )
    .bind(order_id)
    .execute(&mut *tx)
    .await?;
    sqlx::query("DELETE FROM order_item WHERE order_id = ?")
        .bind(order_id)
        .execute(&mut *tx)
        .await?;

    insert_lines(&mut tx, order_id, &resolved, &bagged_by_prior).await?;

    // Keep the payment invariant if the replacement shrank the total
    sqlx::query(
        "UPDATE orders SET total = ?1, cents_paid = MIN(cents_paid, ?1), updated_at = ?2 WHERE id = ?3",
    )
    .bind(total)
    .bind(now_millis())
    .bind(order_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    get(pool, order_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} not found")))
}

/// Hard delete: modifiers, then items, then the order, atomically.
pub async fn delete(pool: &SqlitePool, order_id: i64) -> RepoResult<bool> {
    let mut tx = pool.begin().await?;
    sqlx::query(
        "DELETE FROM order_item_modifier WHERE order_item_id IN \
         (SELECT id FROM order_item WHERE order_id = ?)",
    )
    .bind(order_id)
    .execute(&mut *tx)
    .await?;
    sqlx::query("DELETE FROM order_item WHERE order_id = ?")
        .bind(order_id)
        .execute(&mut *tx)
        .await?;
    let rows = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(order_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(rows.rows_affected() > 0)
}

// ── Payments ────────────────────────────────────────────────────────────

/// Set the running payment total. Idempotent; `0 <= cents_paid <= total`
/// is enforced here, at the boundary, and a violation leaves the stored
/// value unchanged.
pub async fn update_payment(pool: &SqlitePool, order_id: i64, cents_paid: i64) -> RepoResult<Order> {
    if cents_paid < 0 {
        return Err(RepoError::Validation("cents_paid must be >= 0".into()));
    }
    let mut tx = pool.begin().await?;
    let total = sqlx::query_scalar::<_, i64>("SELECT total FROM orders WHERE id = ?")
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} not found")))?;
    if cents_paid > total {
        return Err(RepoError::Conflict(format!(
            "cents_paid ({cents_paid}) exceeds order total ({total})"
        )));
    }
    sqlx::query("UPDATE orders SET cents_paid = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(cents_paid)
        .bind(now_millis())
        .bind(order_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    get(pool, order_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} not found")))
}

/// Shorthand for `cents_paid := total`. Idempotent.
pub async fn mark_paid_in_full(pool: &SqlitePool, order_id: i64) -> RepoResult<Order> {
    let rows = sqlx::query("UPDATE orders SET cents_paid = total, updated_at = ?1 WHERE id = ?2")
        .bind(now_millis())
        .bind(order_id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {order_id} not found")));
    }
    get(pool, order_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} not found")))
}

// ── Reads ───────────────────────────────────────────────────────────────

pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(order)
}

/// Orders (with owner), optionally narrowed to those with an item on the
/// given local day. Newest first.
pub async fn list(pool: &SqlitePool, date: Option<NaiveDate>) -> RepoResult<Vec<OrderWithUser>> {
    let base = "SELECT o.id, o.user_id, u.name AS user_name, o.status, o.total, o.cents_paid, \
                       o.is_manual, o.created_at, o.updated_at \
                FROM orders o JOIN user u ON u.id = o.user_id";
    let orders = match date {
        Some(date) => {
            let (start, end) =
                local_day_bounds(date).map_err(|e| RepoError::Validation(e.to_string()))?;
            sqlx::query_as::<_, OrderWithUser>(&format!(
                "{base} WHERE EXISTS (\
                     SELECT 1 FROM order_item oi \
                     JOIN menu_entry e ON e.id = oi.menu_entry_id \
                     WHERE oi.order_id = o.id AND e.date >= ?1 AND e.date < ?2) \
                 ORDER BY o.created_at DESC, o.id DESC"
            ))
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, OrderWithUser>(&format!(
                "{base} ORDER BY o.created_at DESC, o.id DESC"
            ))
            .fetch_all(pool)
            .await?
        }
    };
    Ok(orders)
}

/// Full order detail with frozen line prices and option names.
/// Historical: soft-deleted catalog rows still resolve here.
pub async fn detail(pool: &SqlitePool, order_id: i64) -> RepoResult<Option<OrderDetail>> {
    let Some(order) = get(pool, order_id).await? else {
        return Ok(None);
    };
    let user_name = sqlx::query_scalar::<_, String>("SELECT name FROM user WHERE id = ?")
        .bind(order.user_id)
        .fetch_optional(pool)
        .await?
        .unwrap_or_else(|| "unknown".to_string());

    #[derive(sqlx::FromRow)]
    struct LineRow {
        order_item_id: i64,
        menu_entry_id: i64,
        menu_item_id: i64,
        item_name: String,
        quantity: i64,
        item_price: i64,
        bagged_at: Option<i64>,
    }
    let line_rows: Vec<LineRow> = sqlx::query_as(
        "SELECT oi.id AS order_item_id, oi.menu_entry_id, e.menu_item_id, mi.name AS item_name, \
                oi.quantity, oi.item_price, oi.bagged_at \
         FROM order_item oi \
         JOIN menu_entry e ON e.id = oi.menu_entry_id \
         JOIN menu_item mi ON mi.id = e.menu_item_id \
         WHERE oi.order_id = ? ORDER BY oi.id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;

    #[derive(sqlx::FromRow)]
    struct ModifierRow {
        order_item_id: i64,
        modifier_option_id: i64,
        option_name: String,
        option_price: i64,
    }
    let modifier_rows: Vec<ModifierRow> = sqlx::query_as(
        "SELECT oim.order_item_id, oim.modifier_option_id, mo.name AS option_name, oim.option_price \
         FROM order_item_modifier oim \
         JOIN modifier_option mo ON mo.id = oim.modifier_option_id \
         JOIN order_item oi ON oi.id = oim.order_item_id \
         WHERE oi.order_id = ? ORDER BY oim.order_item_id, oim.modifier_option_id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;

    let mut modifiers_by_item: HashMap<i64, Vec<OrderDetailModifier>> = HashMap::new();
    for m in modifier_rows {
        modifiers_by_item
            .entry(m.order_item_id)
            .or_default()
            .push(OrderDetailModifier {
                modifier_option_id: m.modifier_option_id,
                option_name: m.option_name,
                option_price: m.option_price,
            });
    }

    let lines = line_rows
        .into_iter()
        .map(|r| OrderDetailLine {
            order_item_id: r.order_item_id,
            menu_entry_id: r.menu_entry_id,
            menu_item_id: r.menu_item_id,
            item_name: r.item_name,
            quantity: r.quantity,
            item_price: r.item_price,
            bagged_at: r.bagged_at,
            modifiers: modifiers_by_item.remove(&r.order_item_id).unwrap_or_default(),
        })
        .collect();

    Ok(Some(OrderDetail { order, user_name, lines }))
}

// ── View sources ────────────────────────────────────────────────────────

/// Order items for a local day, with frozen modifier selections, for the
/// cooking and bagging views. Historical names resolve even when the
/// catalog row was soft-deleted since.
pub async fn item_details_for_day(
    pool: &SqlitePool,
    date: NaiveDate,
) -> RepoResult<Vec<ItemDetail>> {
    let (start, end) = local_day_bounds(date).map_err(|e| RepoError::Validation(e.to_string()))?;

    #[derive(sqlx::FromRow)]
    struct Row {
        order_item_id: i64,
        user_id: i64,
        user_name: String,
        user_phone: Option<String>,
        menu_item_id: i64,
        item_name: String,
        quantity: i64,
        bagged_at: Option<i64>,
    }
    let rows: Vec<Row> = sqlx::query_as(
        "SELECT oi.id AS order_item_id, o.user_id, u.name AS user_name, \
                u.phone_number AS user_phone, e.menu_item_id, mi.name AS item_name, \
                oi.quantity, oi.bagged_at \
         FROM order_item oi \
         JOIN orders o ON o.id = oi.order_id \
         JOIN user u ON u.id = o.user_id \
         JOIN menu_entry e ON e.id = oi.menu_entry_id \
         JOIN menu_item mi ON mi.id = e.menu_item_id \
         WHERE e.date >= ?1 AND e.date < ?2 \
         ORDER BY oi.id",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    let item_ids: Vec<i64> = rows.iter().map(|r| r.order_item_id).collect();
    let mut options_by_item: HashMap<i64, Vec<(i64, String)>> = HashMap::new();
    if !item_ids.is_empty() {
        #[derive(sqlx::FromRow)]
        struct OptionRow {
            order_item_id: i64,
            modifier_option_id: i64,
            option_name: String,
        }
        let mut qb = QueryBuilder::new(
            "SELECT oim.order_item_id, oim.modifier_option_id, mo.name AS option_name \
             FROM order_item_modifier oim \
             JOIN modifier_option mo ON mo.id = oim.modifier_option_id \
             WHERE oim.order_item_id IN (",
        );
        let mut sep = qb.separated(", ");
        for id in &item_ids {
            sep.push_bind(id);
        }
        qb.push(") ORDER BY oim.order_item_id, oim.modifier_option_id");
        let option_rows: Vec<OptionRow> = qb.build_query_as().fetch_all(pool).await?;
        for row in option_rows {
            options_by_item
                .entry(row.order_item_id)
                .or_default()
                .push((row.modifier_option_id, row.option_name));
        }
    }

    Ok(rows
        .into_iter()
        .map(|r| ItemDetail {
            user_id: r.user_id,
            user_name: r.user_name,
            user_phone: r.user_phone,
            menu_item_id: r.menu_item_id,
            item_name: r.item_name,
            quantity: r.quantity,
            bagged_at: r.bagged_at,
            options: options_by_item.remove(&r.order_item_id).unwrap_or_default(),
        })
        .collect())
}

/// Orders with an item on the local day, with owner info, for the
/// payment view.
pub async fn payment_sources_for_day(
    pool: &SqlitePool,
    date: NaiveDate,
) -> RepoResult<Vec<PaymentSource>> {
    let (start, end) = local_day_bounds(date).map_err(|e| RepoError::Validation(e.to_string()))?;
    let rows: Vec<PaymentSource> = sqlx::query_as(
        "SELECT DISTINCT o.id AS order_id, o.user_id, u.name AS user_name, \
                u.phone_number AS user_phone, o.total, o.cents_paid, o.created_at \
         FROM orders o \
         JOIN user u ON u.id = o.user_id \
         JOIN order_item oi ON oi.order_id = o.id \
         JOIN menu_entry e ON e.id = oi.menu_entry_id \
         WHERE e.date >= ?1 AND e.date < ?2",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

// ── Bagging ─────────────────────────────────────────────────────────────

/// Mark every unbagged order item of (user, local day) bagged, in one
/// batch. Returns the number of items touched.
pub async fn mark_person_bagged(
    pool: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
) -> RepoResult<u64> {
    let (start, end) = local_day_bounds(date).map_err(|e| RepoError::Validation(e.to_string()))?;
    let rows = sqlx::query(
        "UPDATE order_item SET bagged_at = ?1 \
         WHERE bagged_at IS NULL AND id IN (\
             SELECT oi.id FROM order_item oi \
             JOIN orders o ON o.id = oi.order_id \
             JOIN menu_entry e ON e.id = oi.menu_entry_id \
             WHERE o.user_id = ?2 AND e.date >= ?3 AND e.date < ?4)",
    )
    .bind(now_millis())
    .bind(user_id)
    .bind(start)
    .bind(end)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected())
}

/// Inverse of [`mark_person_bagged`]: clear every bagged item of the
/// (user, local day) pair.
pub async fn unmark_person_bagged(
    pool: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
) -> RepoResult<u64> {
    let (start, end) = local_day_bounds(date).map_err(|e| RepoError::Validation(e.to_string()))?;
    let rows = sqlx::query(
        "UPDATE order_item SET bagged_at = NULL \
         WHERE bagged_at IS NOT NULL AND id IN (\
             SELECT oi.id FROM order_item oi \
             JOIN orders o ON o.id = oi.order_id \
             JOIN menu_entry e ON e.id = oi.menu_entry_id \
             WHERE o.user_id = ?1 AND e.date >= ?2 AND e.date < ?3)",
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected())
}

/// Distinct service-day instants (millis) that have order items.
pub async fn dates_with_orders(pool: &SqlitePool) -> RepoResult<Vec<i64>> {
    let dates = sqlx::query_scalar::<_, i64>(
        "SELECT DISTINCT e.date FROM order_item oi \
         JOIN menu_entry e ON e.id = oi.menu_entry_id \
         ORDER BY e.date DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(dates)
}
