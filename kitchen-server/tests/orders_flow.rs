//! Order lifecycle integration tests: transactional create/edit/delete,
//! payment boundaries, bagging batches, and the per-day views over a
//! real (temporary) database.

mod common;

use common::*;
use kitchen_server::db::repository::{order, RepoError};
use kitchen_server::views;
use shared::models::{
    ManualOrderCreate, OrderItem, OrderItemModifier, OrderLineInput, WalkInCustomer,
};
use sqlx::SqlitePool;

fn line(menu_entry_id: i64, quantity: i64, modifier_option_ids: Vec<i64>) -> OrderLineInput {
    OrderLineInput {
        menu_entry_id,
        quantity,
        modifier_option_ids,
        prior_order_item_id: None,
    }
}

async fn attach_group(pool: &SqlitePool, item_id: i64, group_id: i64) {
    kitchen_server::db::repository::menu_item::set_modifier_groups(pool, item_id, &[group_id])
        .await
        .expect("attach group");
}

#[tokio::test]
async fn create_order_freezes_prices_and_computes_total() {
    let (db, _dir) = test_db().await;
    let pool = &db.pool;

    seed_user(pool, 7, "Asha", None).await;
    let item = seed_item(pool, "Thali", 1000).await;
    let size = seed_group(pool, "Size", &[("Small", 0), ("Large", 300)]).await;
    attach_group(pool, item, size.group.id).await;
    let entries = seed_day(pool, date("2025-06-01"), &[item]).await;
    let large = option_id(&size, "Large");

    // Large x2: unit 1300, total 2600
    let order = order::create(pool, 7, &[line(entries[0], 2, vec![large])])
        .await
        .expect("create order");

    assert_eq!(order.total, 2600);
    assert_eq!(order.cents_paid, 0);
    assert!(!order.is_manual);
    assert_eq!(count(pool, "order_item").await, 1);
    assert_eq!(count(pool, "order_item_modifier").await, 1);

    let items: Vec<OrderItem> = sqlx::query_as(
        "SELECT id, order_id, menu_entry_id, quantity, item_price, bagged_at FROM order_item",
    )
    .fetch_all(pool)
    .await
    .expect("items");
    assert_eq!(items[0].item_price, 1000, "base price frozen at order time");
    assert_eq!(items[0].quantity, 2);
    assert!(items[0].bagged_at.is_none());

    let modifiers: Vec<OrderItemModifier> = sqlx::query_as(
        "SELECT id, order_item_id, modifier_option_id, option_price FROM order_item_modifier",
    )
    .fetch_all(pool)
    .await
    .expect("modifiers");
    assert_eq!(modifiers[0].order_item_id, items[0].id);
    assert_eq!(modifiers[0].modifier_option_id, large);
    assert_eq!(modifiers[0].option_price, 300, "delta frozen at order time");
}

#[tokio::test]
async fn create_order_writes_one_item_per_line() {
    let (db, _dir) = test_db().await;
    let pool = &db.pool;

    seed_user(pool, 7, "Asha", None).await;
    let dal = seed_item(pool, "Dal", 700).await;
    let rice = seed_item(pool, "Rice", 300).await;
    let entries = seed_day(pool, date("2025-06-01"), &[dal, rice]).await;

    let order = order::create(pool, 7, &[line(entries[0], 1, vec![]), line(entries[1], 3, vec![])])
        .await
        .expect("create order");

    assert_eq!(count(pool, "order_item").await, 2);
    assert_eq!(order.total, 700 + 3 * 300);
}

#[tokio::test]
async fn unresolved_ids_fail_the_whole_order() {
    let (db, _dir) = test_db().await;
    let pool = &db.pool;

    seed_user(pool, 7, "Asha", None).await;
    let item = seed_item(pool, "Thali", 1000).await;
    let entries = seed_day(pool, date("2025-06-01"), &[item]).await;

    // Valid first line, dangling menu entry on the second: nothing persists
    let err = order::create(pool, 7, &[line(entries[0], 1, vec![]), line(99_999, 1, vec![])])
        .await
        .expect_err("dangling entry");
    assert!(matches!(err, RepoError::NotFound(_)));
    assert_eq!(count(pool, "orders").await, 0);
    assert_eq!(count(pool, "order_item").await, 0);

    // Dangling option id: same, no partial order
    let err = order::create(pool, 7, &[line(entries[0], 1, vec![55_555])])
        .await
        .expect_err("dangling option");
    assert!(matches!(err, RepoError::NotFound(_)));
    assert_eq!(count(pool, "orders").await, 0);
}

#[tokio::test]
async fn soft_deleted_option_is_rejected_not_priced_at_zero() {
    let (db, _dir) = test_db().await;
    let pool = &db.pool;

    seed_user(pool, 7, "Asha", None).await;
    let item = seed_item(pool, "Thali", 1000).await;
    let size = seed_group(pool, "Size", &[("Large", 300)]).await;
    attach_group(pool, item, size.group.id).await;
    let entries = seed_day(pool, date("2025-06-01"), &[item]).await;
    let large = option_id(&size, "Large");

    kitchen_server::db::repository::modifier_group::delete_option(pool, large)
        .await
        .expect("soft delete option");

    let err = order::create(pool, 7, &[line(entries[0], 1, vec![large])])
        .await
        .expect_err("deleted option must not resolve");
    assert!(matches!(err, RepoError::NotFound(_)));
    assert_eq!(count(pool, "orders").await, 0);
}

#[tokio::test]
async fn empty_and_non_positive_orders_are_rejected() {
    let (db, _dir) = test_db().await;
    let pool = &db.pool;

    seed_user(pool, 7, "Asha", None).await;
    let item = seed_item(pool, "Thali", 1000).await;
    let entries = seed_day(pool, date("2025-06-01"), &[item]).await;

    let err = order::create(pool, 7, &[]).await.expect_err("empty order");
    assert!(matches!(err, RepoError::Validation(_)));

    let err = order::create(pool, 7, &[line(entries[0], 0, vec![])])
        .await
        .expect_err("zero quantity");
    assert!(matches!(err, RepoError::Validation(_)));
}

#[tokio::test]
async fn delete_order_leaves_zero_orphans() {
    let (db, _dir) = test_db().await;
    let pool = &db.pool;

    seed_user(pool, 7, "Asha", None).await;
    let item = seed_item(pool, "Thali", 1000).await;
    let size = seed_group(pool, "Size", &[("Small", 0), ("Large", 300)]).await;
    let spice = seed_group(pool, "Spice", &[("Mild", 0), ("Hot", 0)]).await;
    attach_group(pool, item, size.group.id).await;
    let entries = seed_day(pool, date("2025-06-01"), &[item]).await;

    // 2 items, 3 modifier selections total
    let order = order::create(
        pool,
        7,
        &[
            line(entries[0], 1, vec![option_id(&size, "Small"), option_id(&spice, "Mild")]),
            line(entries[0], 2, vec![option_id(&size, "Large")]),
        ],
    )
    .await
    .expect("create order");
    assert_eq!(count(pool, "order_item").await, 2);
    assert_eq!(count(pool, "order_item_modifier").await, 3);

    assert!(order::delete(pool, order.id).await.expect("delete"));

    assert_eq!(count(pool, "orders").await, 0);
    assert_eq!(count(pool, "order_item").await, 0);
    assert_eq!(count(pool, "order_item_modifier").await, 0);

    // Deleting again reports not-deleted
    assert!(!order::delete(pool, order.id).await.expect("redelete"));
}

#[tokio::test]
async fn payment_updates_are_bounded_and_idempotent() {
    let (db, _dir) = test_db().await;
    let pool = &db.pool;

    seed_user(pool, 7, "Asha", None).await;
    let item = seed_item(pool, "Thali", 1000).await;
    let entries = seed_day(pool, date("2025-06-01"), &[item]).await;
    let order = order::create(pool, 7, &[line(entries[0], 2, vec![])])
        .await
        .expect("create order");
    assert_eq!(order.total, 2000);

    // Idempotent set within bounds
    let paid = order::update_payment(pool, order.id, 500).await.expect("pay");
    assert_eq!(paid.cents_paid, 500);
    let paid = order::update_payment(pool, order.id, 500).await.expect("pay again");
    assert_eq!(paid.cents_paid, 500);

    // Exceeding the total is a conflict and leaves state unchanged
    let err = order::update_payment(pool, order.id, 2001)
        .await
        .expect_err("overpay");
    assert!(matches!(err, RepoError::Conflict(_)));
    let unchanged = order::get(pool, order.id).await.expect("get").expect("order");
    assert_eq!(unchanged.cents_paid, 500);

    // Negative is validation
    let err = order::update_payment(pool, order.id, -1)
        .await
        .expect_err("negative");
    assert!(matches!(err, RepoError::Validation(_)));

    // Paid in full, twice
    let full = order::mark_paid_in_full(pool, order.id).await.expect("full");
    assert_eq!(full.cents_paid, full.total);
    let full = order::mark_paid_in_full(pool, order.id).await.expect("full again");
    assert_eq!(full.cents_paid, full.total);

    // Paying exactly the total is allowed
    let exact = order::update_payment(pool, order.id, full.total).await.expect("exact");
    assert_eq!(exact.cents_paid, exact.total);
}

#[tokio::test]
async fn manual_order_edit_replaces_lines_and_passes_bagged_state_through() {
    let (db, _dir) = test_db().await;
    let pool = &db.pool;

    seed_user(pool, 7, "Asha", None).await;
    let dal = seed_item(pool, "Dal", 700).await;
    let rice = seed_item(pool, "Rice", 300).await;
    let entries = seed_day(pool, date("2025-06-01"), &[dal, rice]).await;

    let created = order::create_manual(
        pool,
        &ManualOrderCreate {
            user_id: Some(7),
            walk_in: None,
            lines: vec![line(entries[0], 1, vec![]), line(entries[1], 1, vec![])],
        },
    )
    .await
    .expect("manual order");
    assert!(created.is_manual);
    assert_eq!(created.total, 1000);

    // Bag everything, then edit
    order::mark_person_bagged(pool, 7, date("2025-06-01")).await.expect("bag");
    let prior_ids: Vec<i64> =
        sqlx::query_scalar("SELECT id FROM order_item WHERE order_id = ? ORDER BY id")
            .bind(created.id)
            .fetch_all(pool)
            .await
            .expect("prior ids");

    // Keep the dal line (with its bagged state), requantify rice without
    // pass-through
    let updated = order::update_manual(
        pool,
        created.id,
        &[
            OrderLineInput {
                menu_entry_id: entries[0],
                quantity: 2,
                modifier_option_ids: vec![],
                prior_order_item_id: Some(prior_ids[0]),
            },
            line(entries[1], 3, vec![]),
        ],
    )
    .await
    .expect("edit");
    assert_eq!(updated.total, 2 * 700 + 3 * 300);

    let rows: Vec<(i64, Option<i64>)> =
        sqlx::query_as("SELECT menu_entry_id, bagged_at FROM order_item WHERE order_id = ? ORDER BY id")
            .bind(created.id)
            .fetch_all(pool)
            .await
            .expect("rows");
    assert_eq!(rows.len(), 2);
    assert!(rows[0].1.is_some(), "pass-through line keeps bagged_at");
    assert!(rows[1].1.is_none(), "fresh line starts unbagged");

    // The old item rows are gone, not edited in place
    let surviving: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_item WHERE id = ?")
        .bind(prior_ids[1])
        .fetch_one(pool)
        .await
        .expect("old row");
    assert_eq!(surviving, 0);
}

#[tokio::test]
async fn edit_clamps_overpayment_and_rejects_customer_orders() {
    let (db, _dir) = test_db().await;
    let pool = &db.pool;

    seed_user(pool, 7, "Asha", None).await;
    let dal = seed_item(pool, "Dal", 700).await;
    let entries = seed_day(pool, date("2025-06-01"), &[dal]).await;

    // Customer (non-manual) orders cannot be edited
    let customer_order = order::create(pool, 7, &[line(entries[0], 1, vec![])])
        .await
        .expect("customer order");
    let err = order::update_manual(pool, customer_order.id, &[line(entries[0], 2, vec![])])
        .await
        .expect_err("non-manual edit");
    assert!(matches!(err, RepoError::Validation(_)));

    // Shrinking a paid manual order keeps 0 <= cents_paid <= total
    let manual = order::create_manual(
        pool,
        &ManualOrderCreate {
            user_id: Some(7),
            walk_in: None,
            lines: vec![line(entries[0], 3, vec![])],
        },
    )
    .await
    .expect("manual");
    order::mark_paid_in_full(pool, manual.id).await.expect("pay 2100");

    let updated = order::update_manual(pool, manual.id, &[line(entries[0], 1, vec![])])
        .await
        .expect("shrink");
    assert_eq!(updated.total, 700);
    assert_eq!(updated.cents_paid, 700);
}

#[tokio::test]
async fn walk_in_manual_orders_create_anonymous_users() {
    let (db, _dir) = test_db().await;
    let pool = &db.pool;

    let dal = seed_item(pool, "Dal", 700).await;
    let entries = seed_day(pool, date("2025-06-01"), &[dal]).await;

    let order = order::create_manual(
        pool,
        &ManualOrderCreate {
            user_id: None,
            walk_in: Some(WalkInCustomer {
                name: "Drop-in Dev".to_string(),
                phone_number: Some("+15550001111".to_string()),
            }),
            lines: vec![line(entries[0], 1, vec![])],
        },
    )
    .await
    .expect("walk-in order");

    let walk_in = kitchen_server::db::repository::user::get(pool, order.user_id)
        .await
        .expect("query")
        .expect("walk-in user");
    assert_eq!(walk_in.name, "Drop-in Dev");
    assert!(walk_in.is_anonymous);
    assert_eq!(walk_in.role, shared::models::Role::Customer);

    // Neither half without the other
    let err = order::create_manual(
        pool,
        &ManualOrderCreate {
            user_id: None,
            walk_in: None,
            lines: vec![line(entries[0], 1, vec![])],
        },
    )
    .await
    .expect_err("no user at all");
    assert!(matches!(err, RepoError::Validation(_)));

    let err = order::create_manual(
        pool,
        &ManualOrderCreate {
            user_id: Some(404_404),
            walk_in: None,
            lines: vec![line(entries[0], 1, vec![])],
        },
    )
    .await
    .expect_err("unknown user");
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[tokio::test]
async fn bagging_view_merges_and_batch_marks_by_person_and_day() {
    let (db, _dir) = test_db().await;
    let pool = &db.pool;

    seed_user(pool, 7, "Asha", Some("+15551112233")).await;
    let item = seed_item(pool, "Thali", 1000).await;
    let size = seed_group(pool, "Size", &[("Large", 300)]).await;
    attach_group(pool, item, size.group.id).await;
    let day = date("2025-06-01");
    let entries = seed_day(pool, day, &[item]).await;
    let large = option_id(&size, "Large");

    // Two orders, same (user, item, combo): quantities 1 and 2
    order::create(pool, 7, &[line(entries[0], 1, vec![large])])
        .await
        .expect("first");
    order::create(pool, 7, &[line(entries[0], 2, vec![large])])
        .await
        .expect("second");

    // Bag only the first underlying item
    let first_item: i64 = sqlx::query_scalar("SELECT MIN(id) FROM order_item")
        .fetch_one(pool)
        .await
        .expect("first item");
    sqlx::query("UPDATE order_item SET bagged_at = 1 WHERE id = ?")
        .bind(first_item)
        .execute(pool)
        .await
        .expect("bag one");

    let details = order::item_details_for_day(pool, day).await.expect("details");
    let persons = views::bagging_view(&details);
    assert_eq!(persons.len(), 1);
    assert_eq!(persons[0].lines.len(), 1, "identical combos merge");
    assert_eq!(persons[0].lines[0].quantity, 3);
    assert!(!persons[0].lines[0].all_bagged, "partial bagging reports unbagged");

    // Batch-mark the person: every unbagged item gets a timestamp
    let updated = order::mark_person_bagged(pool, 7, day).await.expect("mark");
    assert_eq!(updated, 1);
    let details = order::item_details_for_day(pool, day).await.expect("details");
    let persons = views::bagging_view(&details);
    assert!(persons[0].all_bagged);
    assert!(persons[0].lines[0].all_bagged);

    // And back
    let cleared = order::unmark_person_bagged(pool, 7, day).await.expect("unmark");
    assert_eq!(cleared, 2);
    let unbagged: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_item WHERE bagged_at IS NULL")
        .fetch_one(pool)
        .await
        .expect("count");
    assert_eq!(unbagged, 2);
}

#[tokio::test]
async fn cooking_view_aggregates_across_customers_for_the_day() {
    let (db, _dir) = test_db().await;
    let pool = &db.pool;

    seed_user(pool, 1, "Asha", None).await;
    seed_user(pool, 2, "Ben", None).await;
    let item = seed_item(pool, "Thali", 1000).await;
    let size = seed_group(pool, "Size", &[("Small", 0), ("Large", 300)]).await;
    attach_group(pool, item, size.group.id).await;
    let day = date("2025-06-01");
    let other_day = date("2025-06-02");
    let entries = seed_day(pool, day, &[item]).await;
    let other_entries = seed_day(pool, other_day, &[item]).await;
    let large = option_id(&size, "Large");
    let small = option_id(&size, "Small");

    order::create(pool, 1, &[line(entries[0], 2, vec![large])]).await.expect("a");
    order::create(pool, 2, &[line(entries[0], 1, vec![large])]).await.expect("b");
    order::create(pool, 2, &[line(entries[0], 1, vec![small])]).await.expect("c");
    // Different day must not leak into the view
    order::create(pool, 2, &[line(other_entries[0], 5, vec![large])]).await.expect("d");

    let details = order::item_details_for_day(pool, day).await.expect("details");
    let rows = views::cooking_view(&details);
    assert_eq!(rows.len(), 2);
    let large_row = rows.iter().find(|r| r.modifiers == vec!["Large"]).expect("large row");
    assert_eq!(large_row.quantity, 3);
    let small_row = rows.iter().find(|r| r.modifiers == vec!["Small"]).expect("small row");
    assert_eq!(small_row.quantity, 1);
}

#[tokio::test]
async fn payment_view_reconciles_owed_amounts() {
    let (db, _dir) = test_db().await;
    let pool = &db.pool;

    seed_user(pool, 1, "Asha", None).await;
    seed_user(pool, 2, "Ben", None).await;
    let item = seed_item(pool, "Thali", 1000).await;
    let day = date("2025-06-01");
    let entries = seed_day(pool, day, &[item]).await;

    let paid = order::create(pool, 1, &[line(entries[0], 1, vec![])]).await.expect("a");
    order::mark_paid_in_full(pool, paid.id).await.expect("pay");
    let unpaid = order::create(pool, 2, &[line(entries[0], 2, vec![])]).await.expect("b");

    let sources = order::payment_sources_for_day(pool, day).await.expect("sources");
    let rows = views::payment_view(&sources);
    assert_eq!(rows.len(), 2);
    // Unpaid first
    assert_eq!(rows[0].order_id, unpaid.id);
    assert_eq!(rows[0].amount_owed, 2000);
    assert!(!rows[0].is_paid_in_full);
    assert_eq!(rows[1].order_id, paid.id);
    assert_eq!(rows[1].amount_owed, 0);
    assert!(rows[1].is_paid_in_full);
}

#[tokio::test]
async fn dates_with_orders_lists_local_days_newest_first() {
    let (db, _dir) = test_db().await;
    let pool = &db.pool;

    seed_user(pool, 1, "Asha", None).await;
    let item = seed_item(pool, "Thali", 1000).await;
    let first = seed_day(pool, date("2025-06-01"), &[item]).await;
    let second = seed_day(pool, date("2025-06-03"), &[item]).await;

    order::create(pool, 1, &[line(first[0], 1, vec![])]).await.expect("a");
    order::create(pool, 1, &[line(second[0], 1, vec![])]).await.expect("b");

    let instants = order::dates_with_orders(pool).await.expect("dates");
    assert_eq!(instants.len(), 2);
    assert!(instants[0] > instants[1], "newest first");
}
