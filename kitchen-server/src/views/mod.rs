//! Order Aggregation Views
//!
//! Derived read models over one local service day:
//!
//! - **Cooking**: how many of each (item, modifier combination) to cook,
//!   across all customers.
//! - **Bagging**: a per-customer packing checklist with per-line and
//!   per-person completion flags.
//! - **Payment**: amount owed / paid reconciliation per order.
//!
//! Grouping keys are built from modifier option **IDs**, never display
//! names: two distinct options that happen to share a name must not
//! collide. The functions here are pure over rows the order repository
//! fetches; the repository owns the (local-day) SQL.

use std::collections::BTreeMap;

use shared::models::{BaggingLine, BaggingPerson, CookingRow, PaymentRow};

/// One order item row with its frozen modifier selections.
#[derive(Debug, Clone)]
pub struct ItemDetail {
    pub user_id: i64,
    pub user_name: String,
    pub user_phone: Option<String>,
    pub menu_item_id: i64,
    pub item_name: String,
    pub quantity: i64,
    pub bagged_at: Option<i64>,
    /// (option_id, option name) selections
    pub options: Vec<(i64, String)>,
}

/// One order row with owner info, input to the payment view.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PaymentSource {
    pub order_id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub user_phone: Option<String>,
    pub total: i64,
    pub cents_paid: i64,
    pub created_at: i64,
}

/// SKU-style grouping key: item plus the sorted, deduplicated option-ID
/// set.
fn combo_key(detail: &ItemDetail) -> (i64, Vec<i64>) {
    let mut option_ids: Vec<i64> = detail.options.iter().map(|(id, _)| *id).collect();
    option_ids.sort_unstable();
    option_ids.dedup();
    (detail.menu_item_id, option_ids)
}

/// Option names for display, ordered by option ID to match the key.
fn modifier_names(detail: &ItemDetail) -> Vec<String> {
    let mut options: Vec<(i64, String)> = detail.options.clone();
    options.sort_by_key(|(id, _)| *id);
    options.dedup_by_key(|(id, _)| *id);
    options.into_iter().map(|(_, name)| name).collect()
}

/// Cooking view: one row per distinct (item, modifier combination), with
/// summed quantity across all customers.
pub fn cooking_view(details: &[ItemDetail]) -> Vec<CookingRow> {
    let mut rows: BTreeMap<(i64, Vec<i64>), CookingRow> = BTreeMap::new();
    for detail in details {
        let key = combo_key(detail);
        rows.entry(key)
            .and_modify(|row| row.quantity += detail.quantity)
            .or_insert_with(|| CookingRow {
                menu_item_id: detail.menu_item_id,
                item_name: detail.item_name.clone(),
                modifiers: modifier_names(detail),
                quantity: detail.quantity,
            });
    }
    let mut result: Vec<CookingRow> = rows.into_values().collect();
    result.sort_by(|a, b| {
        (&a.item_name, a.menu_item_id, &a.modifiers).cmp(&(&b.item_name, b.menu_item_id, &b.modifiers))
    });
    result
}

/// Bagging view: per-user checklists. A merged line is `all_bagged` only
/// when every contributing order item is bagged; a person is `all_bagged`
/// only when every line is.
pub fn bagging_view(details: &[ItemDetail]) -> Vec<BaggingPerson> {
    struct LineAcc {
        item_name: String,
        modifiers: Vec<String>,
        quantity: i64,
        all_bagged: bool,
    }
    struct PersonAcc {
        name: String,
        phone: Option<String>,
        lines: BTreeMap<(i64, Vec<i64>), LineAcc>,
    }

    let mut persons: BTreeMap<i64, PersonAcc> = BTreeMap::new();
    for detail in details {
        let person = persons.entry(detail.user_id).or_insert_with(|| PersonAcc {
            name: detail.user_name.clone(),
            phone: detail.user_phone.clone(),
            lines: BTreeMap::new(),
        });
        let bagged = detail.bagged_at.is_some();
        person
            .lines
            .entry(combo_key(detail))
            .and_modify(|line| {
                line.quantity += detail.quantity;
                line.all_bagged &= bagged;
            })
            .or_insert_with(|| LineAcc {
                item_name: detail.item_name.clone(),
                modifiers: modifier_names(detail),
                quantity: detail.quantity,
                all_bagged: bagged,
            });
    }

    let display_names = disambiguate(
        persons
            .iter()
            .map(|(user_id, p)| (*user_id, p.name.clone(), p.phone.clone()))
            .collect(),
    );

    let mut result: Vec<BaggingPerson> = persons
        .into_iter()
        .map(|(user_id, person)| {
            let lines: Vec<BaggingLine> = person
                .lines
                .into_iter()
                .map(|((menu_item_id, _), line)| BaggingLine {
                    menu_item_id,
                    item_name: line.item_name,
                    modifiers: line.modifiers,
                    quantity: line.quantity,
                    all_bagged: line.all_bagged,
                })
                .collect();
            let all_bagged = lines.iter().all(|line| line.all_bagged);
            BaggingPerson {
                user_id,
                display_name: display_names.get(&user_id).cloned().unwrap_or(person.name),
                lines,
                all_bagged,
            }
        })
        .collect();
    result.sort_by(|a, b| (&a.display_name, a.user_id).cmp(&(&b.display_name, b.user_id)));
    result
}

/// Payment view: one row per order, unpaid first, then newest first.
pub fn payment_view(sources: &[PaymentSource]) -> Vec<PaymentRow> {
    let display_names = disambiguate(
        sources
            .iter()
            .map(|s| (s.user_id, s.user_name.clone(), s.user_phone.clone()))
            .collect(),
    );

    let mut rows: Vec<PaymentRow> = sources
        .iter()
        .map(|s| PaymentRow {
            order_id: s.order_id,
            user_id: s.user_id,
            display_name: display_names
                .get(&s.user_id)
                .cloned()
                .unwrap_or_else(|| s.user_name.clone()),
            total: s.total,
            cents_paid: s.cents_paid,
            amount_owed: s.total - s.cents_paid,
            is_paid_in_full: s.cents_paid >= s.total,
            created_at: s.created_at,
        })
        .collect();
    rows.sort_by(|a, b| {
        a.is_paid_in_full
            .cmp(&b.is_paid_in_full)
            .then(b.created_at.cmp(&a.created_at))
            .then(b.order_id.cmp(&a.order_id))
    });
    rows
}

/// Per-user display names: a name shared by several users gets a
/// ` (last-4-phone)` suffix; a user without a phone falls back to the
/// last digits of their ID.
fn disambiguate(users: Vec<(i64, String, Option<String>)>) -> BTreeMap<i64, String> {
    let mut name_owners: BTreeMap<&str, Vec<i64>> = BTreeMap::new();
    let mut by_id: BTreeMap<i64, (&str, Option<&str>)> = BTreeMap::new();
    for (user_id, name, phone) in &users {
        name_owners.entry(name.as_str()).or_default().push(*user_id);
        by_id.entry(*user_id).or_insert((name.as_str(), phone.as_deref()));
    }

    by_id
        .into_iter()
        .map(|(user_id, (name, phone))| {
            let owners = name_owners.get(name).map_or(0, |ids| {
                let mut distinct = ids.clone();
                distinct.sort_unstable();
                distinct.dedup();
                distinct.len()
            });
            let display = if owners > 1 {
                format!("{} ({})", name, last_four(phone, user_id))
            } else {
                name.to_string()
            };
            (user_id, display)
        })
        .collect()
}

fn last_four(phone: Option<&str>, user_id: i64) -> String {
    match phone {
        Some(phone) => {
            let digits: Vec<char> = phone.chars().filter(char::is_ascii_digit).collect();
            if digits.len() >= 4 {
                digits[digits.len() - 4..].iter().collect()
            } else {
                digits.iter().collect()
            }
        }
        None => {
            let id = user_id.to_string();
            if id.len() >= 4 {
                id[id.len() - 4..].to_string()
            } else {
                id
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(
        user: (i64, &str, Option<&str>),
        item: (i64, &str),
        quantity: i64,
        bagged: bool,
        options: &[(i64, &str)],
    ) -> ItemDetail {
        ItemDetail {
            user_id: user.0,
            user_name: user.1.to_string(),
            user_phone: user.2.map(str::to_string),
            menu_item_id: item.0,
            item_name: item.1.to_string(),
            quantity,
            bagged_at: bagged.then_some(1_700_000_000_000),
            options: options.iter().map(|(id, name)| (*id, name.to_string())).collect(),
        }
    }

    // ==================== Cooking ====================

    #[test]
    fn cooking_merges_identical_combos_across_customers() {
        let details = vec![
            detail((1, "Asha", None), (10, "Dal"), 2, false, &[(5, "Spicy")]),
            detail((2, "Ben", None), (10, "Dal"), 1, false, &[(5, "Spicy")]),
        ];
        let rows = cooking_view(&details);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quantity, 3);
        assert_eq!(rows[0].modifiers, vec!["Spicy".to_string()]);
    }

    #[test]
    fn cooking_key_ignores_option_order() {
        let details = vec![
            detail((1, "Asha", None), (10, "Dal"), 1, false, &[(5, "Spicy"), (6, "Ghee")]),
            detail((2, "Ben", None), (10, "Dal"), 1, false, &[(6, "Ghee"), (5, "Spicy")]),
        ];
        let rows = cooking_view(&details);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quantity, 2);
    }

    #[test]
    fn cooking_groups_by_option_ids_not_names() {
        // Two distinct options sharing a display name must not collide
        let details = vec![
            detail((1, "Asha", None), (10, "Dal"), 1, false, &[(5, "Large")]),
            detail((2, "Ben", None), (10, "Dal"), 1, false, &[(9, "Large")]),
        ];
        let rows = cooking_view(&details);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn cooking_separates_different_items() {
        let details = vec![
            detail((1, "Asha", None), (10, "Dal"), 1, false, &[]),
            detail((1, "Asha", None), (11, "Rice"), 2, false, &[]),
        ];
        let rows = cooking_view(&details);
        assert_eq!(rows.len(), 2);
    }

    // ==================== Bagging ====================

    #[test]
    fn bagging_merges_lines_and_ands_bagged_flags() {
        // Same (user, item, combo): quantities 1 and 2, one bagged one not
        let details = vec![
            detail((1, "Asha", None), (10, "Dal"), 1, true, &[(5, "Spicy")]),
            detail((1, "Asha", None), (10, "Dal"), 2, false, &[(5, "Spicy")]),
        ];
        let persons = bagging_view(&details);
        assert_eq!(persons.len(), 1);
        assert_eq!(persons[0].lines.len(), 1);
        assert_eq!(persons[0].lines[0].quantity, 3);
        assert!(!persons[0].lines[0].all_bagged);
        assert!(!persons[0].all_bagged);
    }

    #[test]
    fn bagging_reports_all_bagged_once_every_item_is() {
        let details = vec![
            detail((1, "Asha", None), (10, "Dal"), 1, true, &[(5, "Spicy")]),
            detail((1, "Asha", None), (10, "Dal"), 2, true, &[(5, "Spicy")]),
            detail((1, "Asha", None), (11, "Rice"), 1, true, &[]),
        ];
        let persons = bagging_view(&details);
        assert_eq!(persons.len(), 1);
        assert!(persons[0].lines.iter().all(|l| l.all_bagged));
        assert!(persons[0].all_bagged);
    }

    #[test]
    fn bagging_disambiguates_duplicate_names_with_phone_digits() {
        let details = vec![
            detail((1, "Priya", Some("+1 555 111 2233")), (10, "Dal"), 1, false, &[]),
            detail((2, "Priya", Some("+1 555 444 9876")), (10, "Dal"), 1, false, &[]),
            detail((3, "Maya", Some("+1 555 000 1111")), (10, "Dal"), 1, false, &[]),
        ];
        let persons = bagging_view(&details);
        let names: Vec<&str> = persons.iter().map(|p| p.display_name.as_str()).collect();
        assert!(names.contains(&"Priya (2233)"));
        assert!(names.contains(&"Priya (9876)"));
        assert!(names.contains(&"Maya"));
    }

    // ==================== Payment ====================

    fn source(order_id: i64, user: (i64, &str), total: i64, paid: i64, created_at: i64) -> PaymentSource {
        PaymentSource {
            order_id,
            user_id: user.0,
            user_name: user.1.to_string(),
            user_phone: None,
            total,
            cents_paid: paid,
            created_at,
        }
    }

    #[test]
    fn payment_computes_owed_and_paid_flags() {
        let rows = payment_view(&[source(1, (1, "Asha"), 2600, 600, 100)]);
        assert_eq!(rows[0].amount_owed, 2000);
        assert!(!rows[0].is_paid_in_full);

        let rows = payment_view(&[source(1, (1, "Asha"), 2600, 2600, 100)]);
        assert_eq!(rows[0].amount_owed, 0);
        assert!(rows[0].is_paid_in_full);
    }

    #[test]
    fn payment_sorts_unpaid_first_then_newest() {
        let rows = payment_view(&[
            source(1, (1, "Asha"), 1000, 1000, 300),
            source(2, (2, "Ben"), 1000, 0, 100),
            source(3, (3, "Cara"), 1000, 0, 200),
        ]);
        let ids: Vec<i64> = rows.iter().map(|r| r.order_id).collect();
        // Unpaid (newest first), then paid
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn payment_disambiguates_like_bagging() {
        let rows = payment_view(&[
            source(1, (1, "Priya"), 1000, 0, 100),
            source(2, (2, "Priya"), 1000, 0, 200),
        ]);
        assert_ne!(rows[0].display_name, rows[1].display_name);
    }
}
