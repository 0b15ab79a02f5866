//! Client Cart
//!
//! The cart lives on the client (persisted locally); the server never
//! stores it. It is a map from canonical SKU key to quantity, so
//! identical selections merge into one line no matter the interaction
//! order.
//!
//! Because the menu can change between sessions, a loaded cart is
//! reconciled against the current menu: lines whose entry, item, group
//! attachment, or option no longer exists are dropped and logged, never
//! raised. Stale local state must not block checkout of the lines that
//! are still valid.

mod sku;

pub use sku::{SkuKey, SkuKeyError};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::MenuEntryFull;
use crate::pricing;

/// One cart line: only the quantity; everything else is in the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub quantity: i64,
}

/// The client-held cart, keyed by canonical SKU key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub lines: BTreeMap<String, CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn quantity_of(&self, key: &SkuKey) -> i64 {
        self.lines.get(&key.encode()).map_or(0, |line| line.quantity)
    }

    /// Add `quantity` (may be negative) to the line for `key`. Lines never
    /// persist at quantity <= 0: reducing to zero or below removes the
    /// line entirely.
    pub fn add(&mut self, key: &SkuKey, quantity: i64) {
        let encoded = key.encode();
        let next = self.lines.get(&encoded).map_or(0, |line| line.quantity) + quantity;
        if next <= 0 {
            self.lines.remove(&encoded);
        } else {
            self.lines.insert(encoded, CartLine { quantity: next });
        }
    }

    /// Set the line for `key` to an exact quantity (<= 0 removes it).
    pub fn set_quantity(&mut self, key: &SkuKey, quantity: i64) {
        let encoded = key.encode();
        if quantity <= 0 {
            self.lines.remove(&encoded);
        } else {
            self.lines.insert(encoded, CartLine { quantity });
        }
    }

    pub fn remove(&mut self, key: &SkuKey) {
        self.lines.remove(&key.encode());
    }

    /// Repair-on-read reconciliation against the current menu.
    ///
    /// Every key is re-validated: it must parse, its menu entry must
    /// exist with a matching item ID, every selected group must still be
    /// attached to that item, and every selected option must still be
    /// active in that group. Failing keys are dropped and returned so the
    /// caller can rewrite its persisted cart; nothing is raised.
    pub fn reconcile(&mut self, menu: &[MenuEntryFull]) -> Vec<String> {
        let mut dropped = Vec::new();
        self.lines.retain(|encoded, line| {
            match validate_key(encoded, line.quantity, menu) {
                Ok(()) => true,
                Err(reason) => {
                    tracing::warn!(key = %encoded, %reason, "dropping stale cart line");
                    dropped.push(encoded.clone());
                    false
                }
            }
        });
        dropped
    }

    /// Client-side preview total in cents, derived from current menu
    /// prices with the shared pricing functions. Returns `None` if any
    /// line is stale; reconcile first.
    pub fn preview_total(&self, menu: &[MenuEntryFull]) -> Option<i64> {
        let mut total = 0;
        for (encoded, line) in &self.lines {
            let key = SkuKey::parse(encoded).ok()?;
            let entry = find_entry(menu, key.menu_entry_id)?;
            let mut deltas = Vec::new();
            for (group_id, option_ids) in &key.selections {
                let group = entry
                    .modifier_groups
                    .iter()
                    .find(|g| g.group.id == *group_id)?;
                for option_id in option_ids {
                    let option = group.options.iter().find(|o| o.id == *option_id)?;
                    deltas.push(option.price_delta);
                }
            }
            total += pricing::line_total(entry.item.base_price, &deltas, line.quantity);
        }
        Some(total)
    }
}

fn find_entry(menu: &[MenuEntryFull], entry_id: i64) -> Option<&MenuEntryFull> {
    menu.iter().find(|e| e.entry.id == entry_id)
}

fn validate_key(encoded: &str, quantity: i64, menu: &[MenuEntryFull]) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("non-positive quantity");
    }
    let key = SkuKey::parse(encoded).map_err(|_| "unparseable key")?;
    let Some(entry) = find_entry(menu, key.menu_entry_id) else {
        return Err("menu entry gone");
    };
    if entry.item.id != key.menu_item_id || entry.entry.menu_item_id != key.menu_item_id {
        return Err("item mismatch");
    }
    for (group_id, option_ids) in &key.selections {
        let Some(group) = entry
            .modifier_groups
            .iter()
            .find(|g| g.group.id == *group_id)
        else {
            return Err("modifier group detached");
        };
        for option_id in option_ids {
            if !group.options.iter().any(|o| o.id == *option_id) {
                return Err("modifier option gone");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MenuEntry, MenuItem, ModifierGroup, ModifierGroupFull, ModifierOption};

    fn item(id: i64, base_price: i64) -> MenuItem {
        MenuItem {
            id,
            name: format!("item-{id}"),
            description: None,
            base_price,
            created_at: 0,
            updated_at: 0,
            deleted_at: None,
        }
    }

    fn group(id: i64, option_ids_and_deltas: &[(i64, i64)]) -> ModifierGroupFull {
        ModifierGroupFull {
            group: ModifierGroup {
                id,
                name: format!("group-{id}"),
                min_select: 0,
                max_select: None,
                created_at: 0,
                updated_at: 0,
                deleted_at: None,
            },
            options: option_ids_and_deltas
                .iter()
                .map(|(option_id, delta)| ModifierOption {
                    id: *option_id,
                    group_id: id,
                    name: format!("option-{option_id}"),
                    price_delta: *delta,
                    sort_order: 0,
                    created_at: 0,
                    updated_at: 0,
                    deleted_at: None,
                })
                .collect(),
        }
    }

    fn entry(entry_id: i64, item_id: i64, base_price: i64, groups: Vec<ModifierGroupFull>) -> MenuEntryFull {
        MenuEntryFull {
            entry: MenuEntry {
                id: entry_id,
                date: 0,
                menu_item_id: item_id,
                sort_order: 0,
                is_custom: false,
                created_at: 0,
            },
            item: item(item_id, base_price),
            modifier_groups: groups,
        }
    }

    #[test]
    fn identical_keys_merge_quantities() {
        let mut cart = Cart::new();
        let a = SkuKey::new(1, 2).with_selection(3, 4).with_selection(3, 5);
        let b = SkuKey::new(1, 2).with_selection(3, 5).with_selection(3, 4);

        cart.add(&a, 2);
        cart.add(&b, 3);

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.quantity_of(&a), 5);
    }

    #[test]
    fn different_keys_stay_separate_lines() {
        let mut cart = Cart::new();
        cart.add(&SkuKey::new(1, 2).with_selection(3, 4), 1);
        cart.add(&SkuKey::new(1, 2).with_selection(3, 5), 1);
        assert_eq!(cart.lines.len(), 2);
    }

    #[test]
    fn reducing_to_zero_removes_the_line() {
        let mut cart = Cart::new();
        let key = SkuKey::new(1, 2);
        cart.add(&key, 2);
        cart.add(&key, -2);
        assert!(cart.is_empty());

        cart.add(&key, 1);
        cart.add(&key, -5);
        assert!(cart.is_empty());
        assert_eq!(cart.quantity_of(&key), 0);
    }

    #[test]
    fn reconcile_keeps_valid_lines() {
        let menu = vec![entry(10, 20, 1000, vec![group(30, &[(40, 0), (41, 300)])])];
        let mut cart = Cart::new();
        cart.add(&SkuKey::new(10, 20).with_selection(30, 41), 2);

        let dropped = cart.reconcile(&menu);

        assert!(dropped.is_empty());
        assert_eq!(cart.lines.len(), 1);
    }

    #[test]
    fn reconcile_drops_line_when_option_removed() {
        // Key references option 41; the menu update removed it
        let menu = vec![entry(10, 20, 1000, vec![group(30, &[(40, 0)])])];
        let mut cart = Cart::new();
        cart.add(&SkuKey::new(10, 20).with_selection(30, 41), 2);

        let dropped = cart.reconcile(&menu);

        assert_eq!(dropped.len(), 1);
        assert!(cart.is_empty());
    }

    #[test]
    fn reconcile_drops_entry_and_item_mismatches() {
        let menu = vec![entry(10, 20, 1000, vec![])];
        let mut cart = Cart::new();
        // Entry no longer on the menu
        cart.add(&SkuKey::new(11, 20), 1);
        // Entry exists but now points at a different item
        cart.add(&SkuKey::new(10, 21), 1);
        // Group never attached to this item
        cart.add(&SkuKey::new(10, 20).with_selection(30, 40), 1);

        let dropped = cart.reconcile(&menu);

        assert_eq!(dropped.len(), 3);
        assert!(cart.is_empty());
    }

    #[test]
    fn reconcile_drops_unparseable_persisted_keys() {
        let menu = vec![entry(10, 20, 1000, vec![])];
        let mut cart = Cart::new();
        cart.lines
            .insert("not-a-key".to_string(), CartLine { quantity: 1 });

        let dropped = cart.reconcile(&menu);

        assert_eq!(dropped, vec!["not-a-key".to_string()]);
        assert!(cart.is_empty());
    }

    #[test]
    fn preview_total_matches_server_pricing() {
        let menu = vec![entry(10, 20, 1000, vec![group(30, &[(40, 0), (41, 300)])])];
        let mut cart = Cart::new();
        // Large x2: unit 1300, line 2600
        cart.add(&SkuKey::new(10, 20).with_selection(30, 41), 2);

        assert_eq!(cart.preview_total(&menu), Some(2600));
    }

    #[test]
    fn preview_total_is_none_for_stale_lines() {
        let menu = vec![entry(10, 20, 1000, vec![])];
        let mut cart = Cart::new();
        cart.add(&SkuKey::new(99, 20), 1);
        assert_eq!(cart.preview_total(&menu), None);
    }

    #[test]
    fn cart_round_trips_through_json() {
        let mut cart = Cart::new();
        cart.add(&SkuKey::new(10, 20).with_selection(30, 41), 2);
        let json = serde_json::to_string(&cart).unwrap();
        let loaded: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, cart);
    }
}
