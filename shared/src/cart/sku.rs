//! SKU Key Codec
//!
//! A SKU key is the canonical string form of one cart line:
//!
//! ```text
//! {menuEntryId}:{menuItemId}|{groupId}({optId;optId;...}),{groupId}({...})
//! ```
//!
//! Groups with no selected options are omitted; option IDs within a group
//! are deduplicated and sorted ascending; groups are sorted ascending by
//! group ID. Two selections that differ only in interaction order encode
//! to the same key, so identical cart lines merge by key.
//!
//! The `|` separator is always present, even with no selections.
//!
//! Parsing is total and strict: every embedded ID must be all digits with
//! no leading zero, and any framing deviation, empty option list, or
//! duplicated group/option is rejected. `parse(encode(k)) == k` for every
//! valid key.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Codec errors. Parsing never panics; malformed input fails with one of
/// these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkuKeyError {
    #[error("malformed sku key: {0}")]
    Malformed(&'static str),

    #[error("invalid id in sku key: {0:?}")]
    InvalidId(String),
}

/// One cart line identity: menu entry, item, and the selected options per
/// modifier group. `BTreeMap`/`BTreeSet` keep the canonical ordering and
/// deduplication by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkuKey {
    pub menu_entry_id: i64,
    pub menu_item_id: i64,
    pub selections: BTreeMap<i64, BTreeSet<i64>>,
}

impl SkuKey {
    pub fn new(menu_entry_id: i64, menu_item_id: i64) -> Self {
        Self {
            menu_entry_id,
            menu_item_id,
            selections: BTreeMap::new(),
        }
    }

    /// Add one selected option. Re-selecting the same option is a no-op.
    pub fn select(&mut self, group_id: i64, option_id: i64) {
        self.selections.entry(group_id).or_default().insert(option_id);
    }

    /// Builder form of [`select`](Self::select).
    pub fn with_selection(mut self, group_id: i64, option_id: i64) -> Self {
        self.select(group_id, option_id);
        self
    }

    /// All selected option IDs across groups, ascending.
    pub fn option_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.selections.values().flatten().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Canonical string encoding.
    pub fn encode(&self) -> String {
        let groups: Vec<String> = self
            .selections
            .iter()
            .filter(|(_, options)| !options.is_empty())
            .map(|(group_id, options)| {
                let opts: Vec<String> = options.iter().map(|id| id.to_string()).collect();
                format!("{}({})", group_id, opts.join(";"))
            })
            .collect();
        format!(
            "{}:{}|{}",
            self.menu_entry_id,
            self.menu_item_id,
            groups.join(",")
        )
    }

    /// Strict inverse of [`encode`](Self::encode).
    pub fn parse(input: &str) -> Result<Self, SkuKeyError> {
        let (entry_part, rest) = input
            .split_once(':')
            .ok_or(SkuKeyError::Malformed("missing ':' separator"))?;
        let (item_part, mods_part) = rest
            .split_once('|')
            .ok_or(SkuKeyError::Malformed("missing '|' separator"))?;

        let mut key = SkuKey::new(parse_id(entry_part)?, parse_id(item_part)?);

        if mods_part.is_empty() {
            return Ok(key);
        }

        for segment in mods_part.split(',') {
            let body = segment
                .strip_suffix(')')
                .ok_or(SkuKeyError::Malformed("group not closed with ')'"))?;
            let (group_part, options_part) = body
                .split_once('(')
                .ok_or(SkuKeyError::Malformed("group missing '('"))?;
            let group_id = parse_id(group_part)?;
            if options_part.is_empty() {
                return Err(SkuKeyError::Malformed("empty option list"));
            }

            let mut options = BTreeSet::new();
            for option_part in options_part.split(';') {
                if !options.insert(parse_id(option_part)?) {
                    return Err(SkuKeyError::Malformed("duplicate option in group"));
                }
            }
            if key.selections.insert(group_id, options).is_some() {
                return Err(SkuKeyError::Malformed("duplicate group"));
            }
        }

        Ok(key)
    }
}

impl fmt::Display for SkuKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for SkuKey {
    type Err = SkuKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SkuKey::parse(s)
    }
}

/// Strict identifier syntax: non-empty, ASCII digits only, no leading
/// zero (except `"0"` itself), and in i64 range.
fn parse_id(part: &str) -> Result<i64, SkuKeyError> {
    if part.is_empty()
        || !part.bytes().all(|b| b.is_ascii_digit())
        || (part.len() > 1 && part.starts_with('0'))
    {
        return Err(SkuKeyError::InvalidId(part.to_string()));
    }
    part.parse::<i64>()
        .map_err(|_| SkuKeyError::InvalidId(part.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_without_selections() {
        assert_eq!(SkuKey::new(12, 7).encode(), "12:7|");
    }

    #[test]
    fn encodes_sorted_groups_and_options() {
        let key = SkuKey::new(12, 7)
            .with_selection(9, 31)
            .with_selection(2, 40)
            .with_selection(2, 5);
        assert_eq!(key.encode(), "12:7|2(5;40),9(31)");
    }

    #[test]
    fn selection_order_does_not_change_key() {
        let a = SkuKey::new(3, 4)
            .with_selection(10, 2)
            .with_selection(10, 1)
            .with_selection(5, 9);
        let b = SkuKey::new(3, 4)
            .with_selection(5, 9)
            .with_selection(10, 1)
            .with_selection(10, 2);
        assert_eq!(a.encode(), b.encode());
        assert_eq!(a, b);
    }

    #[test]
    fn reselecting_an_option_dedupes() {
        let mut key = SkuKey::new(3, 4);
        key.select(10, 2);
        key.select(10, 2);
        assert_eq!(key.encode(), "3:4|10(2)");
    }

    #[test]
    fn round_trips() {
        let keys = [
            SkuKey::new(1, 2),
            SkuKey::new(0, 9).with_selection(1, 0),
            SkuKey::new(12, 7)
                .with_selection(9, 31)
                .with_selection(2, 40)
                .with_selection(2, 5),
        ];
        for key in keys {
            let encoded = key.encode();
            assert_eq!(SkuKey::parse(&encoded).unwrap(), key, "{encoded}");
        }
    }

    #[test]
    fn rejects_malformed_framing() {
        for input in [
            "",
            "12",
            "12:7",
            ":7|",
            "12:|",
            "12:7|2(5",
            "12:7|2)5(",
            "12:7|2()",
            "12:7|(5)",
            "12:7|2(5),",
            "12:7|,2(5)",
        ] {
            assert!(SkuKey::parse(input).is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn rejects_bad_ids() {
        for input in [
            "a:7|",
            "12:7b|",
            "-1:7|",
            "012:7|",
            "12:7|02(5)",
            "12:7|2(05)",
            "99999999999999999999:7|",
        ] {
            assert!(SkuKey::parse(input).is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn rejects_duplicates() {
        assert_eq!(
            SkuKey::parse("12:7|2(5;5)"),
            Err(SkuKeyError::Malformed("duplicate option in group"))
        );
        assert_eq!(
            SkuKey::parse("12:7|2(5),2(6)"),
            Err(SkuKeyError::Malformed("duplicate group"))
        );
    }

    #[test]
    fn parse_failures_are_errors_not_panics() {
        // Grammar rejection is a value, never a crash
        for input in ["||", "::", "1:2|3(", "1:2|3)"] {
            let _ = SkuKey::parse(input);
        }
    }
}
