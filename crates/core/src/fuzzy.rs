//! Word-overlap fallback for line-item names missing from the mapping table.
//!
//! Deliberately crude: both sides are lower-cased and split on whitespace
//! into token sets, and the first table entry (declaration order) sharing at
//! least two tokens wins. The threshold of 2 and the order-sensitive
//! tie-break are part of the observable contract — changing either changes
//! which items silently match.

use std::collections::HashSet;

use crate::mapping::{SlotDescriptor, LINE_ITEM_MAPPING};

/// Resolves an unrecognized line-item name by token overlap, or `None` when
/// no table entry shares at least two tokens with it.
pub fn fuzzy_match(line_item_name: &str) -> Option<&'static SlotDescriptor> {
    let name_tokens = token_set(line_item_name);
    if name_tokens.is_empty() {
        return None;
    }

    for (mapped_name, slot) in LINE_ITEM_MAPPING {
        let mapped_tokens = token_set(mapped_name);
        if mapped_tokens.is_empty() {
            continue;
        }
        let shared = mapped_tokens.intersection(&name_tokens).count();
        if shared >= 2 {
            return Some(slot);
        }
    }

    None
}

fn token_set(name: &str) -> HashSet<String> {
    name.to_lowercase()
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}
