//! Finds the template node for a form slot.
//!
//! Template markup drifts from the mapping table over time (manual edits to
//! the template), so resolution runs three tiers: the item-code label is
//! authoritative, the canonical title is a safety net, and the section's
//! first item is a last resort that still produces a merge point instead of
//! silently dropping a finding.

use trec_document::{Document, NodeId};

/// Locates the `.item` element for `(section_index, item_code)` within
/// `doc`, or `None` when the section index is out of range or the section
/// holds no item elements at all.
pub fn locate_slot(
    doc: &Document,
    section_index: usize,
    item_code: char,
    canonical_title: &str,
) -> Option<NodeId> {
    let markers = doc.elements_with_class("section-title");
    let marker = *markers.get(section_index)?;
    let items = section_items(doc, marker);

    // First pass: item-code label, trailing punctuation stripped.
    let code = item_code.to_string();
    for &item in &items {
        if let Some(label) = code_label(doc, item) {
            if label.trim().trim_end_matches('.') == code {
                return Some(item);
            }
        }
    }

    // Second pass: any canonical-title token appearing in the displayed
    // title (leading "X. " prefix removed).
    let title_tokens: Vec<String> = canonical_title
        .to_lowercase()
        .split_whitespace()
        .map(str::to_owned)
        .collect();
    for &item in &items {
        if let Some(title) = doc.first_descendant_with_class(item, "item-title") {
            let text = doc.text_content(title);
            let display = strip_code_prefix(text.trim()).to_lowercase();
            if title_tokens.iter().any(|token| display.contains(token)) {
                return Some(item);
            }
        }
    }

    items.first().copied()
}

/// The `.item` element siblings between a section-title marker and the next
/// marker (or the end of the marker's parent).
pub(crate) fn section_items(doc: &Document, marker: NodeId) -> Vec<NodeId> {
    let Some(parent) = doc.parent(marker) else {
        return Vec::new();
    };
    let siblings = doc.children(parent);
    let Some(start) = siblings.iter().position(|&n| n == marker) else {
        return Vec::new();
    };

    let mut items = Vec::new();
    for &sibling in &siblings[start + 1..] {
        if !doc.is_element(sibling) {
            continue;
        }
        if doc.has_class(sibling, "section-title") {
            break;
        }
        if doc.has_class(sibling, "item") {
            items.push(sibling);
        }
    }
    items
}

fn code_label(doc: &Document, item: NodeId) -> Option<String> {
    let title = doc.first_descendant_with_class(item, "item-title")?;
    let code = doc.first_descendant_with_class(title, "code")?;
    Some(doc.text_content(code))
}

/// Strips a leading "<Letter>. " prefix from a displayed item title.
fn strip_code_prefix(title: &str) -> &str {
    let mut chars = title.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), Some('.')) if letter.is_ascii_uppercase() => chars.as_str().trim_start(),
        _ => title,
    }
}
