//! Single-pass population of the form body, plus document finalizers.
//!
//! Every line item in the report is resolved to a slot (exact table hit,
//! then fuzzy fallback), located in the template, and rendered. Items
//! that cannot be resolved or located are logged and skipped; the only
//! hard failure is a template with no section markers at all.

use std::collections::HashMap;

use tracing::{debug, warn};
use trec_document::{Document, NodeId};
use trec_types::InspectionReport;

use crate::error::{ReportError, ReportResult};
use crate::format::apply_line_item;
use crate::fuzzy::fuzzy_match;
use crate::locate::{locate_slot, section_items};
use crate::mapping::{exact_match, is_informational, SlotDescriptor};

/// Styles backing the rendered fragments; appended to the template's own
/// stylesheet so printing and on-screen review both honor them.
const FORMATTING_CSS: &str = "
.comment-item { margin: 8px 0; padding: 4px 0; line-height: 1.5; }
.comment-item p { margin: 4px 0; }
.media-container { margin: 10px 0; clear: both; page-break-inside: avoid; }
.media-container img, .media-container video { max-width: 250px !important; max-height: 200px !important; display: block; clear: both; border: 1px solid #ddd; padding: 2px; margin: 8px 0; }
.comments { word-wrap: break-word; height: auto !important; min-height: 0.5in; overflow: visible !important; max-height: none !important; }
.comments-inline { height: auto !important; overflow: visible !important; }
.item { page-break-inside: avoid; min-height: auto; }
";

/// Resolves a line-item name to its form slot: informational names resolve
/// to nothing, known names hit the table exactly, and anything else falls
/// through to the word-overlap matcher.
pub fn resolve_slot(line_item_name: &str) -> Option<&'static SlotDescriptor> {
    if is_informational(line_item_name) {
        return None;
    }
    exact_match(line_item_name).or_else(|| fuzzy_match(line_item_name))
}

/// Populates every section of the form from the report in one pass.
///
/// Each slot is filled at most once per run; later items resolving to an
/// already-filled slot merge into it as additional findings. Fails only
/// when the template has no section-title markers.
pub fn populate_sections(doc: &mut Document, report: &InspectionReport) -> ReportResult<()> {
    if doc.elements_with_class("section-title").is_empty() {
        return Err(ReportError::MissingSectionMarkers);
    }

    inject_formatting_css(doc);

    let mut processed: HashMap<String, NodeId> = HashMap::new();
    for section in &report.inspection.sections {
        for line_item in &section.line_items {
            if line_item.is_empty() {
                continue;
            }
            if is_informational(&line_item.name) {
                debug!(item = %line_item.name, "informational item, not mapped");
                continue;
            }
            let Some(slot) = resolve_slot(&line_item.name) else {
                warn!(item = %line_item.name, "no slot mapping, item skipped");
                continue;
            };

            let key = slot.slot_key();
            if let Some(&node) = processed.get(&key) {
                debug!(item = %line_item.name, slot = %key, "merging into filled slot");
                apply_line_item(doc, node, line_item, false);
                continue;
            }

            let Some(node) = locate_slot(
                doc,
                slot.section_index,
                slot.item_code,
                slot.canonical_title,
            ) else {
                warn!(item = %line_item.name, slot = %key, "slot not found in template");
                continue;
            };
            apply_line_item(doc, node, line_item, true);
            processed.insert(key, node);
        }
    }
    Ok(())
}

/// Appends the rendering styles to the template's first style element,
/// creating one under `<head>` when the template has none. Appending keeps
/// repeated calls additive rather than destructive.
fn inject_formatting_css(doc: &mut Document) {
    let style = match doc.elements_with_tag("style").first().copied() {
        Some(node) => node,
        None => {
            let Some(head) = doc.elements_with_tag("head").first().copied() else {
                return;
            };
            let style = doc.create_element("style");
            doc.append_child(head, style);
            style
        }
    };
    doc.append_text(style, FORMATTING_CSS);
}

/// Removes sections that ended the run with no findings and no marked
/// checkboxes: the marker and its items are detached together.
pub fn remove_empty_sections(doc: &mut Document) {
    let markers = doc.elements_with_class("section-title");

    let mut to_remove: Vec<NodeId> = Vec::new();
    for marker in markers {
        let items = section_items(doc, marker);
        if items.is_empty() || items.iter().any(|&item| item_has_data(doc, item)) {
            continue;
        }
        debug!(
            title = %doc.text_content(marker).trim(),
            "removing empty section"
        );
        to_remove.push(marker);
        to_remove.extend(items);
    }

    for node in to_remove {
        doc.detach(node);
    }
}

fn item_has_data(doc: &Document, item: NodeId) -> bool {
    let has_comment_text = doc
        .descendants(item)
        .filter(|&n| {
            doc.has_class(n, "comments") && doc.attr(n, "contenteditable") == Some("true")
        })
        .any(|n| !doc.text_content(n).trim().is_empty());
    if has_comment_text {
        return true;
    }

    doc.first_descendant_with_class(item, "checks")
        .map(|checks| {
            doc.descendants(checks)
                .any(|n| doc.tag(n) == Some("input") && doc.attr(n, "checked").is_some())
        })
        .unwrap_or(false)
}

/// Counts `.page` elements and writes the total into every page-count
/// footer input. Runs after empty-section removal so removed pages are
/// not counted.
pub fn finalize_page_numbers(doc: &mut Document) {
    let total = doc.elements_with_class("page").len().to_string();

    let mut inputs: Vec<NodeId> = Vec::new();
    for footer in doc.elements_with_class("pagecount-center") {
        inputs.extend(
            doc.descendants(footer)
                .filter(|&n| doc.tag(n) == Some("input") && doc.attr(n, "type") == Some("text")),
        );
    }
    for input in inputs {
        doc.set_attr(input, "value", &total);
    }
}
