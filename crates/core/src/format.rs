//! Renders a line item's status and findings into a located form slot.
//!
//! The first line item to reach a slot replaces the slot's comment-area
//! content and lifts the template's height clipping so long findings flow;
//! every later line item reaching the same slot appends after a bold
//! "Additional Finding:" divider, preserving prior content. A merged item's
//! status is applied to the checkbox group again (its comments only append,
//! its status does not).
//!
//! Comment, photo, and video fragments are built as real nodes; the
//! document serializer escapes every user-supplied string on the way out.

use std::cmp::Ordering;

use trec_document::{Document, NodeId};
use trec_types::{Comment, InspectionStatus, LineItem, Photo, Video};

const IMG_STYLE: &str = "max-width: 250px; max-height: 200px; margin: 8px 0; display: block; clear: both; border: 1px solid #ddd; padding: 2px;";
const VIDEO_STYLE: &str =
    "max-width: 250px; max-height: 200px; margin: 8px 0; display: block; clear: both;";
const CAPTION_STYLE: &str = "font-size: 0.85em; font-style: italic; margin: 4px 0;";
const MEDIA_CONTAINER_STYLE: &str = "margin: 10px 0; clear: both;";
const COMMENT_DIVIDER_STYLE: &str = "margin: 12px 0; border: none; border-top: 1px solid #eee;";
const FINDING_DIVIDER_STYLE: &str = "margin: 12px 0; border: none; border-top: 2px solid #ccc;";
const FINDING_LABEL_STYLE: &str = "font-weight: bold; margin: 8px 0;";

/// Overrides template CSS that would clip long comment content.
const COMMENTS_STYLE: &str = "overflow: visible !important; height: auto !important; min-height: 0.5in; max-height: none !important;";
const COMMENTS_INLINE_STYLE: &str = "height: auto; overflow: visible;";

/// Applies one line item to a slot. `first_fill` distinguishes the initial
/// population of a slot from a merge into an already-filled one.
pub(crate) fn apply_line_item(
    doc: &mut Document,
    slot: NodeId,
    line_item: &LineItem,
    first_fill: bool,
) {
    if let Some(status) = line_item.status() {
        mark_status_checkbox(doc, slot, status);
    }

    if line_item.comments.is_empty() {
        // Status-only item: checkbox marked, comment area untouched.
        return;
    }
    let Some(container) = comments_container(doc, slot) else {
        return;
    };
    let rendered = render_comments(doc, &line_item.comments);
    if rendered.is_empty() {
        return;
    }

    if first_fill {
        doc.clear_children(container);
        for node in rendered {
            doc.append_child(container, node);
        }
        doc.set_attr(container, "style", COMMENTS_STYLE);
        if let Some(inline) = doc.first_descendant_with_class(slot, "comments-inline") {
            doc.set_attr(inline, "style", COMMENTS_INLINE_STYLE);
        }
    } else {
        let divider = doc.create_element("hr");
        doc.set_attr(divider, "style", FINDING_DIVIDER_STYLE);
        doc.append_child(container, divider);

        let label = doc.create_element("p");
        doc.set_attr(label, "style", FINDING_LABEL_STYLE);
        let label_text = doc.create_text("Additional Finding:");
        doc.append_child(label, label_text);
        doc.append_child(container, label);

        for node in rendered {
            doc.append_child(container, node);
        }
    }
}

/// Marks the checkbox at the status's fixed position within the slot's
/// `.checks` group. Exactly one checkbox per line-item status; positions
/// beyond the group are ignored.
fn mark_status_checkbox(doc: &mut Document, slot: NodeId, status: InspectionStatus) {
    let Some(checks) = doc.first_descendant_with_class(slot, "checks") else {
        return;
    };
    let checkboxes: Vec<NodeId> = doc
        .descendants(checks)
        .filter(|&n| doc.tag(n) == Some("input") && doc.attr(n, "type") == Some("checkbox"))
        .collect();
    if let Some(&target) = checkboxes.get(status.checkbox_index()) {
        doc.set_attr(target, "checked", "checked");
    }
}

/// The slot's `.comments` container nested under `.comments-inline`.
fn comments_container(doc: &Document, slot: NodeId) -> Option<NodeId> {
    let inline = doc.first_descendant_with_class(slot, "comments-inline")?;
    doc.first_descendant_with_class(inline, "comments")
}

/// Builds the comment-area fragment for one line item: comments in
/// ascending `order` (stable for ties), each followed by its photo and
/// video blocks, with a thin divider between consecutive comments.
fn render_comments(doc: &mut Document, comments: &[Comment]) -> Vec<NodeId> {
    let mut sorted: Vec<&Comment> = comments.iter().collect();
    sorted.sort_by(|a, b| a.order.partial_cmp(&b.order).unwrap_or(Ordering::Equal));

    let mut nodes = Vec::new();
    for (idx, comment) in sorted.iter().enumerate() {
        if let Some(body) = render_comment_body(doc, comment) {
            nodes.push(body);
        }
        for photo in &comment.photos {
            if !photo.url.is_empty() {
                nodes.push(render_photo(doc, photo));
            }
        }
        for video in &comment.videos {
            if !video.url.is_empty() {
                nodes.push(render_video(doc, video));
            }
        }
        if idx < sorted.len() - 1 {
            let divider = doc.create_element("hr");
            doc.set_attr(divider, "style", COMMENT_DIVIDER_STYLE);
            nodes.push(divider);
        }
    }
    nodes
}

/// `<div class="comment-item">` holding the location line and the comment
/// text, or `None` when both are empty.
fn render_comment_body(doc: &mut Document, comment: &Comment) -> Option<NodeId> {
    let location = comment.location.trim();
    if location.is_empty() && comment.text.is_empty() {
        return None;
    }

    let item = doc.create_element("div");
    doc.set_attr(item, "class", "comment-item");

    if !location.is_empty() {
        let p = doc.create_element("p");
        let strong = doc.create_element("strong");
        let strong_text = doc.create_text("Location:");
        doc.append_child(strong, strong_text);
        doc.append_child(p, strong);
        let location_text = doc.create_text(&format!(" {location}"));
        doc.append_child(p, location_text);
        doc.append_child(item, p);
    }
    if !comment.text.is_empty() {
        let p = doc.create_element("p");
        let text = doc.create_text(&comment.text);
        doc.append_child(p, text);
        doc.append_child(item, p);
    }
    Some(item)
}

fn render_photo(doc: &mut Document, photo: &Photo) -> NodeId {
    let container = doc.create_element("div");
    doc.set_attr(container, "class", "media-container");
    doc.set_attr(container, "style", MEDIA_CONTAINER_STYLE);

    let caption = photo.caption_text();
    if !caption.is_empty() {
        let p = doc.create_element("p");
        doc.set_attr(p, "style", CAPTION_STYLE);
        let em = doc.create_element("em");
        let caption_text = doc.create_text(caption);
        doc.append_child(em, caption_text);
        doc.append_child(p, em);
        doc.append_child(container, p);
    }

    let img = doc.create_element("img");
    doc.set_attr(img, "src", &photo.url);
    doc.set_attr(img, "alt", caption);
    doc.set_attr(img, "style", IMG_STYLE);
    doc.append_child(container, img);

    container
}

fn render_video(doc: &mut Document, video: &Video) -> NodeId {
    let container = doc.create_element("div");
    doc.set_attr(container, "class", "media-container");
    doc.set_attr(container, "style", MEDIA_CONTAINER_STYLE);

    let player = doc.create_element("video");
    doc.set_attr(player, "src", &video.url);
    doc.set_attr(player, "controls", "controls");
    doc.set_attr(player, "style", VIDEO_STYLE);
    doc.append_child(container, player);

    container
}
