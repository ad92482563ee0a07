//! HTML serialization.
//!
//! Deterministic: the same tree always produces identical bytes. Text nodes
//! and attribute values are escaped here, at the single exit point, so
//! nothing upstream can forget to.

use crate::{escape, Document, NodeId, NodeKind, RAW_TEXT_ELEMENTS, VOID_ELEMENTS};

pub(crate) fn serialize_document(doc: &Document) -> String {
    let mut out = String::new();
    for &child in doc.children(doc.root()) {
        serialize_node(doc, child, &mut out, false);
    }
    out
}

fn serialize_node(doc: &Document, id: NodeId, out: &mut String, raw_text: bool) {
    match &doc.node(id).kind {
        NodeKind::Root => {}
        NodeKind::Doctype(payload) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(payload);
            out.push_str(">\n");
        }
        NodeKind::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeKind::Text(text) => {
            if raw_text {
                out.push_str(text);
            } else {
                out.push_str(&escape(text));
            }
        }
        NodeKind::Element { tag, attrs } => {
            out.push('<');
            out.push_str(tag);
            for (name, value) in attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape(value));
                out.push('"');
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&tag.as_str()) {
                return;
            }
            let raw = RAW_TEXT_ELEMENTS.contains(&tag.as_str());
            for &child in doc.children(id) {
                serialize_node(doc, child, out, raw);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Document;

    #[test]
    fn round_trip_is_stable() {
        let html = r#"<!DOCTYPE html>
<html><head><style>.page { width: 8.5in; }</style></head><body><div class="item"><span class="code">A.</span></div></body></html>"#;
        let once = Document::parse(html).serialize();
        let twice = Document::parse(&once).serialize();
        assert_eq!(once, twice);
    }

    #[test]
    fn text_nodes_are_escaped() {
        let mut doc = Document::parse("<p></p>");
        let p = doc.elements_with_tag("p")[0];
        let text = doc.create_text("<script>alert(1)</script>");
        doc.append_child(p, text);
        let html = doc.serialize();
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn attribute_values_are_escaped() {
        let mut doc = Document::parse("<img>");
        let img = doc.elements_with_tag("img")[0];
        doc.set_attr(img, "src", r#"x" onerror="alert(1)"#);
        let html = doc.serialize();
        assert!(html.contains(r#"src="x&quot; onerror=&quot;alert(1)""#));
    }

    #[test]
    fn style_text_is_not_escaped() {
        let mut doc = Document::parse("<head><style></style></head>");
        let style = doc.elements_with_tag("style")[0];
        doc.append_text(style, ".a > .b { color: red; }");
        assert!(doc.serialize().contains(".a > .b { color: red; }"));
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let doc = Document::parse(r#"<div><input type="checkbox"><hr></div>"#);
        let html = doc.serialize();
        assert!(html.contains(r#"<input type="checkbox">"#));
        assert!(!html.contains("</input>"));
        assert!(!html.contains("</hr>"));
    }
}
