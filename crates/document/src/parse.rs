//! Lenient HTML parsing.
//!
//! A single forward pass over the input maintaining a stack of open
//! elements. Recovery rules: an end tag with no matching open element is
//! ignored; elements still open at end of input are closed implicitly; a
//! stray `<` that does not begin a tag is treated as text.

use crate::{Document, NodeId, RAW_TEXT_ELEMENTS, VOID_ELEMENTS};

pub(crate) fn parse_document(html: &str) -> Document {
    let mut doc = Document::new();
    Parser {
        input: html,
        pos: 0,
    }
    .run(&mut doc);
    doc
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn run(mut self, doc: &mut Document) {
        let mut stack: Vec<NodeId> = vec![doc.root()];

        while self.pos < self.input.len() {
            let parent = *stack.last().expect("root never popped");

            if !self.rest().starts_with('<') {
                let text = self.take_until('<');
                doc.append_text(parent, &decode_entities(text));
                continue;
            }

            if self.rest().starts_with("<!--") {
                let comment = self.take_comment();
                let node = doc.create_comment(comment);
                doc.append_child(parent, node);
            } else if self.rest().starts_with("<!") {
                self.take_declaration(doc);
            } else if self.rest().starts_with("</") {
                let name = self.take_end_tag();
                // Close up to the nearest matching open element; ignore
                // stray end tags. The root is never popped.
                if let Some(i) = stack
                    .iter()
                    .rposition(|&id| doc.tag(id) == Some(name.as_str()))
                {
                    if i > 0 {
                        stack.truncate(i);
                    }
                }
            } else if self
                .rest()
                .chars()
                .nth(1)
                .is_some_and(|c| c.is_ascii_alphabetic())
            {
                self.take_start_tag(doc, &mut stack);
            } else {
                // Lone '<' in text content.
                doc.append_text(parent, "<");
                self.pos += 1;
            }
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Consumes and returns input up to (not including) `stop`, or the rest
    /// of the input when `stop` never occurs.
    fn take_until(&mut self, stop: char) -> &'a str {
        let rest = self.rest();
        let end = rest.find(stop).unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }

    fn take_comment(&mut self) -> &'a str {
        self.pos += 4; // "<!--"
        let rest = self.rest();
        match rest.find("-->") {
            Some(end) => {
                self.pos += end + 3;
                &rest[..end]
            }
            None => {
                self.pos = self.input.len();
                rest
            }
        }
    }

    /// `<!DOCTYPE ...>` becomes a doctype node; any other declaration is
    /// dropped.
    fn take_declaration(&mut self, doc: &mut Document) {
        self.pos += 2; // "<!"
        let body = self.take_until('>');
        if self.rest().starts_with('>') {
            self.pos += 1;
        }
        let lower = body.to_ascii_lowercase();
        if let Some(payload) = lower.strip_prefix("doctype") {
            let payload = &body[body.len() - payload.len()..];
            let node = doc.create_doctype(payload.trim());
            let root = doc.root();
            doc.append_child(root, node);
        }
    }

    fn take_end_tag(&mut self) -> String {
        self.pos += 2; // "</"
        let name = self.take_tag_name();
        self.take_until('>');
        if self.rest().starts_with('>') {
            self.pos += 1;
        }
        name
    }

    fn take_tag_name(&mut self) -> String {
        let rest = self.rest();
        let end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == ':'))
            .unwrap_or(rest.len());
        self.pos += end;
        rest[..end].to_ascii_lowercase()
    }

    fn take_start_tag(&mut self, doc: &mut Document, stack: &mut Vec<NodeId>) {
        self.pos += 1; // "<"
        let tag = self.take_tag_name();
        let element = doc.create_element(&tag);

        let mut self_closing = false;
        loop {
            self.skip_whitespace();
            match self.rest().chars().next() {
                None => break,
                Some('>') => {
                    self.pos += 1;
                    break;
                }
                Some('/') => {
                    self.pos += 1;
                    if self.rest().starts_with('>') {
                        self.pos += 1;
                        self_closing = true;
                        break;
                    }
                }
                Some(_) => self.take_attribute(doc, element),
            }
        }

        let parent = *stack.last().expect("root never popped");
        doc.append_child(parent, element);

        if RAW_TEXT_ELEMENTS.contains(&tag.as_str()) && !self_closing {
            self.take_raw_text(doc, element, &tag);
        } else if !self_closing && !VOID_ELEMENTS.contains(&tag.as_str()) {
            stack.push(element);
        }
    }

    fn take_attribute(&mut self, doc: &mut Document, element: NodeId) {
        let rest = self.rest();
        let name_end = rest
            .find(|c: char| c.is_whitespace() || c == '=' || c == '>' || c == '/')
            .unwrap_or(rest.len());
        if name_end == 0 {
            self.pos += 1;
            return;
        }
        let name = &rest[..name_end];
        self.pos += name_end;

        self.skip_whitespace();
        if !self.rest().starts_with('=') {
            doc.set_attr(element, name, "");
            return;
        }
        self.pos += 1;
        self.skip_whitespace();

        let rest = self.rest();
        let value = match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let inner = &rest[1..];
                let end = inner.find(quote).unwrap_or(inner.len());
                self.pos += 1 + end + usize::from(end < inner.len());
                &inner[..end]
            }
            _ => {
                let end = rest
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(rest.len());
                self.pos += end;
                &rest[..end]
            }
        };
        doc.set_attr(element, name, &decode_entities(value));
    }

    /// Consumes everything up to the element's end tag as a single raw text
    /// child (no entity decoding) — used for `<style>` and `<script>`.
    fn take_raw_text(&mut self, doc: &mut Document, element: NodeId, tag: &str) {
        let close = format!("</{tag}");
        let rest = self.rest();
        let end = rest.to_ascii_lowercase().find(&close).unwrap_or(rest.len());
        if end > 0 {
            let text = doc.create_text(&rest[..end]);
            doc.append_child(element, text);
        }
        self.pos += end;
        if self.pos < self.input.len() {
            self.take_end_tag();
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let end = rest
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(rest.len());
        self.pos += end;
    }
}

/// Decodes the named entities the escaper produces plus numeric character
/// references. Unknown entities are left as-is.
fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        // Entity names are short; a distant semicolon means plain text.
        if let Some(semi) = rest.find(';').filter(|&i| i <= 32) {
            if let Some(decoded) = decode_entity(&rest[1..semi]) {
                out.push_str(&decoded);
                rest = &rest[semi + 1..];
                continue;
            }
        }
        out.push('&');
        rest = &rest[1..];
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<String> {
    let decoded = match name {
        "amp" => "&".to_string(),
        "lt" => "<".to_string(),
        "gt" => ">".to_string(),
        "quot" => "\"".to_string(),
        "apos" => "'".to_string(),
        "nbsp" => "\u{a0}".to_string(),
        _ if name.starts_with("#x") || name.starts_with("#X") => {
            let code = u32::from_str_radix(&name[2..], 16).ok()?;
            char::from_u32(code)?.to_string()
        }
        _ if name.starts_with('#') => {
            let code: u32 = name[1..].parse().ok()?;
            char::from_u32(code)?.to_string()
        }
        _ => return None,
    };
    Some(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements_with_attributes() {
        let doc = Document::parse(
            r#"<div class="item"><span class="code">C.</span> Roof</div>"#,
        );
        let div = doc.elements_with_class("item")[0];
        assert_eq!(doc.tag(div), Some("div"));
        let code = doc.first_descendant_with_class(div, "code").unwrap();
        assert_eq!(doc.text_content(code), "C.");
        assert_eq!(doc.text_content(div), "C. Roof");
    }

    #[test]
    fn void_and_self_closing_elements_take_no_children() {
        let doc = Document::parse(r#"<div><input type="checkbox"><hr/><p>after</p></div>"#);
        let inputs = doc.elements_with_tag("input");
        assert_eq!(inputs.len(), 1);
        assert!(doc.children(inputs[0]).is_empty());
        // <p> is a sibling of the input, not a child.
        let p = doc.elements_with_tag("p")[0];
        let div = doc.elements_with_tag("div")[0];
        assert_eq!(doc.parent(p), Some(div));
    }

    #[test]
    fn valueless_attributes_parse() {
        let doc = Document::parse(r#"<video src="v.mp4" controls></video>"#);
        let video = doc.elements_with_tag("video")[0];
        assert_eq!(doc.attr(video, "controls"), Some(""));
        assert_eq!(doc.attr(video, "src"), Some("v.mp4"));
    }

    #[test]
    fn style_content_is_raw() {
        let doc = Document::parse("<head><style>.a > .b { color: red; }</style></head>");
        let style = doc.elements_with_tag("style")[0];
        assert_eq!(doc.text_content(style), ".a > .b { color: red; }");
    }

    #[test]
    fn entities_decode_in_text_and_attributes() {
        let doc = Document::parse(r#"<p title="a &amp; b">1 &lt; 2 &#x41;</p>"#);
        let p = doc.elements_with_tag("p")[0];
        assert_eq!(doc.attr(p, "title"), Some("a & b"));
        assert_eq!(doc.text_content(p), "1 < 2 A");
    }

    #[test]
    fn unclosed_tags_and_stray_end_tags_recover() {
        let doc = Document::parse("<div><p>one</b><p>two");
        // Both <p> elements exist; the stray </b> is ignored.
        assert_eq!(doc.elements_with_tag("p").len(), 2);
        assert!(doc.serialize().contains("two"));
    }

    #[test]
    fn doctype_is_preserved() {
        let doc = Document::parse("<!DOCTYPE html>\n<html><body></body></html>");
        assert!(doc.serialize().starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn comments_survive_round_trip() {
        let doc = Document::parse("<div><!-- marker --></div>");
        assert!(doc.serialize().contains("<!-- marker -->"));
    }
}
