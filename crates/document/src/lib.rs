//! Owned HTML document tree.
//!
//! This crate is the boundary between the form-population engine and the
//! template's markup format. It parses template HTML into an arena-backed
//! tree the engine can query and mutate directly, and serializes the mutated
//! tree back to HTML as a separate final step. Parsing is lenient in the
//! HTML tradition: malformed markup never fails, it just produces the most
//! reasonable tree.
//!
//! All text nodes and attribute values are HTML-escaped during
//! serialization, so user-supplied strings inserted anywhere in the tree
//! cannot inject markup into the output.

mod parse;
mod serialize;

/// Handle to a node inside a [`Document`] arena.
///
/// Handles are only meaningful for the document that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    /// Synthetic root; never serialized itself.
    Root,
    /// `<!DOCTYPE ...>` payload (e.g. "html").
    Doctype(String),
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

/// An HTML document held as an arena of nodes.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

/// Elements that never have children and serialize without a closing tag.
pub(crate) const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta",
    "param", "source", "track", "wbr",
];

/// Elements whose text content is raw (not entity-encoded).
pub(crate) const RAW_TEXT_ELEMENTS: &[&str] = &["style", "script"];

impl Document {
    /// Creates an empty document containing only the synthetic root.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Parses HTML into a document. Never fails: malformed markup is
    /// tolerated (unclosed tags are auto-closed, stray end tags ignored).
    pub fn parse(html: &str) -> Self {
        parse::parse_document(html)
    }

    /// Serializes the tree back to HTML, escaping all text and attribute
    /// values (raw-text elements such as `<style>` excepted).
    pub fn serialize(&self) -> String {
        serialize::serialize_document(self)
    }

    /// The synthetic root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub(crate) fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    fn push_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Creates a detached element node.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push_node(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
        })
    }

    /// Creates a detached text node. The text is stored unescaped; escaping
    /// happens at serialization.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push_node(NodeKind::Text(text.to_string()))
    }

    pub(crate) fn create_doctype(&mut self, payload: &str) -> NodeId {
        self.push_node(NodeKind::Doctype(payload.to_string()))
    }

    pub(crate) fn create_comment(&mut self, text: &str) -> NodeId {
        self.push_node(NodeKind::Comment(text.to_string()))
    }

    /// Appends a detached node as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    /// Detaches all children of `id`, leaving them unreachable.
    pub fn clear_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.node_mut(id).children);
        for child in children {
            self.node_mut(child).parent = None;
        }
    }

    /// Detaches `id` from its parent; the subtree stays in the arena but is
    /// no longer reachable from the root.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node(id).parent {
            self.node_mut(parent).children.retain(|&c| c != id);
            self.node_mut(id).parent = None;
        }
    }

    /// Appends text to an element, merging into a trailing text child when
    /// one exists.
    pub fn append_text(&mut self, id: NodeId, text: &str) {
        if let Some(&last) = self.node(id).children.last() {
            if let NodeKind::Text(existing) = &mut self.node_mut(last).kind {
                existing.push_str(text);
                return;
            }
        }
        let text_node = self.create_text(text);
        self.append_child(id, text_node);
    }

    /// Element tag name, lower-cased. `None` for non-element nodes.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.node(id).kind, NodeKind::Element { .. })
    }

    /// Attribute value by (case-insensitive) name.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    /// Sets (or replaces) an attribute. No-op on non-element nodes.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        if let NodeKind::Element { attrs, .. } = &mut self.node_mut(id).kind {
            match attrs.iter_mut().find(|(n, _)| *n == name) {
                Some(slot) => slot.1 = value.to_string(),
                None => attrs.push((name, value.to_string())),
            }
        }
    }

    /// Whether the element's `class` attribute contains `class_name`.
    pub fn has_class(&self, id: NodeId, class_name: &str) -> bool {
        self.attr(id, "class")
            .map(|classes| classes.split_whitespace().any(|c| c == class_name))
            .unwrap_or(false)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// All descendants of `id` in document (pre-) order, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.node(id).children.to_vec();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    /// All elements carrying `class_name`, in document order.
    pub fn elements_with_class(&self, class_name: &str) -> Vec<NodeId> {
        self.descendants(self.root())
            .filter(|&n| self.has_class(n, class_name))
            .collect()
    }

    /// All elements with the given tag, in document order.
    pub fn elements_with_tag(&self, tag: &str) -> Vec<NodeId> {
        self.descendants(self.root())
            .filter(|&n| self.tag(n) == Some(tag))
            .collect()
    }

    /// First element whose `id` attribute equals `html_id`.
    pub fn element_by_id(&self, html_id: &str) -> Option<NodeId> {
        self.descendants(self.root())
            .find(|&n| self.attr(n, "id") == Some(html_id))
    }

    /// First descendant of `id` carrying `class_name`, in document order.
    pub fn first_descendant_with_class(&self, id: NodeId, class_name: &str) -> Option<NodeId> {
        self.descendants(id).find(|&n| self.has_class(n, class_name))
    }

    /// Concatenated text of `id` and its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let NodeKind::Text(text) = &self.node(id).kind {
            out.push_str(text);
        }
        for n in self.descendants(id) {
            if let NodeKind::Text(text) = &self.node(n).kind {
                out.push_str(text);
            }
        }
        out
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-order traversal over a subtree.
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        for &child in self.doc.node(id).children.iter().rev() {
            self.stack.push(child);
        }
        Some(id)
    }
}

/// Escapes text for safe insertion into HTML markup.
pub fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_and_queries_tree() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.set_attr(div, "class", "item special");
        let root = doc.root();
        doc.append_child(root, div);
        let text = doc.create_text("hello");
        doc.append_child(div, text);

        assert!(doc.has_class(div, "item"));
        assert!(doc.has_class(div, "special"));
        assert!(!doc.has_class(div, "spec"));
        assert_eq!(doc.text_content(div), "hello");
        assert_eq!(doc.elements_with_class("item"), vec![div]);
    }

    #[test]
    fn set_attr_replaces_existing() {
        let mut doc = Document::new();
        let el = doc.create_element("input");
        doc.set_attr(el, "value", "a");
        doc.set_attr(el, "value", "b");
        assert_eq!(doc.attr(el, "value"), Some("b"));
    }

    #[test]
    fn clear_children_and_detach() {
        let mut doc = Document::parse("<div id=\"a\"><p>one</p><p>two</p></div><span></span>");
        let div = doc.element_by_id("a").unwrap();
        assert_eq!(doc.children(div).len(), 2);
        doc.clear_children(div);
        assert!(doc.children(div).is_empty());

        let span = doc.elements_with_tag("span")[0];
        doc.detach(span);
        assert!(!doc.serialize().contains("<span>"));
    }

    #[test]
    fn append_text_merges_trailing_text_node() {
        let mut doc = Document::new();
        let style = doc.create_element("style");
        let root = doc.root();
        doc.append_child(root, style);
        doc.append_text(style, ".a{}");
        doc.append_text(style, ".b{}");
        assert_eq!(doc.children(style).len(), 1);
        assert_eq!(doc.text_content(style), ".a{}.b{}");
    }

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            escape(r#"<img src="x" onerror=1> & friends"#),
            "&lt;img src=&quot;x&quot; onerror=1&gt; &amp; friends"
        );
    }

    #[test]
    fn descendants_are_document_order() {
        let doc = Document::parse("<div><a></a><b><c></c></b></div><e></e>");
        let order: Vec<_> = doc
            .descendants(doc.root())
            .filter_map(|n| doc.tag(n).map(str::to_owned))
            .collect();
        assert_eq!(order, ["div", "a", "b", "c", "e"]);
    }
}
