//! A minimal in-memory DOM.
//!
//! Tile builders never touch a concrete tree directly; they go through the
//! [`Dom`] capability trait (create, set attribute, append, listen). The
//! [`Document`] arena is the implementation used by the controller, the CLI
//! and the tests, and can be serialised to standalone HTML with
//! [`Document::to_html`].

use crate::{Error, Result};
use std::fmt::Write as _;
use std::sync::Arc;

/// SVG namespace used for the link-affordance icon
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Elements that are serialised without a closing tag
const VOID_ELEMENTS: &[&str] = &["img", "meta", "link", "br", "hr", "input"];
/// Elements whose text is written verbatim
const RAW_TEXT_ELEMENTS: &[&str] = &["style", "script"];

/// Handle to a node inside a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Click handler attached to a node
pub type ClickListener = Arc<dyn Fn() + Send + Sync>;

/// A single element node
#[derive(Clone)]
pub struct Element {
    pub tag: String,
    pub namespace: Option<String>,
    /// Attributes in insertion order; setting an existing name replaces its value
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    listeners: Vec<ClickListener>,
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag)
            .field("namespace", &self.namespace)
            .field("attributes", &self.attributes)
            .field("text", &self.text)
            .field("children", &self.children)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Element {
    fn new(tag: &str, namespace: Option<&str>) -> Self {
        Self {
            tag: tag.to_string(),
            namespace: namespace.map(|s| s.to_string()),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
            parent: None,
            listeners: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the space-separated `class` attribute contains `class`
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|c| c.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// Capability interface the tile builders are written against.
pub trait Dom {
    /// Create a detached HTML element
    fn create_element(&mut self, tag: &str) -> NodeId;

    /// Create a detached element in the given namespace (SVG)
    fn create_element_ns(&mut self, namespace: &str, tag: &str) -> NodeId;

    /// Set (or replace) an attribute
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<()>;

    /// Replace the text content of a node
    fn set_text(&mut self, node: NodeId, text: &str) -> Result<()>;

    /// Append `child` as the last child of `parent`
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()>;

    /// Register a click listener on a node
    fn add_click_listener(&mut self, node: NodeId, listener: ClickListener) -> Result<()>;

    /// Look up an attached element by its `id` attribute
    fn get_element_by_id(&self, id: &str) -> Option<NodeId>;
}

/// Arena-backed document tree
#[derive(Debug, Default, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    root: Option<NodeId>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the root element (usually `html`). Replaces any existing root.
    pub fn create_root(&mut self, tag: &str) -> NodeId {
        let id = self.create_element(tag);
        self.root = Some(id);
        id
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn get(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node.0)
    }

    fn get_mut(&mut self, node: NodeId) -> Result<&mut Element> {
        self.nodes
            .get_mut(node.0)
            .ok_or_else(|| Error::RenderError(format!("unknown node {}", node.0)))
    }

    /// Number of nodes ever created, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.get(node).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    /// Depth-first, document-order list of `node` and its descendants
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            out.push(n);
            for child in self.children(n).iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    /// First descendant of `node` (including itself) carrying `class`
    pub fn find_by_class(&self, node: NodeId, class: &str) -> Option<NodeId> {
        self.descendants(node)
            .into_iter()
            .find(|n| self.get(*n).map(|e| e.has_class(class)).unwrap_or(false))
    }

    /// Concatenated text content of `node` and its descendants
    pub fn text_content(&self, node: NodeId) -> String {
        self.descendants(node)
            .into_iter()
            .filter_map(|n| self.get(n).and_then(|e| e.text.clone()))
            .collect()
    }

    /// Fire every click listener registered on `node`. Returns how many ran.
    pub fn click(&self, node: NodeId) -> Result<usize> {
        let element = self
            .get(node)
            .ok_or_else(|| Error::RenderError(format!("unknown node {}", node.0)))?;
        for listener in &element.listeners {
            listener();
        }
        Ok(element.listeners.len())
    }

    /// Serialise the tree under the root as an HTML5 document
    pub fn to_html(&self) -> String {
        let mut out = String::from("<!DOCTYPE html>\n");
        if let Some(root) = self.root {
            self.write_node(root, &mut out);
        }
        out.push('\n');
        out
    }

    /// Serialise a single subtree
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }

    fn write_node(&self, node: NodeId, out: &mut String) {
        let Some(el) = self.get(node) else { return };
        let _ = write!(out, "<{}", el.tag);
        for (name, value) in &el.attributes {
            if value.is_empty() {
                let _ = write!(out, " {}", name);
            } else {
                let _ = write!(out, " {}=\"{}\"", name, escape_attr(value));
            }
        }
        out.push('>');
        if el.namespace.is_none() && VOID_ELEMENTS.contains(&el.tag.as_str()) {
            return;
        }
        if let Some(text) = &el.text {
            if RAW_TEXT_ELEMENTS.contains(&el.tag.as_str()) {
                out.push_str(text);
            } else {
                out.push_str(&escape_text(text));
            }
        }
        for child in &el.children {
            self.write_node(*child, out);
        }
        let _ = write!(out, "</{}>", el.tag);
    }
}

impl Dom for Document {
    fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(Element::new(tag, None));
        NodeId(self.nodes.len() - 1)
    }

    fn create_element_ns(&mut self, namespace: &str, tag: &str) -> NodeId {
        self.nodes.push(Element::new(tag, Some(namespace)));
        NodeId(self.nodes.len() - 1)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        let el = self.get_mut(node)?;
        match el.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => el.attributes.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    fn set_text(&mut self, node: NodeId, text: &str) -> Result<()> {
        self.get_mut(node)?.text = Some(text.to_string());
        Ok(())
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if parent == child {
            return Err(Error::RenderError("cannot append a node to itself".into()));
        }
        let mut ancestor = self.get(parent).and_then(|e| e.parent);
        while let Some(a) = ancestor {
            if a == child {
                return Err(Error::RenderError(format!(
                    "cannot append node {} under its own descendant {}",
                    child.0, parent.0
                )));
            }
            ancestor = self.get(a).and_then(|e| e.parent);
        }
        // detach from any previous parent first
        if let Some(old) = self.get_mut(child)?.parent.take() {
            self.get_mut(old)?.children.retain(|c| *c != child);
        }
        self.get_mut(parent)?.children.push(child);
        self.get_mut(child)?.parent = Some(parent);
        Ok(())
    }

    fn add_click_listener(&mut self, node: NodeId, listener: ClickListener) -> Result<()> {
        self.get_mut(node)?.listeners.push(listener);
        Ok(())
    }

    fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        let root = self.root?;
        self.descendants(root)
            .into_iter()
            .find(|n| self.get(*n).and_then(|e| e.attr("id")) == Some(id))
    }
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn builds_and_serialises_tree() {
        let mut doc = Document::new();
        let html = doc.create_root("html");
        let body = doc.create_element("body");
        let div = doc.create_element("div");
        doc.set_attribute(div, "id", "main").unwrap();
        doc.set_attribute(div, "class", "grid").unwrap();
        let img = doc.create_element("img");
        doc.set_attribute(img, "src", "a.png?x=1&y=\"2\"").unwrap();
        doc.append_child(html, body).unwrap();
        doc.append_child(body, div).unwrap();
        doc.append_child(div, img).unwrap();

        let out = doc.to_html();
        assert!(out.starts_with("<!DOCTYPE html>"));
        assert!(out.contains("<div id=\"main\" class=\"grid\"><img src=\"a.png?x=1&amp;y=&quot;2&quot;\"></div>"));
        assert_eq!(doc.get_element_by_id("main"), Some(div));
        assert_eq!(doc.get_element_by_id("missing"), None);
    }

    #[test]
    fn set_attribute_replaces_existing_value() {
        let mut doc = Document::new();
        let a = doc.create_element("a");
        doc.set_attribute(a, "class", "one").unwrap();
        doc.set_attribute(a, "class", "two").unwrap();
        assert_eq!(doc.get(a).unwrap().attributes, vec![("class".to_string(), "two".to_string())]);
    }

    #[test]
    fn append_moves_node_between_parents() {
        let mut doc = Document::new();
        let p1 = doc.create_element("div");
        let p2 = doc.create_element("div");
        let c = doc.create_element("span");
        doc.append_child(p1, c).unwrap();
        doc.append_child(p2, c).unwrap();
        assert!(doc.children(p1).is_empty());
        assert_eq!(doc.children(p2), &[c]);
        assert!(doc.append_child(c, c).is_err());
    }

    #[test]
    fn append_rejects_ancestor_under_descendant() {
        let mut doc = Document::new();
        let root = doc.create_root("div");
        let mid = doc.create_element("div");
        let leaf = doc.create_element("span");
        doc.append_child(root, mid).unwrap();
        doc.append_child(mid, leaf).unwrap();

        assert!(matches!(doc.append_child(leaf, root), Err(Error::RenderError(_))));
        assert!(doc.append_child(leaf, mid).is_err());
        // tree is unchanged and still serialises
        assert_eq!(doc.children(root), &[mid]);
        assert_eq!(doc.get(root).unwrap().parent, None);
        assert_eq!(doc.outer_html(root), "<div><div><span></span></div></div>");
    }

    #[test]
    fn click_runs_listeners() {
        let mut doc = Document::new();
        let a = doc.create_element("a");
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        doc.add_click_listener(a, Arc::new(move || {
            h.fetch_add(1, Ordering::SeqCst);
        }))
        .unwrap();
        assert_eq!(doc.click(a).unwrap(), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn text_is_escaped_and_collected() {
        let mut doc = Document::new();
        let root = doc.create_root("div");
        let a = doc.create_element("a");
        doc.set_text(a, "<b> & co").unwrap();
        doc.append_child(root, a).unwrap();
        assert_eq!(doc.outer_html(root), "<div><a>&lt;b&gt; &amp; co</a></div>");
        assert_eq!(doc.text_content(root), "<b> & co");
    }
}
