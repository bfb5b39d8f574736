//! In-memory document that renders to an HTML string.
//!
//! Lets the embed routine run outside a browser: on a server that wants the
//! markup, in the preview binary, and in tests.

use std::fmt::Write as _;

use indexmap::IndexMap;

use crate::dom::{DomError, Document};

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: [&str; 6] = ["br", "embed", "hr", "img", "input", "meta"];

/// Handle to a node in a [`MarkupDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeData {
    Element {
        tag: String,
        attributes: IndexMap<String, String>,
        children: Vec<NodeId>,
    },
    /// HTML emitted verbatim.
    Raw(String),
    /// Slot freed by `clear_children`, waiting to be reused.
    Vacant,
}

/// Arena-backed element tree rooted at `<body>`.
///
/// Nodes removed by [`Document::clear_children`] (and so by every `embed`
/// call) go back to the arena. Handles to them are invalid afterwards and
/// may later name a different node.
#[derive(Debug, Clone)]
pub struct MarkupDocument {
    nodes: Vec<NodeData>,
    free: Vec<usize>,
}

impl Default for MarkupDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupDocument {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData::Element {
                tag: "body".to_string(),
                attributes: IndexMap::new(),
                children: Vec::new(),
            }],
            free: Vec::new(),
        }
    }

    pub fn body(&self) -> NodeId {
        NodeId(0)
    }

    /// Creates a detached element.
    pub fn element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element {
            tag: tag.to_ascii_lowercase(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        })
    }

    /// Creates a detached raw HTML node.
    pub fn raw(&mut self, html: &str) -> NodeId {
        self.push(NodeData::Raw(html.to_string()))
    }

    /// Appends `child` to `parent`. Raw nodes cannot have children.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> bool {
        match self.nodes.get_mut(parent.0) {
            Some(NodeData::Element { children, .. }) => {
                children.push(child);
                true
            }
            _ => false,
        }
    }

    /// Sets an attribute on an element. Raw nodes and names that are not
    /// valid attribute names are ignored.
    pub fn attr(&mut self, node: NodeId, name: &str, value: &str) {
        if !is_attribute_name(name) {
            return;
        }
        if let Some(NodeData::Element { attributes, .. }) = self.nodes.get_mut(node.0) {
            attributes.insert(name.to_ascii_lowercase(), value.to_string());
        }
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match self.nodes.get(node.0) {
            Some(NodeData::Element { tag, .. }) => Some(tag.as_str()),
            _ => None,
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match self.nodes.get(node.0) {
            Some(NodeData::Element { attributes, .. }) => {
                attributes.get(&name.to_ascii_lowercase()).map(String::as_str)
            }
            _ => None,
        }
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        match self.nodes.get(node.0) {
            Some(NodeData::Element { children, .. }) => children.as_slice(),
            _ => &[],
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attribute(node, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Serialized children of `node`.
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(node) {
            self.write_node(&mut out, child);
        }
        out
    }

    /// Serialized `node` including its own tag.
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_node(&mut out, node);
        out
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        if let Some(slot) = self.free.pop() {
            self.nodes[slot] = data;
            return NodeId(slot);
        }
        self.nodes.push(data);
        NodeId(self.nodes.len() - 1)
    }

    /// Returns `node` and everything below it to the arena.
    fn release(&mut self, node: NodeId) {
        if node == self.body() {
            return;
        }
        let Some(slot) = self.nodes.get_mut(node.0) else {
            return;
        };
        match std::mem::replace(slot, NodeData::Vacant) {
            NodeData::Vacant => {}
            NodeData::Raw(_) => self.free.push(node.0),
            NodeData::Element { children, .. } => {
                self.free.push(node.0);
                for child in children {
                    self.release(child);
                }
            }
        }
    }

    fn check(&self, node: NodeId) -> Result<(), DomError> {
        match self.nodes.get(node.0) {
            Some(NodeData::Element { .. }) => Ok(()),
            Some(NodeData::Raw(_)) => Err(DomError::new("raw content node is not an element")),
            Some(NodeData::Vacant) | None => {
                Err(DomError::new(format!("unknown node {}", node.0)))
            }
        }
    }

    fn write_node(&self, out: &mut String, node: NodeId) {
        match self.nodes.get(node.0) {
            Some(NodeData::Element {
                tag,
                attributes,
                children,
            }) => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    let _ = write!(out, " {}=\"{}\"", name, escape_attribute(value));
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return;
                }
                for &child in children {
                    self.write_node(out, child);
                }
                let _ = write!(out, "</{}>", tag);
            }
            Some(NodeData::Raw(html)) => out.push_str(html),
            Some(NodeData::Vacant) | None => {}
        }
    }

    /// Depth-first, document order, starting at (and including) `from`.
    fn find(&self, from: NodeId, selector: &SimpleSelector<'_>) -> Option<NodeId> {
        if self.matches(from, selector) {
            return Some(from);
        }
        self.children(from)
            .iter()
            .find_map(|&child| self.find(child, selector))
    }

    fn matches(&self, node: NodeId, selector: &SimpleSelector<'_>) -> bool {
        let Some(tag) = self.tag(node) else {
            return false;
        };
        if selector.tag.is_some_and(|wanted| !wanted.eq_ignore_ascii_case(tag)) {
            return false;
        }
        if let Some(id) = selector.id {
            if self.attribute(node, "id") != Some(id) {
                return false;
            }
        }
        if let Some(class) = selector.class {
            if !self.has_class(node, class) {
                return false;
            }
        }
        true
    }
}

/// `tag`, `#id`, `.class`, `tag#id` or `tag.class`.
#[derive(Debug, PartialEq)]
struct SimpleSelector<'a> {
    tag: Option<&'a str>,
    id: Option<&'a str>,
    class: Option<&'a str>,
}

impl<'a> SimpleSelector<'a> {
    fn parse(selector: &'a str) -> Option<Self> {
        let selector = selector.trim();
        let (tag, rest) = match selector.find(['#', '.']) {
            Some(at) => (&selector[..at], &selector[at..]),
            None => (selector, ""),
        };
        if !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return None;
        }

        let mut parsed = SimpleSelector {
            tag: Some(tag).filter(|t| !t.is_empty()),
            id: None,
            class: None,
        };
        if let Some(id) = rest.strip_prefix('#') {
            parsed.id = Some(id);
        } else if let Some(class) = rest.strip_prefix('.') {
            parsed.class = Some(class);
        }

        let name = parsed.id.or(parsed.class).unwrap_or("");
        let valid_name = name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        let empty = parsed.tag.is_none() && name.is_empty();
        if !valid_name || empty || (!rest.is_empty() && name.is_empty()) {
            return None;
        }
        Some(parsed)
    }
}

/// Names a browser's `setAttribute` would accept without throwing.
fn is_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| {
            !c.is_whitespace() && !c.is_control() && !matches!(c, '"' | '\'' | '<' | '>' | '/' | '=')
        })
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

impl Document for MarkupDocument {
    type Node = NodeId;

    fn query_selector(&self, selector: &str) -> Option<NodeId> {
        let selector = SimpleSelector::parse(selector)?;
        self.find(self.body(), &selector)
    }

    fn root(&self) -> Option<NodeId> {
        Some(self.body())
    }

    fn create_element(&mut self, tag: &str) -> Result<NodeId, DomError> {
        if tag.is_empty() {
            return Err(DomError::new("empty tag name"));
        }
        Ok(self.element(tag))
    }

    fn clear_children(&mut self, node: &NodeId) -> Result<(), DomError> {
        self.check(*node)?;
        let removed = match self.nodes.get_mut(node.0) {
            Some(NodeData::Element { children, .. }) => std::mem::take(children),
            _ => Vec::new(),
        };
        for child in removed {
            self.release(child);
        }
        Ok(())
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        self.check(*parent)?;
        if matches!(self.nodes.get(child.0), None | Some(NodeData::Vacant)) {
            return Err(DomError::new(format!("unknown node {}", child.0)));
        }
        self.append(*parent, *child);
        Ok(())
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.check(*node)?;
        if !is_attribute_name(name) {
            return Err(DomError::new(format!("invalid attribute name {:?}", name)));
        }
        self.attr(*node, name, value);
        Ok(())
    }

    fn add_class(&mut self, node: &NodeId, class: &str) -> Result<(), DomError> {
        self.check(*node)?;
        if self.has_class(*node, class) {
            return Ok(());
        }
        let classes = match self.attribute(*node, "class") {
            Some(existing) if !existing.trim().is_empty() => {
                format!("{} {}", existing.trim(), class)
            }
            _ => class.to_string(),
        };
        self.attr(*node, "class", &classes);
        Ok(())
    }

    fn set_inner_html(&mut self, node: &NodeId, html: &str) -> Result<(), DomError> {
        self.clear_children(node)?;
        let content = self.raw(html);
        self.append(*node, content);
        Ok(())
    }
}
