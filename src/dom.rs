//! The minimal document surface the embed routine writes to.

use thiserror::Error;

/// A host document failed to apply a mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct DomError(String);

impl DomError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Document operations needed to resolve a target and fill it.
///
/// Nodes are cheap handles owned by the host. Implementations never hand out
/// ownership of the target: the embed routine only clears and repopulates it.
pub trait Document {
    type Node: Clone + PartialEq;

    /// First element matching `selector`, or `None`.
    fn query_selector(&self, selector: &str) -> Option<Self::Node>;

    /// The page's root content container (`<body>` in a browser).
    fn root(&self) -> Option<Self::Node>;

    fn create_element(&mut self, tag: &str) -> Result<Self::Node, DomError>;

    fn clear_children(&mut self, node: &Self::Node) -> Result<(), DomError>;

    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), DomError>;

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str)
        -> Result<(), DomError>;

    /// Adds `class` to the node's class list, once.
    fn add_class(&mut self, node: &Self::Node, class: &str) -> Result<(), DomError>;

    /// Replaces the node's content with raw HTML.
    fn set_inner_html(&mut self, node: &Self::Node, html: &str) -> Result<(), DomError>;
}

/// Where to embed.
#[derive(Debug, Clone, PartialEq)]
pub enum Target<'a, N> {
    /// CSS selector. Only the empty string means [`Target::Root`]; anything
    /// else, whitespace included, goes to the lookup.
    Selector(&'a str),
    Node(N),
    Root,
}

impl<'a, N> From<&'a str> for Target<'a, N> {
    fn from(selector: &'a str) -> Self {
        Target::Selector(selector)
    }
}

impl<N> Target<'_, N> {
    /// Looks the target up in `doc`.
    pub fn resolve<D>(self, doc: &D) -> Option<N>
    where
        D: Document<Node = N> + ?Sized,
    {
        match self {
            Target::Selector(selector) if !selector.is_empty() => doc.query_selector(selector),
            Target::Selector(_) | Target::Root => doc.root(),
            Target::Node(node) => Some(node),
        }
    }
}
