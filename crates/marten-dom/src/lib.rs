//! Document tree for the marten template parser.
//!
//! This crate provides an arena-based tree for parsed component templates:
//! a document fragment root, elements (with their start/end tag records and
//! attributes) and text nodes, every one of them carrying a source [`Span`].
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues. Attributes
//! point back at their owning element by `NodeId` as well, so the tree never
//! contains a reference cycle.

pub mod lexical;
pub mod namespace;
pub mod span;

pub use lexical::{Comment, CommentKind, LexicalToken, LexicalTokenKind};
pub use namespace::{
    HTML_NAMESPACE, MATHML_NAMESPACE, Namespace, SVG_NAMESPACE, XLINK_NAMESPACE,
};
pub use span::{Position, Span};

use serde::Serialize;

/// A type-safe index into the document tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The document fragment is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// A node in the arena.
///
/// The parent/child lists are kept in document order; nothing in this crate
/// ever reorders them.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    /// What kind of node this is.
    pub node_type: NodeType,

    /// The containing fragment or element. `None` only for the root.
    pub parent: Option<NodeId>,

    /// Child nodes in document order.
    pub children: Vec<NodeId>,

    /// Source range. For containers the end is only final once the node has
    /// been closed (see [`DomTree::propagate_end_location`]).
    pub span: Span,
}

/// The kinds of nodes a template produces.
#[derive(Debug, Clone, Serialize)]
pub enum NodeType {
    /// The root of a parsed template.
    Fragment,
    /// One tag pair, or a self-closing/void tag.
    Element(ElementData),
    /// Literal character data.
    Text(String),
}

/// Element-specific data.
#[derive(Debug, Clone, Serialize)]
pub struct ElementData {
    /// Tag name, adjusted for the element's namespace (e.g. `foreignObject`).
    pub name: String,
    /// Fixed when the element is created.
    pub namespace: Namespace,
    /// The start tag this element was opened by.
    pub start_tag: StartTag,
    /// The matching end tag, if one was seen.
    pub end_tag: Option<EndTag>,
    /// Template-scope variables declared by this element. Filled in by
    /// later analysis passes; the tree builder leaves it empty.
    pub variables: Vec<Variable>,
}

impl ElementData {
    /// Find a plain (non-directive) attribute by its adjusted name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.start_tag
            .attributes
            .iter()
            .find(|attr| !attr.directive && attr.key.name == name)
    }

    /// The value of a plain attribute, if present and valued.
    #[must_use]
    pub fn attribute_value(&self, name: &str) -> Option<&str> {
        self.attribute(name)
            .and_then(|attr| attr.value.as_ref())
            .map(|value| value.value.as_str())
    }

    /// Whether any attribute (plain or directive) has this name.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.start_tag
            .attributes
            .iter()
            .any(|attr| attr.key.name == name)
    }
}

/// The start tag of an element.
#[derive(Debug, Clone, Serialize)]
pub struct StartTag {
    /// From `<` to `>`.
    pub span: Span,
    /// Whether the tag ended with `/>`.
    pub self_closing: bool,
    /// Attributes in source order.
    pub attributes: Vec<Attribute>,
}

/// The end tag of an element.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EndTag {
    /// From `</` to `>`.
    pub span: Span,
}

/// An attribute on a start tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// The element whose start tag holds this attribute.
    pub element: NodeId,
    /// The attribute name.
    pub key: AttributeKey,
    /// The value, absent for bare attributes like `disabled`.
    pub value: Option<AttributeValue>,
    /// Template binding syntax (`v-if`, `:prop`, `@click`, ...).
    pub directive: bool,
    /// From the first character of the name to the end of the value.
    pub span: Span,
}

/// The name part of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeKey {
    /// Lowercased, then adjusted for the element's namespace.
    pub name: String,
    /// As written in the source.
    pub raw_name: String,
    /// Where the name is.
    pub span: Span,
}

/// The value part of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeValue {
    /// The decoded value, without quotes.
    pub value: String,
    /// Where the value is, quotes included.
    pub span: Span,
}

/// A template-scope variable declared on an element (e.g. by `v-for`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
    /// The variable's identifier.
    pub name: String,
    /// Where the identifier is declared.
    pub span: Span,
}

/// Arena-based document tree with O(1) node access and traversal.
///
/// This structure stores all nodes in a contiguous vector, using indices
/// for all relationships. This provides:
/// - O(1) access to any node by `NodeId`
/// - O(1) parent traversal
/// - No borrowing issues (indices instead of references)
#[derive(Debug, Clone, Serialize)]
pub struct DomTree {
    /// All nodes in the tree, indexed by `NodeId`.
    /// The fragment node is always at index 0 (`NodeId::ROOT`).
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new tree with just the fragment node, spanning nothing at
    /// the very start of the input.
    #[must_use]
    pub fn new() -> Self {
        let fragment = Node {
            node_type: NodeType::Fragment,
            parent: None,
            children: Vec::new(),
            span: Span::default(),
        };
        Self {
            nodes: vec![fragment],
        }
    }

    /// Get the root fragment node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Get the number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (should always have at least the fragment).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The ID the next call to [`DomTree::alloc`] will return.
    ///
    /// Lets a caller build records that refer back to a node before the node
    /// itself exists.
    #[must_use]
    pub fn next_id(&self) -> NodeId {
        NodeId(self.nodes.len())
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType, span: Span) -> NodeId {
        let id = self.next_id();
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
            span,
        });
        id
    }

    /// Appends `child` as the last child of `parent`, updating both sides of
    /// the relationship.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.last().copied())
    }

    /// Get the span of a node.
    #[must_use]
    pub fn span(&self, id: NodeId) -> Option<Span> {
        self.get(id).map(|n| n.span)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get mutable element data if this node is an element.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| match &mut n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Extend a container's span to cover its content.
    ///
    /// The new end is the end of the element's end tag if it has one,
    /// otherwise the end of its last child. A container with neither keeps
    /// the span it was created with.
    pub fn propagate_end_location(&mut self, id: NodeId) {
        let end_tag = self
            .as_element(id)
            .and_then(|data| data.end_tag)
            .map(|tag| tag.span);
        let last = end_tag.or_else(|| self.last_child(id).and_then(|child| self.span(child)));

        if let Some(last) = last
            && let Some(node) = self.get_mut(id)
        {
            node.span.extend_to(&last);
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}
