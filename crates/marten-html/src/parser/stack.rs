//! [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
//!
//! "Initially, the stack of open elements is empty. The stack grows downwards;
//! the topmost node on the stack is the first one added to the stack, and the
//! bottommost node of the stack is the most recently added node in the stack."

use marten_dom::NodeId;

use crate::tag_names::{can_be_left_open, is_description_list_item, is_non_phrasing_element};

/// The elements that are open, outermost first.
///
/// Always mirrors the parent chain of the insertion point: each entry is the
/// parent of the next one, and the first one is a child of the fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementStack {
    elements: Vec<NodeId>,
}

impl ElementStack {
    /// An empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// "The current node is the bottommost node in this stack of open elements."
    #[must_use]
    pub fn current(&self) -> Option<NodeId> {
        self.elements.last().copied()
    }

    /// Open `id` inside the current node.
    pub fn push(&mut self, id: NodeId) {
        self.elements.push(id);
    }

    /// Close the current node.
    pub fn pop(&mut self) -> Option<NodeId> {
        self.elements.pop()
    }

    /// Number of open elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether nothing is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The open elements, outermost first.
    #[must_use]
    pub fn as_slice(&self) -> &[NodeId] {
        &self.elements
    }

    /// Depth of the innermost open element matching `predicate`.
    pub fn rposition(&self, mut predicate: impl FnMut(NodeId) -> bool) -> Option<usize> {
        self.elements.iter().rposition(|&id| predicate(id))
    }
}

/// Whether a `new_tag` start tag implicitly closes an open `current` element.
///
/// - a non-phrasing element closes a `p`,
/// - an element that can be left open is closed by another of its kind,
/// - `dt` and `dd` close each other.
#[must_use]
pub fn implies_close(current: &str, new_tag: &str) -> bool {
    (current == "p" && is_non_phrasing_element(new_tag))
        || (current == new_tag && can_be_left_open(current))
        || (is_description_list_item(current) && is_description_list_item(new_tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_order() {
        let mut stack = ElementStack::new();
        stack.push(NodeId(1));
        stack.push(NodeId(2));
        assert_eq!(stack.current(), Some(NodeId(2)));
        assert_eq!(stack.rposition(|id| id == NodeId(1)), Some(0));
        assert_eq!(stack.pop(), Some(NodeId(2)));
        assert_eq!(stack.as_slice(), &[NodeId(1)]);
    }

    #[test]
    fn test_implied_closes() {
        assert!(implies_close("p", "div"));
        assert!(implies_close("p", "p"));
        assert!(implies_close("li", "li"));
        assert!(implies_close("dt", "dd"));
        assert!(implies_close("dd", "dd"));
        assert!(!implies_close("p", "span"));
        assert!(!implies_close("div", "div"));
        assert!(!implies_close("li", "ul"));
    }
}
