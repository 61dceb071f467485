//! [`RedNode`]: a green node plus the parent pointer and absolute
//! position a green node can't carry on its own (it may be shared by
//! many parents, or none). Child nodes are materialized on first access
//! and cached in a per-node slot table so repeated traversal doesn't
//! re-walk the green tree; child *tokens* are cheap enough (an `Arc`
//! clone plus an offset) that they're never cached, only child nodes.

use std::sync::{Arc, Mutex, OnceLock, PoisonError, Weak};

use loretta_green::{GreenElement, GreenNode, GreenNodeData, GreenTrivia};
use loretta_position::TextSpan;
use loretta_syntax::SyntaxKind;

use crate::element::RedElement;
use crate::token::RedToken;

#[derive(Clone)]
enum CachedSlot {
    Empty,
    /// An ordinary (non-list) child: kept alive as long as its parent is,
    /// since there are few of them and they're cheap to retain.
    Strong(RedNode),
    /// A list element: weak, so a large separated list (say, a thousand
    /// table-constructor fields) can shed rarely-visited children under
    /// memory pressure. A dropped child is transparently rebuilt from the
    /// green tree the next time it's asked for.
    Weak(Weak<RedNodeData>),
}

struct RedNodeData {
    green: GreenNode,
    parent: Option<RedNode>,
    position: u32,
    children: OnceLock<Mutex<Vec<CachedSlot>>>,
}

/// A lazily-materialized node in the red tree: a shared handle to a
/// green node, the chain of parents above it, and its absolute byte
/// position. Cheap to clone (an `Arc` bump).
#[derive(Clone)]
pub struct RedNode(Arc<RedNodeData>);

impl PartialEq for RedNode {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for RedNode {}

impl std::fmt::Debug for RedNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedNode").field("kind", &self.kind()).field("position", &self.position()).finish()
    }
}

impl RedNode {
    /// Wraps a green tree as the root of a red tree, positioned at 0.
    pub fn new_root(green: GreenNode) -> RedNode {
        RedNode(Arc::new(RedNodeData { green, parent: None, position: 0, children: OnceLock::new() }))
    }

    fn new_child(green: GreenNode, parent: RedNode, position: u32) -> RedNode {
        RedNode(Arc::new(RedNodeData { green, parent: Some(parent), position, children: OnceLock::new() }))
    }

    fn green(&self) -> &GreenNodeData {
        &self.0.green
    }

    pub fn kind(&self) -> SyntaxKind {
        self.green().kind()
    }

    pub fn position(&self) -> u32 {
        self.0.position
    }

    /// The full span, including this node's leading and trailing trivia.
    pub fn full_span(&self) -> TextSpan {
        TextSpan::new(self.position(), self.green().full_width())
    }

    /// The span excluding the leading trivia of the first token and the
    /// trailing trivia of the last token in this subtree; interior
    /// trivia (between two of this node's own tokens) still counts.
    pub fn span(&self) -> TextSpan {
        let full = self.full_span();
        let slots = self.green().full_slot_count();
        if slots == 0 {
            return TextSpan::empty(full.start);
        }
        let leading = (0..slots).find_map(|i| self.green().get_slot(i)).map(leading_trivia_width).unwrap_or(0);
        let trailing = (0..slots).rev().find_map(|i| self.green().get_slot(i)).map(trailing_trivia_width).unwrap_or(0);
        TextSpan::new(full.start + leading, full.length.saturating_sub(leading + trailing))
    }

    pub fn parent(&self) -> Option<RedNode> {
        self.0.parent.clone()
    }

    /// This node, then each ancestor in turn, up to and including the root.
    pub fn ancestors_and_self(&self) -> impl Iterator<Item = RedNode> {
        std::iter::successors(Some(self.clone()), RedNode::parent)
    }

    /// Every descendant node (not token) in pre-order, not including
    /// `self`. Explicit stack rather than recursion, so a deeply nested
    /// tree can't blow the native stack just by being walked.
    pub fn descendants(&self) -> impl Iterator<Item = RedNode> {
        Descendants { stack: self.child_nodes_and_tokens().filter_map(RedElement::into_node).rev().collect() }
    }

    /// A lazy, ordered, double-ended view over this node's present child
    /// slots (absent optional children are skipped). Each access
    /// advances by the previous slot's full width, so positions stay
    /// correct regardless of which end is being consumed.
    pub fn child_nodes_and_tokens(&self) -> ChildNodesAndTokens {
        ChildNodesAndTokens { parent: self.clone(), front: 0, back: self.green().full_slot_count() }
    }

    /// Materializes (or returns the cached) element at `index`, or
    /// `None` if that slot is an absent optional child.
    pub fn get_child(&self, index: usize) -> Option<RedElement> {
        let slot = self.green().get_slot(index)?;
        let offset = self.position() + slot_offset(self.green(), index);
        match slot {
            GreenElement::Token(token) => Some(RedElement::Token(RedToken::new(Arc::clone(token), Some(self.clone()), offset))),
            GreenElement::Node(green_child) => Some(RedElement::Node(self.materialize_child(index, Arc::clone(green_child), offset))),
        }
    }

    fn materialize_child(&self, index: usize, green_child: GreenNode, offset: u32) -> RedNode {
        let lock = self.0.children.get_or_init(|| Mutex::new(vec![CachedSlot::Empty; self.green().full_slot_count()]));
        let mut cache = lock.lock().unwrap_or_else(PoisonError::into_inner);
        match &cache[index] {
            CachedSlot::Strong(node) => return node.clone(),
            CachedSlot::Weak(weak) => {
                if let Some(inner) = weak.upgrade() {
                    return RedNode(inner);
                }
            }
            CachedSlot::Empty => {}
        }
        let child = RedNode::new_child(green_child, self.clone(), offset);
        cache[index] = if self.kind().is_list() { CachedSlot::Weak(Arc::downgrade(&child.0)) } else { CachedSlot::Strong(child.clone()) };
        child
    }
}

fn slot_offset(green: &GreenNodeData, index: usize) -> u32 {
    (0..index).map(|i| green.get_slot(i).map(GreenElement::full_width).unwrap_or(0)).sum()
}

fn leading_trivia_width(element: &GreenElement) -> u32 {
    match element {
        GreenElement::Token(t) => t.leading_trivia().iter().map(GreenTrivia::full_width).sum(),
        GreenElement::Node(n) => (0..n.full_slot_count()).find_map(|i| n.get_slot(i)).map(leading_trivia_width).unwrap_or(0),
    }
}

fn trailing_trivia_width(element: &GreenElement) -> u32 {
    match element {
        GreenElement::Token(t) => t.trailing_trivia().iter().map(GreenTrivia::full_width).sum(),
        GreenElement::Node(n) => (0..n.full_slot_count()).rev().find_map(|i| n.get_slot(i)).map(trailing_trivia_width).unwrap_or(0),
    }
}

/// Forward/reverse iterator over a node's present children, produced by
/// [`RedNode::child_nodes_and_tokens`].
pub struct ChildNodesAndTokens {
    parent: RedNode,
    front: usize,
    back: usize,
}

impl Iterator for ChildNodesAndTokens {
    type Item = RedElement;

    fn next(&mut self) -> Option<RedElement> {
        while self.front < self.back {
            let index = self.front;
            self.front += 1;
            if let Some(element) = self.parent.get_child(index) {
                return Some(element);
            }
        }
        None
    }
}

impl DoubleEndedIterator for ChildNodesAndTokens {
    fn next_back(&mut self) -> Option<RedElement> {
        while self.back > self.front {
            self.back -= 1;
            if let Some(element) = self.parent.get_child(self.back) {
                return Some(element);
            }
        }
        None
    }
}

struct Descendants {
    stack: Vec<RedNode>,
}

impl Iterator for Descendants {
    type Item = RedNode;

    fn next(&mut self) -> Option<RedNode> {
        let node = self.stack.pop()?;
        let mut children: Vec<RedNode> = node.child_nodes_and_tokens().filter_map(RedElement::into_node).collect();
        children.reverse();
        self.stack.extend(children);
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loretta_syntax::LuaDialect;

    fn root_for(text: &str) -> RedNode {
        let (tokens, diagnostics) = loretta_lexer::lex(text, LuaDialect::lua54());
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let (green, diagnostics) =
            loretta_parser::parse_compilation_unit(tokens, LuaDialect::lua54(), loretta_parser::ParseBudget::default()).expect("lexer output always ends in EOF");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        RedNode::new_root(Arc::new(green))
    }

    #[test]
    fn root_has_no_parent_and_starts_at_zero() {
        let root = root_for("local x = 1\n");
        assert!(root.parent().is_none());
        assert_eq!(root.position(), 0);
    }

    #[test]
    fn every_non_root_child_has_a_parent_whose_slot_offset_matches_its_position() {
        let root = root_for("local x = 1\nlocal y = 2\n");
        for child in root.descendants() {
            let parent = child.parent().expect("descendant always has a parent");
            let slots = parent.green().full_slot_count();
            let found = (0..slots).find_map(|i| match parent.get_child(i) {
                Some(RedElement::Node(n)) if n == child => Some(parent.position() + slot_offset(parent.green(), i)),
                _ => None,
            });
            assert_eq!(Some(child.position()), found);
        }
    }

    #[test]
    fn forward_enumeration_matches_indexed_access() {
        let root = root_for("local x, y = 1, 2\n");
        let forward: Vec<RedElement> = root.child_nodes_and_tokens().collect();
        for (i, element) in forward.iter().enumerate() {
            assert_eq!(root.get_child(i).as_ref(), Some(element));
        }
    }

    #[test]
    fn reversed_enumeration_mirrors_forward() {
        let root = root_for("local x, y = 1, 2\n");
        let forward: Vec<RedElement> = root.child_nodes_and_tokens().collect();
        let mut reversed: Vec<RedElement> = root.child_nodes_and_tokens().rev().collect();
        reversed.reverse();
        pretty_assertions::assert_eq!(forward.iter().map(RedElement::kind).collect::<Vec<_>>(), reversed.iter().map(RedElement::kind).collect::<Vec<_>>());
    }

    #[test]
    fn weak_list_slots_rematerialize_after_being_dropped() {
        let root = root_for("local t = {1, 2, 3, 4, 5}\n");
        let first_pass: Vec<SyntaxKind> = root.descendants().map(|n| n.kind()).collect();
        let second_pass: Vec<SyntaxKind> = root.descendants().map(|n| n.kind()).collect();
        assert_eq!(first_pass, second_pass);
    }
}
