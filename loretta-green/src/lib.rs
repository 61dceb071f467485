//! The immutable green syntax tree: nodes, tokens, and trivia with
//! widths, slot counts, diagnostics, and annotations. No parent pointers
//! live here — see `loretta-red` for the lazily-materialized layer that
//! adds them.

mod annotation;
mod children;
mod diagnostic;
mod node;
mod serialize;
mod token;
mod trivia;

pub use annotation::{elastic_annotation, SyntaxAnnotation};
pub use children::GreenChildren;
pub use diagnostic::{Diagnostic, DiagnosticLocation, Severity};
pub use node::{GreenElement, GreenNodeData, NodeFlags};
pub use serialize::{read_from, write_to, SerializeError};
pub use token::{GreenToken, TokenValue};
pub use trivia::GreenTrivia;

use loretta_syntax::SyntaxKind;
use std::sync::Arc;

/// A root or detached green node, reference-counted so it can be shared
/// freely across red trees and threads without cloning its contents.
pub type GreenNode = Arc<GreenNodeData>;

/// Builds a child-sequence node of kind [`SyntaxKind::List`], picking the
/// cheapest slot representation and deriving the separated-list flag.
/// This is the only sanctioned way to build a list node; callers never
/// construct [`GreenNodeData`] with kind `List` directly.
pub fn create_list(children: Vec<GreenElement>) -> GreenNodeData {
    let slots = children.into_iter().map(Some).collect();
    GreenNodeData::from_children(SyntaxKind::List, GreenChildren::new(slots))
}

/// Builds a fixed-arity interior node (a real syntax node, not a list):
/// a binary expression's `[left, operator, right]`, an `if` statement's
/// `[if, condition, then, block, else_clause, end]`, and so on. `slots`
/// may contain `None` for a structurally optional child.
pub fn create_node(kind: SyntaxKind, slots: Vec<Option<GreenElement>>) -> GreenNodeData {
    debug_assert!(!kind.is_list(), "use create_list for {kind:?}");
    GreenNodeData::from_children(kind, GreenChildren::new(slots))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn tok(kind: SyntaxKind, text: &str) -> GreenElement {
        GreenElement::Token(Arc::new(GreenToken::new(kind, Some(Arc::from(text)))))
    }

    #[test]
    fn create_list_picks_many_and_detects_separated() {
        let list = create_list(vec![
            tok(SyntaxKind::IdentifierToken, "a"),
            tok(SyntaxKind::CommaToken, ","),
            tok(SyntaxKind::IdentifierToken, "b"),
            tok(SyntaxKind::CommaToken, ","),
            tok(SyntaxKind::IdentifierToken, "c"),
        ]);
        assert_eq!(list.kind(), SyntaxKind::List);
        assert!(list.is_separated_list());
        assert_eq!(list.full_slot_count(), 5);
    }

    #[test]
    fn create_list_single_child_is_not_separated() {
        let list = create_list(vec![tok(SyntaxKind::IdentifierToken, "a")]);
        assert!(!list.is_separated_list());
    }

    #[test]
    fn create_node_builds_fixed_arity_binary_expression() {
        let node = create_node(
            SyntaxKind::BinaryExpression,
            vec![Some(tok(SyntaxKind::NumberToken, "1")), Some(tok(SyntaxKind::PlusToken, "+")), Some(tok(SyntaxKind::NumberToken, "2"))],
        );
        assert_eq!(node.kind(), SyntaxKind::BinaryExpression);
        assert_eq!(node.slot_count(), 3);
        assert!(!node.is_separated_list());
    }
}
