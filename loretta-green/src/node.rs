//! Interior green nodes and the `Node | Token` element used as a child
//! slot.

use std::sync::Arc;

use loretta_syntax::SyntaxKind;

use crate::annotation::SyntaxAnnotation;
use crate::children::{is_separated, GreenChildren};
use crate::diagnostic::Diagnostic;
use crate::token::GreenToken;

/// Bit flags summarizing a node/token without walking its subtree. Set
/// once at construction (green nodes never mutate), so a caller can skip
/// an entire diagnostic-free or annotation-free branch during traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeFlags(u8);

impl NodeFlags {
    pub const CONTAINS_DIAGNOSTICS: NodeFlags = NodeFlags(1 << 0);
    pub const CONTAINS_ANNOTATIONS: NodeFlags = NodeFlags(1 << 1);
    pub const IS_MISSING: NodeFlags = NodeFlags(1 << 2);
    pub const IS_TOKEN: NodeFlags = NodeFlags(1 << 3);
    pub const IS_TRIVIA: NodeFlags = NodeFlags(1 << 4);
    pub const IS_LIST: NodeFlags = NodeFlags(1 << 5);

    const NONE: NodeFlags = NodeFlags(0);

    fn union(self, other: NodeFlags) -> NodeFlags {
        NodeFlags(self.0 | other.0)
    }

    pub fn contains(self, flag: NodeFlags) -> bool {
        self.0 & flag.0 == flag.0
    }
}

/// A child slot: either a nested node or a leaf token.
#[derive(Debug, Clone, PartialEq)]
pub enum GreenElement {
    Token(Arc<GreenToken>),
    Node(Arc<GreenNodeData>),
}

impl GreenElement {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            GreenElement::Token(t) => t.kind(),
            GreenElement::Node(n) => n.kind(),
        }
    }

    pub fn full_width(&self) -> u32 {
        match self {
            GreenElement::Token(t) => t.full_width(),
            GreenElement::Node(n) => n.full_width(),
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self, GreenElement::Node(_))
    }

    pub fn is_token(&self) -> bool {
        matches!(self, GreenElement::Token(_))
    }

    pub fn as_token(&self) -> Option<&GreenToken> {
        match self {
            GreenElement::Token(t) => Some(t),
            GreenElement::Node(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<&GreenNodeData> {
        match self {
            GreenElement::Node(n) => Some(n),
            GreenElement::Token(_) => None,
        }
    }

    pub fn flags(&self) -> NodeFlags {
        match self {
            GreenElement::Token(t) => {
                let mut flags = NodeFlags::NONE.union(NodeFlags::IS_TOKEN);
                if t.kind().is_trivia() {
                    flags = flags.union(NodeFlags::IS_TRIVIA);
                }
                if t.is_missing() {
                    flags = flags.union(NodeFlags::IS_MISSING);
                }
                if !t.diagnostics().is_empty() {
                    flags = flags.union(NodeFlags::CONTAINS_DIAGNOSTICS);
                }
                if !t.annotations().is_empty() {
                    flags = flags.union(NodeFlags::CONTAINS_ANNOTATIONS);
                }
                flags
            }
            GreenElement::Node(n) => n.flags,
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            GreenElement::Token(t) => t.diagnostics(),
            GreenElement::Node(n) => n.diagnostics(),
        }
    }

    /// Appends this element's exact source text — leading trivia, token
    /// text, trailing trivia, recursively for nested nodes — to `out`.
    pub fn write_full_text(&self, out: &mut String) {
        match self {
            GreenElement::Token(t) => {
                for trivia in t.leading_trivia() {
                    out.push_str(trivia.text());
                }
                out.push_str(t.text());
                for trivia in t.trailing_trivia() {
                    out.push_str(trivia.text());
                }
            }
            GreenElement::Node(n) => n.write_full_text(out),
        }
    }
}

/// An interior node: a non-leaf value with `slot_count` children, each a
/// nested [`GreenNodeData`] or a [`GreenToken`]. A node whose kind is
/// [`SyntaxKind::List`] is a homogeneous child sequence rather than a
/// semantically fixed-arity node; the representation is identical either
/// way, only `kind` and the derived `is_separated` flag differ.
#[derive(Debug, Clone, PartialEq)]
pub struct GreenNodeData {
    kind: SyntaxKind,
    children: GreenChildren,
    full_width: u32,
    is_separated: bool,
    diagnostics: Arc<[Diagnostic]>,
    annotations: Arc<[SyntaxAnnotation]>,
    flags: NodeFlags,
}

fn compute_flags(kind: SyntaxKind, children: &GreenChildren, diagnostics: &[Diagnostic], annotations: &[SyntaxAnnotation]) -> NodeFlags {
    let mut flags = NodeFlags::NONE;
    if kind.is_list() {
        flags = flags.union(NodeFlags::IS_LIST);
    }
    if !diagnostics.is_empty() {
        flags = flags.union(NodeFlags::CONTAINS_DIAGNOSTICS);
    }
    if !annotations.is_empty() {
        flags = flags.union(NodeFlags::CONTAINS_ANNOTATIONS);
    }
    for slot in children.iter().flatten() {
        if slot.flags().contains(NodeFlags::CONTAINS_DIAGNOSTICS) {
            flags = flags.union(NodeFlags::CONTAINS_DIAGNOSTICS);
        }
        if slot.flags().contains(NodeFlags::CONTAINS_ANNOTATIONS) {
            flags = flags.union(NodeFlags::CONTAINS_ANNOTATIONS);
        }
    }
    flags
}

impl GreenNodeData {
    /// Builds an interior node from already-specialized `children`. Used
    /// by [`crate::create_list`] and by fixed-arity node factories (e.g. a
    /// binary expression's `[left, operator, right]`).
    pub fn from_children(kind: SyntaxKind, children: GreenChildren) -> Self {
        Self::with_metadata(kind, children, Arc::from([].as_slice()), Arc::from([].as_slice()))
    }

    pub fn with_metadata(
        kind: SyntaxKind,
        children: GreenChildren,
        diagnostics: Arc<[Diagnostic]>,
        annotations: Arc<[SyntaxAnnotation]>,
    ) -> Self {
        let full_width = children.iter().flatten().map(GreenElement::full_width).sum();
        let is_separated = kind.is_list() && is_separated(&children);
        let flags = compute_flags(kind, &children, &diagnostics, &annotations);
        GreenNodeData { kind, children, full_width, is_separated, diagnostics, annotations, flags }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    pub fn full_width(&self) -> u32 {
        self.full_width
    }

    /// Capped at 255 per spec; callers needing the true count for large
    /// lists must use [`GreenNodeData::full_slot_count`].
    pub fn slot_count(&self) -> u8 {
        self.children.slot_count().min(255) as u8
    }

    pub fn full_slot_count(&self) -> usize {
        self.children.slot_count()
    }

    pub fn get_slot(&self, index: usize) -> Option<&GreenElement> {
        self.children.get(index)
    }

    pub fn is_separated_list(&self) -> bool {
        self.is_separated
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn annotations(&self) -> &[SyntaxAnnotation] {
        &self.annotations
    }

    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    /// Produces a new node with replaced diagnostics, sharing children.
    pub fn with_diagnostics(&self, diagnostics: impl Into<Arc<[Diagnostic]>>) -> Self {
        let diagnostics = diagnostics.into();
        let flags = compute_flags(self.kind, &self.children, &diagnostics, &self.annotations);
        GreenNodeData { diagnostics, flags, ..self.clone() }
    }

    /// Produces a new node with replaced annotations, sharing children.
    pub fn with_annotations(&self, annotations: impl Into<Arc<[SyntaxAnnotation]>>) -> Self {
        let annotations = annotations.into();
        let flags = compute_flags(self.kind, &self.children, &self.diagnostics, &annotations);
        GreenNodeData { annotations, flags, ..self.clone() }
    }

    /// Appends the exact source text of every token in this subtree, in
    /// order, including trivia — re-lexing and re-parsing the result
    /// reproduces an identical tree.
    pub fn write_full_text(&self, out: &mut String) {
        for slot in self.children.iter().flatten() {
            slot.write_full_text(out);
        }
    }

    /// The exact source text this subtree was built from.
    pub fn to_full_string(&self) -> String {
        let mut out = String::with_capacity(self.full_width as usize);
        self.write_full_text(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::children::GreenChildren;
    use crate::token::GreenToken;
    use crate::trivia::GreenTrivia;

    fn tok(kind: SyntaxKind, text: &str) -> GreenElement {
        GreenElement::Token(Arc::new(GreenToken::new(kind, Some(Arc::from(text)))))
    }

    #[test]
    fn full_width_sums_children() {
        let children = GreenChildren::new(vec![
            Some(tok(SyntaxKind::NumberToken, "1")),
            Some(tok(SyntaxKind::PlusToken, "+")),
            Some(tok(SyntaxKind::NumberToken, "2")),
        ]);
        let node = GreenNodeData::from_children(SyntaxKind::BinaryExpression, children);
        assert_eq!(node.full_width(), 3);
        assert_eq!(node.slot_count(), 3);
    }

    #[test]
    fn diagnostics_propagate_contains_flag() {
        let diag = Diagnostic::at_span(
            "LOX0001",
            crate::diagnostic::Severity::Error,
            "bad",
            loretta_position::TextSpan::new(0, 1),
        );
        let inner = GreenNodeData::from_children(
            SyntaxKind::NumberLiteralExpression,
            GreenChildren::new(vec![Some(tok(SyntaxKind::NumberToken, "1"))]),
        )
        .with_diagnostics(Arc::from(vec![diag]));
        assert!(inner.flags().contains(NodeFlags::CONTAINS_DIAGNOSTICS));

        let outer = GreenNodeData::from_children(
            SyntaxKind::ParenthesizedExpression,
            GreenChildren::new(vec![Some(GreenElement::Node(Arc::new(inner)))]),
        );
        assert!(outer.flags().contains(NodeFlags::CONTAINS_DIAGNOSTICS));
    }

    #[test]
    fn missing_optional_slot_contributes_zero_width() {
        let children = GreenChildren::new(vec![Some(tok(SyntaxKind::IfKeyword, "if")), None, Some(tok(SyntaxKind::EndKeyword, "end"))]);
        let node = GreenNodeData::from_children(SyntaxKind::IfStatement, children);
        assert_eq!(node.full_width(), 5);
        assert_eq!(node.get_slot(1), None);
    }

    #[test]
    fn to_full_string_concatenates_trivia_and_token_text() {
        let plus = GreenToken::new(SyntaxKind::PlusToken, None::<Arc<str>>)
            .with_leading_trivia(Arc::from(vec![GreenTrivia::new(SyntaxKind::WhitespaceTrivia, " ")]))
            .with_trailing_trivia(Arc::from(vec![GreenTrivia::new(SyntaxKind::WhitespaceTrivia, " ")]));
        let children = GreenChildren::new(vec![
            Some(tok(SyntaxKind::NumberToken, "1")),
            Some(GreenElement::Token(Arc::new(plus))),
            Some(tok(SyntaxKind::NumberToken, "2")),
        ]);
        let node = GreenNodeData::from_children(SyntaxKind::BinaryExpression, children);
        assert_eq!(node.to_full_string(), "1 + 2");
    }
}
