//! [`RedElement`]: the red-tree counterpart of [`loretta_green::GreenElement`] —
//! a child slot that's either a node or a token, now carrying a parent
//! pointer and an absolute position.

use loretta_position::TextSpan;
use loretta_syntax::SyntaxKind;

use crate::node::RedNode;
use crate::token::RedToken;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RedElement {
    Node(RedNode),
    Token(RedToken),
}

impl RedElement {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            RedElement::Node(n) => n.kind(),
            RedElement::Token(t) => t.kind(),
        }
    }

    pub fn position(&self) -> u32 {
        match self {
            RedElement::Node(n) => n.position(),
            RedElement::Token(t) => t.position(),
        }
    }

    pub fn full_span(&self) -> TextSpan {
        match self {
            RedElement::Node(n) => n.full_span(),
            RedElement::Token(t) => t.full_span(),
        }
    }

    pub fn span(&self) -> TextSpan {
        match self {
            RedElement::Node(n) => n.span(),
            RedElement::Token(t) => t.span(),
        }
    }

    pub fn parent(&self) -> Option<RedNode> {
        match self {
            RedElement::Node(n) => n.parent(),
            RedElement::Token(t) => t.parent(),
        }
    }

    pub fn as_node(&self) -> Option<&RedNode> {
        match self {
            RedElement::Node(n) => Some(n),
            RedElement::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&RedToken> {
        match self {
            RedElement::Token(t) => Some(t),
            RedElement::Node(_) => None,
        }
    }

    pub fn into_node(self) -> Option<RedNode> {
        match self {
            RedElement::Node(n) => Some(n),
            RedElement::Token(_) => None,
        }
    }
}
