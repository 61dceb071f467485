//! The closed [`SyntaxKind`] enum and the classification tables derived
//! from it, shared by every green/red node, token, and trivia value in a
//! Loretta syntax tree.

mod dialect;
mod kind;
mod metadata;
mod tables;
mod validation;

pub use dialect::LuaDialect;
pub use kind::SyntaxKind;
pub use metadata::{category, property, KindMetadata, PropertyValue};
pub use tables::{is_in_category, kind_from_text, kinds_in_category, lookup_keyword, property as get_property, token_text};
pub use validation::{validate, ValidationDiagnostic};

impl SyntaxKind {
    /// True for the six trivia kinds attached to tokens, never to nodes.
    pub fn is_trivia(self) -> bool {
        metadata::raw_metadata(self).is_trivia
    }

    /// True exactly for [`SyntaxKind::List`], the generic list marker kind
    /// used by every `SyntaxList`/`SeparatedSyntaxList` green node
    /// regardless of what it holds.
    pub fn is_list(self) -> bool {
        self == SyntaxKind::List
    }

    /// True for kinds whose spelling is fixed (punctuation and hard
    /// keywords); false for identifiers, literals, trivia, and nodes.
    pub fn is_token_with_fixed_text(self) -> bool {
        metadata::raw_metadata(self).token_text.is_some()
    }

    /// True for hard keywords (`and`, `if`, ...). Soft keywords such as
    /// `continue` report `false` here; use [`SyntaxKind::is_soft_keyword`].
    pub fn is_keyword(self) -> bool {
        metadata::raw_metadata(self).is_keyword
    }

    /// True for [`SyntaxKind::ContinueKeyword`] and any other
    /// dialect-gated keyword that lexes as an identifier unless the active
    /// [`LuaDialect`](https://docs.rs/loretta-syntax) enables it.
    pub fn is_soft_keyword(self) -> bool {
        get_property(self, property::SOFT_KEYWORD) == Some(PropertyValue::Bool(true))
    }

    /// The binding power for `self` used as a prefix operator, or `None`
    /// if `self` is never a unary operator.
    pub fn unary_precedence(self) -> Option<u8> {
        match metadata::raw_metadata(self).unary_precedence {
            0 => None,
            p => Some(p),
        }
    }

    /// The binding power for `self` used as an infix operator, or `None`
    /// if `self` is never a binary operator.
    pub fn binary_precedence(self) -> Option<u8> {
        match metadata::raw_metadata(self).binary_precedence {
            0 => None,
            p => Some(p),
        }
    }

    /// True for right-associative binary operators (`..`, `^`): a
    /// right-hand recursive-descent/Pratt parser must recurse at
    /// `precedence - 1`, not `precedence`, to bind correctly.
    pub fn is_right_associative(self) -> bool {
        get_property(self, property::RIGHT_ASSOCIATIVE) == Some(PropertyValue::Bool(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_table_is_valid() {
        assert!(validate().is_empty());
    }

    #[test]
    fn precedence_matches_spec_table() {
        assert_eq!(SyntaxKind::OrKeyword.binary_precedence(), Some(1));
        assert_eq!(SyntaxKind::AndKeyword.binary_precedence(), Some(2));
        assert_eq!(SyntaxKind::DotDotToken.binary_precedence(), Some(9));
        assert!(SyntaxKind::DotDotToken.is_right_associative());
        assert_eq!(SyntaxKind::StarToken.binary_precedence(), Some(11));
        assert_eq!(SyntaxKind::CaretToken.binary_precedence(), Some(14));
        assert!(SyntaxKind::CaretToken.is_right_associative());
        assert_eq!(SyntaxKind::NotKeyword.unary_precedence(), Some(12));
        assert_eq!(SyntaxKind::HashToken.unary_precedence(), Some(12));
    }

    #[test]
    fn continue_is_soft_not_hard() {
        assert!(SyntaxKind::ContinueKeyword.is_soft_keyword());
        assert_eq!(lookup_keyword("continue"), None);
    }

    #[test]
    fn list_marker_is_unique() {
        assert!(SyntaxKind::List.is_list());
        assert!(!SyntaxKind::Block.is_list());
        assert!(!SyntaxKind::BinaryExpression.is_list());
    }

    #[test]
    fn trivia_kinds_round_trip() {
        assert!(SyntaxKind::WhitespaceTrivia.is_trivia());
        assert!(!SyntaxKind::IdentifierToken.is_trivia());
    }
}
