//! Leading/trailing trivia: whitespace, comments, and skipped-token runs
//! attached to tokens.

use std::sync::Arc;

use loretta_syntax::SyntaxKind;

/// A single piece of trivia. Unlike tokens, trivia never carries children
/// or a semantic value — just its kind and the exact source text it
/// spans.
#[derive(Debug, Clone, PartialEq)]
pub struct GreenTrivia {
    kind: SyntaxKind,
    text: Arc<str>,
}

impl GreenTrivia {
    pub fn new(kind: SyntaxKind, text: impl Into<Arc<str>>) -> Self {
        debug_assert!(kind.is_trivia(), "{kind:?} is not a trivia kind");
        GreenTrivia { kind, text: text.into() }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn full_width(&self) -> u32 {
        self.text.len() as u32
    }
}
