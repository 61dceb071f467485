//! Green tokens: leaf values carrying their exact source text plus
//! optional leading/trailing trivia.

use std::sync::Arc;

use loretta_syntax::SyntaxKind;

use crate::annotation::SyntaxAnnotation;
use crate::diagnostic::Diagnostic;
use crate::trivia::GreenTrivia;

/// The parsed semantic value of a literal token, distinct from its raw
/// source text (e.g. `NumberToken` text `"0x1p4"` has value `16.0`).
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Number(f64),
    Integer(i64),
    Str(Arc<str>),
}

/// A leaf node: `kind`, exact source `text` (absent for kinds with fixed
/// text, e.g. punctuation, to avoid storing a copy of a string already
/// known from `loretta_syntax::token_text`), optional semantic `value`,
/// and optional leading/trailing trivia.
#[derive(Debug, Clone, PartialEq)]
pub struct GreenToken {
    kind: SyntaxKind,
    text: Option<Arc<str>>,
    value: Option<TokenValue>,
    leading: Arc<[GreenTrivia]>,
    trailing: Arc<[GreenTrivia]>,
    is_missing: bool,
    diagnostics: Arc<[Diagnostic]>,
    annotations: Arc<[SyntaxAnnotation]>,
}

static NO_TRIVIA: &[GreenTrivia] = &[];

impl GreenToken {
    pub fn new(kind: SyntaxKind, text: Option<impl Into<Arc<str>>>) -> Self {
        GreenToken {
            kind,
            text: text.map(Into::into),
            value: None,
            leading: Arc::from(NO_TRIVIA),
            trailing: Arc::from(NO_TRIVIA),
            is_missing: false,
            diagnostics: Arc::from([].as_slice()),
            annotations: Arc::from([].as_slice()),
        }
    }

    /// A zero-width token synthesized during parser error recovery:
    /// empty text, no trivia, the `is_missing` flag set, and (typically)
    /// a diagnostic explaining what was expected.
    pub fn missing(kind: SyntaxKind) -> Self {
        GreenToken { is_missing: true, ..GreenToken::new(kind, Some(Arc::from(""))) }
    }

    pub fn with_value(mut self, value: TokenValue) -> Self {
        self.value = Some(value);
        self
    }

    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    /// The token's exact text: its own stored text if present, else the
    /// fixed text declared for its kind (punctuation, keywords).
    pub fn text(&self) -> &str {
        self.text.as_deref().or_else(|| loretta_syntax::token_text(self.kind)).unwrap_or("")
    }

    pub fn value(&self) -> Option<&TokenValue> {
        self.value.as_ref()
    }

    pub fn leading_trivia(&self) -> &[GreenTrivia] {
        &self.leading
    }

    pub fn trailing_trivia(&self) -> &[GreenTrivia] {
        &self.trailing
    }

    pub fn is_missing(&self) -> bool {
        self.is_missing
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn annotations(&self) -> &[SyntaxAnnotation] {
        &self.annotations
    }

    /// `leading.full_width + text.length + trailing.full_width`.
    pub fn full_width(&self) -> u32 {
        let leading: u32 = self.leading.iter().map(GreenTrivia::full_width).sum();
        let trailing: u32 = self.trailing.iter().map(GreenTrivia::full_width).sum();
        leading + self.text().len() as u32 + trailing
    }

    /// `text.length` excluding leading/trailing trivia.
    pub fn width(&self) -> u32 {
        self.text().len() as u32
    }

    /// Produces a new token with replaced leading trivia, sharing
    /// everything else.
    pub fn with_leading_trivia(&self, trivia: impl Into<Arc<[GreenTrivia]>>) -> Self {
        GreenToken { leading: trivia.into(), ..self.clone() }
    }

    /// Produces a new token with replaced trailing trivia, sharing
    /// everything else.
    pub fn with_trailing_trivia(&self, trivia: impl Into<Arc<[GreenTrivia]>>) -> Self {
        GreenToken { trailing: trivia.into(), ..self.clone() }
    }

    pub fn with_diagnostics(&self, diagnostics: impl Into<Arc<[Diagnostic]>>) -> Self {
        GreenToken { diagnostics: diagnostics.into(), ..self.clone() }
    }

    pub fn with_annotations(&self, annotations: impl Into<Arc<[SyntaxAnnotation]>>) -> Self {
        GreenToken { annotations: annotations.into(), ..self.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_width_includes_trivia() {
        let tok = GreenToken::new(SyntaxKind::IdentifierToken, Some(Arc::from("foo")))
            .with_leading_trivia(Arc::from(vec![GreenTrivia::new(SyntaxKind::WhitespaceTrivia, "  ")]))
            .with_trailing_trivia(Arc::from(vec![GreenTrivia::new(SyntaxKind::WhitespaceTrivia, " ")]));
        assert_eq!(tok.width(), 3);
        assert_eq!(tok.full_width(), 6);
    }

    #[test]
    fn fixed_text_kinds_need_no_stored_text() {
        let tok: GreenToken = GreenToken::new(SyntaxKind::PlusToken, None::<Arc<str>>);
        assert_eq!(tok.text(), "+");
    }

    #[test]
    fn missing_token_is_zero_width() {
        let tok = GreenToken::missing(SyntaxKind::IdentifierToken);
        assert!(tok.is_missing());
        assert_eq!(tok.full_width(), 0);
    }
}
