//! The facade: lex, parse, and get back a syntax tree in one call.
//! [`parse`] runs `loretta-lexer` then `loretta-parser` and hands back a
//! [`ParseOutput`] holding the green tree; [`ParseOutput::root`] lazily
//! materializes the red tree on top of it. Downstream tools are expected
//! to depend on this crate rather than wiring the lower-level ones
//! together themselves.

pub use loretta_green::{Diagnostic, GreenElement, GreenNode, GreenNodeData, Severity};
pub use loretta_green::{read_from as deserialize_from, write_to as serialize_to, SerializeError};
pub use loretta_parser::ParseBudget;
pub use loretta_position::SourceText;
pub use loretta_red::RedNode;
pub use loretta_syntax::LuaDialect;

use std::sync::Arc;

/// Dialect and recursion/error budget for a single [`parse`] call.
#[derive(Debug, Clone, Copy)]
pub struct ParserOptions {
    pub dialect: LuaDialect,
    pub budget: ParseBudget,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions { dialect: LuaDialect::default(), budget: ParseBudget::default() }
    }
}

/// The result of parsing: the green tree, whether any diagnostic was
/// raised while building it, and (for callers that need the detail) the
/// diagnostics themselves.
pub struct ParseOutput {
    pub green: GreenNode,
    pub diagnostics_present: bool,
    diagnostics: Vec<Diagnostic>,
}

impl ParseOutput {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The lazily-materialized red tree rooted at [`ParseOutput::green`].
    pub fn root(&self) -> RedNode {
        RedNode::new_root(Arc::clone(&self.green))
    }

    /// The exact source text this tree was parsed from, reconstructed by
    /// walking every token's leading trivia, own text, and trailing
    /// trivia in order.
    pub fn to_full_string(&self) -> String {
        self.green.to_full_string()
    }
}

/// Lexes and parses `text` under `options`, producing a syntax tree that
/// always spans the full input — malformed source is recovered into a
/// best-effort tree with diagnostics attached, never rejected outright.
#[tracing::instrument(skip(text))]
pub fn parse(text: &str, options: ParserOptions) -> ParseOutput {
    let (tokens, lex_diagnostics) = loretta_lexer::lex(text, options.dialect);
    let (green, parse_diagnostics) = match loretta_parser::parse_compilation_unit(tokens, options.dialect, options.budget) {
        Ok(result) => result,
        Err(error) => {
            tracing::error!(%error, "lexer output did not end in an end-of-file token");
            (loretta_green::create_node(loretta_syntax::SyntaxKind::CompilationUnit, vec![None, None]), Vec::new())
        }
    };
    let mut diagnostics = lex_diagnostics;
    diagnostics.extend(parse_diagnostics);
    let diagnostics_present = !diagnostics.is_empty() || green.flags().contains(loretta_green::NodeFlags::CONTAINS_DIAGNOSTICS);
    ParseOutput { green: Arc::new(green), diagnostics_present, diagnostics }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_trivial_program_without_diagnostics() {
        let output = parse("local x = 1\n", ParserOptions::default());
        assert!(!output.diagnostics_present, "{:?}", output.diagnostics());
        assert_eq!(output.root().kind(), loretta_syntax::SyntaxKind::CompilationUnit);
    }

    #[test]
    fn round_trips_exact_source_text() {
        let source = "local x, y = 1, 2\nif x < y then\n  return y\nend\n";
        let output = parse(source, ParserOptions::default());
        assert_eq!(output.to_full_string(), source);
    }

    #[test]
    fn reparsing_the_reconstructed_text_is_idempotent() {
        let source = "for i = 1, 10 do\n  print(i)\nend\n";
        let first = parse(source, ParserOptions::default());
        let reconstructed = first.to_full_string();
        let second = parse(&reconstructed, ParserOptions::default());
        assert_eq!(second.to_full_string(), reconstructed);
        assert_eq!(first.diagnostics_present, second.diagnostics_present);
    }

    #[test]
    fn missing_token_recovery_still_produces_a_full_span_tree() {
        let output = parse("local x = (1 + 2\n", ParserOptions::default());
        assert!(output.diagnostics_present);
        assert!(output.diagnostics().iter().any(|d| d.id.as_ref() == "LOPS0001"));
    }

    #[test]
    fn precedence_climbs_left_to_right_for_equal_precedence_operators() {
        let output = parse("return 1 - 2 - 3\n", ParserOptions::default());
        assert!(!output.diagnostics_present, "{:?}", output.diagnostics());
        let root = output.root();
        let outer = root
            .descendants()
            .find(|n| n.kind() == loretta_syntax::SyntaxKind::BinaryExpression)
            .expect("at least one binary expression");
        let left = outer.get_child(0).and_then(|e| e.into_node()).expect("left operand is a node");
        assert_eq!(left.kind(), loretta_syntax::SyntaxKind::BinaryExpression, "left-associative subtraction nests on the left");
    }
}
