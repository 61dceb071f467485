//! The parser's shared state and its top-level entry point. Expression
//! parsing lives in [`expr`], statement parsing in [`stmt`]; both are
//! `impl Parser` blocks operating on the [`Parser`] defined here.

mod expr;
mod stmt;

use std::sync::Arc;

use loretta_green::{create_list, create_node, Diagnostic, GreenElement, GreenNodeData, GreenToken, Severity};
use loretta_position::TextSpan;
use loretta_syntax::{LuaDialect, SyntaxKind};

use crate::budget::ParseBudget;
use crate::cursor::TokenCursor;
use crate::error::{ParseError, ParseResult};

/// Kinds that end a block: the caller-supplied terminator keyword (or
/// end of file) rather than a statement starter.
const BLOCK_TERMINATORS: &[SyntaxKind] =
    &[SyntaxKind::EndKeyword, SyntaxKind::ElseKeyword, SyntaxKind::ElseifKeyword, SyntaxKind::UntilKeyword, SyntaxKind::EndOfFileToken];

pub(crate) struct Parser {
    cursor: TokenCursor,
    dialect: LuaDialect,
    budget: ParseBudget,
    depth: usize,
    diagnostics: Vec<Diagnostic>,
}

impl Parser {
    fn new(tokens: Vec<GreenToken>, dialect: LuaDialect, budget: ParseBudget) -> Self {
        Parser { cursor: TokenCursor::new(tokens), dialect, budget, depth: 0, diagnostics: Vec::new() }
    }

    fn tok(token: GreenToken) -> GreenElement {
        GreenElement::Token(Arc::new(token))
    }

    fn node(node: GreenNodeData) -> GreenElement {
        GreenElement::Node(Arc::new(node))
    }

    /// Enters one level of expression/statement recursion. Returns
    /// `false` once `budget.max_depth` is exceeded, in which case the
    /// caller must stop recursing and fall back to a placeholder rather
    /// than descend further — adversarially deep input fails with a
    /// diagnostic instead of a stack overflow.
    fn enter(&mut self) -> bool {
        self.depth += 1;
        if self.depth > self.budget.max_depth {
            if self.depth == self.budget.max_depth + 1 {
                let span = self.cursor.current_span();
                self.push_diagnostic("LOPS0002", "nesting exceeds the parser's recursion budget", span);
            }
            return false;
        }
        true
    }

    fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Records a diagnostic unless the error budget has already been
    /// exhausted, so a single pathological input can't grow an unbounded
    /// diagnostic list.
    fn push_diagnostic(&mut self, id: &'static str, message: impl Into<Arc<str>>, span: TextSpan) {
        if self.diagnostics.len() < self.budget.max_errors {
            self.diagnostics.push(Diagnostic::at_span(id, Severity::Error, message, span));
        }
    }

    fn at_block_terminator(&self) -> bool {
        BLOCK_TERMINATORS.contains(&self.cursor.current_kind())
    }

    /// Parses statements until a block terminator, `return`, or the
    /// error budget is reached, wrapping them in a `List` under a `Block`
    /// node (even a single- or zero-statement block, for a uniform shape).
    /// Guarded by the recursion budget: a block is reachable only by
    /// descending through a statement or expression that already entered
    /// one level, so this is where runaway nesting (`do do do ...`) is
    /// actually stopped.
    fn parse_block(&mut self) -> GreenElement {
        if !self.enter() {
            self.exit();
            return Self::node(create_node(SyntaxKind::Block, vec![Some(Self::node(create_list(Vec::new())))]));
        }
        let mut statements = Vec::new();
        while !self.at_block_terminator() && self.diagnostics.len() < self.budget.max_errors {
            if self.cursor.current_kind() == SyntaxKind::ReturnKeyword {
                statements.push(self.parse_return_statement());
                break;
            }
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
        }
        self.exit();
        let list = Self::node(create_list(statements));
        Self::node(create_node(SyntaxKind::Block, vec![Some(list)]))
    }

    /// Skips a token that starts neither a recognized statement nor a
    /// block terminator, folding it into trivia, and reports it once.
    fn recover_unexpected_token(&mut self) {
        self.push_diagnostic(
            "LOPS0003",
            format!("unexpected {:?}", self.cursor.current_kind()),
            self.cursor.current_span(),
        );
        self.cursor.skip_one();
    }

    pub(crate) fn run(mut self) -> ParseResult<(GreenNodeData, Vec<Diagnostic>)> {
        let block = self.parse_block();
        if self.cursor.current_kind() != SyntaxKind::EndOfFileToken {
            return Err(ParseError::MissingEndOfFile);
        }
        let eof = Self::tok(self.cursor.bump());
        let unit = create_node(SyntaxKind::CompilationUnit, vec![Some(block), Some(eof)]);
        Ok((unit, self.diagnostics))
    }
}

/// Parses a whole compilation unit from a lexed token stream (which must
/// end in an `EndOfFileToken`, as every `loretta-lexer` run produces).
#[tracing::instrument(skip(tokens))]
pub fn parse_compilation_unit(tokens: Vec<GreenToken>, dialect: LuaDialect, budget: ParseBudget) -> ParseResult<(GreenNodeData, Vec<Diagnostic>)> {
    Parser::new(tokens, dialect, budget).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> (GreenNodeData, Vec<Diagnostic>) {
        let (tokens, lex_diagnostics) = loretta_lexer::lex(text, LuaDialect::lua54());
        assert!(lex_diagnostics.is_empty(), "unexpected lexer diagnostics: {lex_diagnostics:?}");
        parse_compilation_unit(tokens, LuaDialect::lua54(), ParseBudget::default()).expect("token stream from the lexer always ends in EndOfFileToken")
    }

    fn children_of(node: &GreenNodeData) -> Vec<GreenElement> {
        (0..node.full_slot_count()).filter_map(|i| node.get_slot(i).cloned()).collect()
    }

    #[test]
    fn parses_a_local_assignment() {
        let (unit, diagnostics) = parse("local x = 1 + 2\n");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(unit.kind(), SyntaxKind::CompilationUnit);
        let block = children_of(&unit)[0].clone();
        let statement_list = children_of(block.as_node().expect("block is a node")).remove(0);
        let statements = children_of(statement_list.as_node().expect("statement list is a node"));
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].kind(), SyntaxKind::LocalVariableStatement);
    }

    #[test]
    fn parses_an_if_else_chain() {
        let (unit, diagnostics) = parse("if a then return 1 elseif b then return 2 else return 3 end\n");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(unit.kind(), SyntaxKind::CompilationUnit);
    }

    #[test]
    fn parses_a_method_call_chain() {
        let (_unit, diagnostics) = parse("a.b:c(1, 2):d()\n");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
    }

    #[test]
    fn recovers_from_a_missing_closing_paren() {
        let (_unit, diagnostics) = parse("local x = (1 + 2\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].id.as_ref(), "LOPS0001");
    }

    #[test]
    fn disambiguates_numeric_and_generic_for() {
        let (_unit, diagnostics) = parse("for i = 1, 10 do end\nfor k, v in pairs(t) do end\n");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
    }

    #[test]
    fn recursion_budget_stops_without_a_stack_overflow() {
        let source = "local x = ".to_string() + &"(".repeat(10_000) + "1" + &")".repeat(10_000) + "\n";
        let (tokens, _) = loretta_lexer::lex(&source, LuaDialect::lua54());
        let budget = ParseBudget { max_depth: 50, max_errors: 500 };
        let (_unit, diagnostics) = parse_compilation_unit(tokens, LuaDialect::lua54(), budget).expect("lexer always terminates with EndOfFileToken");
        assert!(diagnostics.iter().any(|d| d.id.as_ref() == "LOPS0002"));
    }
}
