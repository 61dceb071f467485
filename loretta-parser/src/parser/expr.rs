//! Pratt expression parsing. Operator precedence and associativity come
//! straight from `SyntaxKind::{unary,binary}_precedence`/
//! `is_right_associative` — this module only drives the climb, it holds
//! no precedence table of its own.

use loretta_green::{create_list, create_node, GreenElement, GreenToken};
use loretta_syntax::SyntaxKind;

use super::Parser;

impl Parser {
    /// Parses an expression, consuming binary operators whose precedence
    /// is at least `min_binding_power`. A right-associative operator
    /// recurses at its own precedence; a left-associative one recurses
    /// one level higher, so a same-precedence operator to its right
    /// binds to the *outer* call instead of being swallowed here.
    pub(super) fn parse_expression(&mut self, min_binding_power: u8) -> GreenElement {
        if !self.enter() {
            self.exit();
            return self.missing_expression();
        }
        let mut left = self.parse_unary();
        while let Some(precedence) = self.cursor.current_kind().binary_precedence() {
            if precedence < min_binding_power {
                break;
            }
            let operator_kind = self.cursor.current_kind();
            let operator = Self::tok(self.cursor.bump());
            let next_min = if operator_kind.is_right_associative() { precedence } else { precedence + 1 };
            let right = self.parse_expression(next_min);
            left = Self::node(create_node(SyntaxKind::BinaryExpression, vec![Some(left), Some(operator), Some(right)]));
        }
        self.exit();
        left
    }

    fn parse_unary(&mut self) -> GreenElement {
        if let Some(precedence) = self.cursor.current_kind().unary_precedence() {
            let operator = Self::tok(self.cursor.bump());
            let operand = self.parse_expression(precedence);
            Self::node(create_node(SyntaxKind::UnaryExpression, vec![Some(operator), Some(operand)]))
        } else {
            self.parse_suffixed_expression()
        }
    }

    /// Applies `.name`, `[expr]`, `:name(...)`, and call suffixes to a
    /// primary expression, left to right. Suffixes are only meaningful
    /// after prefix-expression-shaped primaries (names, parenthesized
    /// expressions, earlier suffix results); applying the loop
    /// unconditionally to every primary just means malformed input like
    /// `nil.x` produces a structurally odd but still well-formed tree,
    /// which is the recovery behavior this parser aims for throughout.
    pub(super) fn parse_suffixed_expression(&mut self) -> GreenElement {
        let mut expr = self.parse_primary();
        loop {
            expr = match self.cursor.current_kind() {
                SyntaxKind::DotToken => {
                    let dot = Self::tok(self.cursor.bump());
                    let name = Self::tok(self.cursor.expect(SyntaxKind::IdentifierToken, &mut self.diagnostics));
                    Self::node(create_node(SyntaxKind::DotIndexExpression, vec![Some(expr), Some(dot), Some(name)]))
                }
                SyntaxKind::OpenBracketToken => {
                    let open = Self::tok(self.cursor.bump());
                    let index = self.parse_expression(0);
                    let close = Self::tok(self.cursor.expect(SyntaxKind::CloseBracketToken, &mut self.diagnostics));
                    Self::node(create_node(SyntaxKind::BracketIndexExpression, vec![Some(expr), Some(open), Some(index), Some(close)]))
                }
                SyntaxKind::ColonToken => {
                    let colon = Self::tok(self.cursor.bump());
                    let name = Self::tok(self.cursor.expect(SyntaxKind::IdentifierToken, &mut self.diagnostics));
                    let arguments = self.parse_call_arguments();
                    Self::node(create_node(SyntaxKind::MethodCallExpression, vec![Some(expr), Some(colon), Some(name), Some(arguments)]))
                }
                SyntaxKind::OpenParenToken | SyntaxKind::OpenBraceToken | SyntaxKind::StringToken => {
                    let arguments = self.parse_call_arguments();
                    Self::node(create_node(SyntaxKind::FunctionCallExpression, vec![Some(expr), Some(arguments)]))
                }
                _ => break,
            };
        }
        expr
    }

    /// The three Lua call-argument forms: a parenthesized, possibly
    /// empty expression list; a bare string literal; or a bare table
    /// constructor. `f"x"` and `f{1, 2}` are both sugar for a one-element
    /// call, kept here as their own node kinds rather than desugared so
    /// the tree stays a faithful rendering of the source text.
    fn parse_call_arguments(&mut self) -> GreenElement {
        match self.cursor.current_kind() {
            SyntaxKind::OpenParenToken => {
                let open = Self::tok(self.cursor.bump());
                let arguments =
                    if self.cursor.current_kind() == SyntaxKind::CloseParenToken { Self::node(create_list(Vec::new())) } else { self.parse_expression_list() };
                let close = Self::tok(self.cursor.expect(SyntaxKind::CloseParenToken, &mut self.diagnostics));
                Self::node(create_node(SyntaxKind::ArgumentList, vec![Some(open), Some(arguments), Some(close)]))
            }
            SyntaxKind::StringToken => {
                let string_literal = self.parse_primary();
                Self::node(create_node(SyntaxKind::StringCallArgument, vec![Some(string_literal)]))
            }
            SyntaxKind::OpenBraceToken => {
                let table = self.parse_primary();
                Self::node(create_node(SyntaxKind::TableCallArgument, vec![Some(table)]))
            }
            _ => {
                let span = self.cursor.current_span();
                self.push_diagnostic("LOPS0005", "expected call arguments", span);
                Self::node(create_node(
                    SyntaxKind::ArgumentList,
                    vec![
                        Some(Self::tok(GreenToken::missing(SyntaxKind::OpenParenToken))),
                        Some(Self::node(create_list(Vec::new()))),
                        Some(Self::tok(GreenToken::missing(SyntaxKind::CloseParenToken))),
                    ],
                ))
            }
        }
    }

    fn parse_primary(&mut self) -> GreenElement {
        match self.cursor.current_kind() {
            SyntaxKind::NilKeyword => self.literal(SyntaxKind::NilLiteralExpression),
            SyntaxKind::TrueKeyword => self.literal(SyntaxKind::TrueLiteralExpression),
            SyntaxKind::FalseKeyword => self.literal(SyntaxKind::FalseLiteralExpression),
            SyntaxKind::NumberToken => self.literal(SyntaxKind::NumberLiteralExpression),
            SyntaxKind::StringToken => self.literal(SyntaxKind::StringLiteralExpression),
            SyntaxKind::DotDotDotToken => self.literal(SyntaxKind::VarargExpression),
            SyntaxKind::IdentifierToken => self.literal(SyntaxKind::IdentifierNameExpression),
            SyntaxKind::OpenParenToken => self.parse_parenthesized_expression(),
            SyntaxKind::OpenBraceToken => self.parse_table_constructor(),
            SyntaxKind::FunctionKeyword => self.parse_anonymous_function(),
            _ => {
                let span = self.cursor.current_span();
                let kind = self.cursor.current_kind();
                self.push_diagnostic("LOPS0006", format!("expected an expression, found {kind:?}"), span);
                self.missing_expression()
            }
        }
    }

    fn missing_expression(&self) -> GreenElement {
        Self::node(create_node(SyntaxKind::IdentifierNameExpression, vec![Some(Self::tok(GreenToken::missing(SyntaxKind::IdentifierToken)))]))
    }

    fn literal(&mut self, kind: SyntaxKind) -> GreenElement {
        let token = Self::tok(self.cursor.bump());
        Self::node(create_node(kind, vec![Some(token)]))
    }

    fn parse_parenthesized_expression(&mut self) -> GreenElement {
        let open = Self::tok(self.cursor.bump());
        let inner = self.parse_expression(0);
        let close = Self::tok(self.cursor.expect(SyntaxKind::CloseParenToken, &mut self.diagnostics));
        Self::node(create_node(SyntaxKind::ParenthesizedExpression, vec![Some(open), Some(inner), Some(close)]))
    }

    fn parse_anonymous_function(&mut self) -> GreenElement {
        let function_kw = Self::tok(self.cursor.bump());
        let body = self.parse_function_body();
        Self::node(create_node(SyntaxKind::AnonymousFunctionExpression, vec![Some(function_kw), Some(body)]))
    }

    fn parse_table_constructor(&mut self) -> GreenElement {
        let open = Self::tok(self.cursor.bump());
        let mut fields = Vec::new();
        while !matches!(self.cursor.current_kind(), SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken) {
            fields.push(self.parse_table_field());
            match self.cursor.current_kind() {
                SyntaxKind::CommaToken | SyntaxKind::SemicolonToken => fields.push(Self::tok(self.cursor.bump())),
                _ => break,
            }
        }
        let close = Self::tok(self.cursor.expect(SyntaxKind::CloseBraceToken, &mut self.diagnostics));
        let field_list = Self::node(create_list(fields));
        Self::node(create_node(SyntaxKind::TableConstructorExpression, vec![Some(open), Some(field_list), Some(close)]))
    }

    fn parse_table_field(&mut self) -> GreenElement {
        match self.cursor.current_kind() {
            SyntaxKind::OpenBracketToken => {
                let open = Self::tok(self.cursor.bump());
                let key = self.parse_expression(0);
                let close = Self::tok(self.cursor.expect(SyntaxKind::CloseBracketToken, &mut self.diagnostics));
                let equals = Self::tok(self.cursor.expect(SyntaxKind::EqualsToken, &mut self.diagnostics));
                let value = self.parse_expression(0);
                Self::node(create_node(SyntaxKind::KeyedTableField, vec![Some(open), Some(key), Some(close), Some(equals), Some(value)]))
            }
            SyntaxKind::IdentifierToken if self.cursor.peek_kind(1) == SyntaxKind::EqualsToken => {
                let name = Self::tok(self.cursor.bump());
                let equals = Self::tok(self.cursor.bump());
                let value = self.parse_expression(0);
                Self::node(create_node(SyntaxKind::NamedTableField, vec![Some(name), Some(equals), Some(value)]))
            }
            _ => {
                let value = self.parse_expression(0);
                Self::node(create_node(SyntaxKind::ItemTableField, vec![Some(value)]))
            }
        }
    }

    pub(super) fn parse_expression_list(&mut self) -> GreenElement {
        let mut items = vec![self.parse_expression(0)];
        while self.cursor.current_kind() == SyntaxKind::CommaToken {
            items.push(Self::tok(self.cursor.bump()));
            items.push(self.parse_expression(0));
        }
        Self::node(create_list(items))
    }
}
