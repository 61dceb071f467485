//! Recursive-descent statement parsing. Each `parse_*_statement` method
//! assumes the caller has already confirmed the current token starts
//! that statement kind, and leaves the cursor positioned just past it.

use loretta_green::{create_list, create_node, GreenElement, GreenToken};
use loretta_syntax::SyntaxKind;

use super::Parser;

impl Parser {
    /// Dispatches on the current token's kind. Returns `None` when the
    /// token starts neither a statement nor an expression — the caller
    /// (`parse_block`) has already folded it into trivia via
    /// [`Parser::recover_unexpected_token`] and should just loop again.
    pub(super) fn parse_statement(&mut self) -> Option<GreenElement> {
        match self.cursor.current_kind() {
            SyntaxKind::SemicolonToken => Some(self.parse_empty_statement()),
            SyntaxKind::IfKeyword => Some(self.parse_if_statement()),
            SyntaxKind::WhileKeyword => Some(self.parse_while_statement()),
            SyntaxKind::DoKeyword => Some(self.parse_do_statement()),
            SyntaxKind::ForKeyword => Some(self.parse_for_statement()),
            SyntaxKind::RepeatKeyword => Some(self.parse_repeat_statement()),
            SyntaxKind::FunctionKeyword => Some(self.parse_function_declaration_statement()),
            SyntaxKind::LocalKeyword => Some(self.parse_local_statement()),
            SyntaxKind::BreakKeyword => Some(self.parse_simple_keyword_statement(SyntaxKind::BreakStatement)),
            SyntaxKind::ContinueKeyword if self.dialect.continue_statement => {
                Some(self.parse_simple_keyword_statement(SyntaxKind::ContinueStatement))
            }
            SyntaxKind::GotoKeyword if self.dialect.goto_labels => Some(self.parse_goto_statement()),
            SyntaxKind::ColonColonToken if self.dialect.goto_labels => Some(self.parse_goto_label_statement()),
            kind if Self::starts_expression(kind) => Some(self.parse_expression_or_assignment_statement()),
            _ => {
                self.recover_unexpected_token();
                None
            }
        }
    }

    pub(super) fn parse_return_statement(&mut self) -> GreenElement {
        let return_kw = Self::tok(self.cursor.bump());
        let exprs = if Self::starts_expression(self.cursor.current_kind()) { Some(self.parse_expression_list()) } else { None };
        let semi = if self.cursor.current_kind() == SyntaxKind::SemicolonToken { Some(Self::tok(self.cursor.bump())) } else { None };
        Self::node(create_node(SyntaxKind::ReturnStatement, vec![Some(return_kw), exprs, semi]))
    }

    fn parse_empty_statement(&mut self) -> GreenElement {
        let semi = Self::tok(self.cursor.bump());
        Self::node(create_node(SyntaxKind::EmptyStatement, vec![Some(semi)]))
    }

    fn parse_simple_keyword_statement(&mut self, kind: SyntaxKind) -> GreenElement {
        let token = Self::tok(self.cursor.bump());
        Self::node(create_node(kind, vec![Some(token)]))
    }

    fn parse_goto_statement(&mut self) -> GreenElement {
        let goto_kw = Self::tok(self.cursor.bump());
        let label = Self::tok(self.cursor.expect(SyntaxKind::IdentifierToken, &mut self.diagnostics));
        Self::node(create_node(SyntaxKind::GotoStatement, vec![Some(goto_kw), Some(label)]))
    }

    fn parse_goto_label_statement(&mut self) -> GreenElement {
        let open = Self::tok(self.cursor.bump());
        let name = Self::tok(self.cursor.expect(SyntaxKind::IdentifierToken, &mut self.diagnostics));
        let close = Self::tok(self.cursor.expect(SyntaxKind::ColonColonToken, &mut self.diagnostics));
        Self::node(create_node(SyntaxKind::GotoLabelStatement, vec![Some(open), Some(name), Some(close)]))
    }

    fn parse_if_statement(&mut self) -> GreenElement {
        let if_kw = Self::tok(self.cursor.bump());
        let condition = self.parse_expression(0);
        let then_kw = Self::tok(self.cursor.expect(SyntaxKind::ThenKeyword, &mut self.diagnostics));
        let body = self.parse_block();

        let mut clauses = Vec::new();
        while self.cursor.current_kind() == SyntaxKind::ElseifKeyword {
            let elseif_kw = Self::tok(self.cursor.bump());
            let clause_condition = self.parse_expression(0);
            let clause_then = Self::tok(self.cursor.expect(SyntaxKind::ThenKeyword, &mut self.diagnostics));
            let clause_body = self.parse_block();
            clauses.push(Self::node(create_node(
                SyntaxKind::ElseIfClause,
                vec![Some(elseif_kw), Some(clause_condition), Some(clause_then), Some(clause_body)],
            )));
        }
        let clause_list = Self::node(create_list(clauses));

        let else_clause = if self.cursor.current_kind() == SyntaxKind::ElseKeyword {
            let else_kw = Self::tok(self.cursor.bump());
            let else_body = self.parse_block();
            Some(Self::node(create_node(SyntaxKind::ElseClause, vec![Some(else_kw), Some(else_body)])))
        } else {
            None
        };
        let end_kw = Self::tok(self.cursor.expect(SyntaxKind::EndKeyword, &mut self.diagnostics));

        Self::node(create_node(
            SyntaxKind::IfStatement,
            vec![Some(if_kw), Some(condition), Some(then_kw), Some(body), Some(clause_list), else_clause, Some(end_kw)],
        ))
    }

    fn parse_while_statement(&mut self) -> GreenElement {
        let while_kw = Self::tok(self.cursor.bump());
        let condition = self.parse_expression(0);
        let do_kw = Self::tok(self.cursor.expect(SyntaxKind::DoKeyword, &mut self.diagnostics));
        let body = self.parse_block();
        let end_kw = Self::tok(self.cursor.expect(SyntaxKind::EndKeyword, &mut self.diagnostics));
        Self::node(create_node(SyntaxKind::WhileStatement, vec![Some(while_kw), Some(condition), Some(do_kw), Some(body), Some(end_kw)]))
    }

    fn parse_do_statement(&mut self) -> GreenElement {
        let do_kw = Self::tok(self.cursor.bump());
        let body = self.parse_block();
        let end_kw = Self::tok(self.cursor.expect(SyntaxKind::EndKeyword, &mut self.diagnostics));
        Self::node(create_node(SyntaxKind::DoStatement, vec![Some(do_kw), Some(body), Some(end_kw)]))
    }

    fn parse_repeat_statement(&mut self) -> GreenElement {
        let repeat_kw = Self::tok(self.cursor.bump());
        let body = self.parse_block();
        let until_kw = Self::tok(self.cursor.expect(SyntaxKind::UntilKeyword, &mut self.diagnostics));
        let condition = self.parse_expression(0);
        Self::node(create_node(SyntaxKind::RepeatStatement, vec![Some(repeat_kw), Some(body), Some(until_kw), Some(condition)]))
    }

    /// `for` is ambiguous after its first name: `=` means numeric,
    /// `,`/`in` means generic. One token of lookahead (already buffered
    /// by the cursor) resolves it without backtracking.
    fn parse_for_statement(&mut self) -> GreenElement {
        let for_kw = Self::tok(self.cursor.bump());
        let first_name = self.cursor.expect(SyntaxKind::IdentifierToken, &mut self.diagnostics);
        if self.cursor.current_kind() == SyntaxKind::EqualsToken {
            self.parse_numeric_for_statement(for_kw, first_name)
        } else {
            self.parse_generic_for_statement(for_kw, first_name)
        }
    }

    fn parse_numeric_for_statement(&mut self, for_kw: GreenElement, name: GreenToken) -> GreenElement {
        let name = Self::tok(name);
        let equals = Self::tok(self.cursor.bump());
        let start = self.parse_expression(0);
        let comma = Self::tok(self.cursor.expect(SyntaxKind::CommaToken, &mut self.diagnostics));
        let stop = self.parse_expression(0);
        let (step_comma, step) = if self.cursor.current_kind() == SyntaxKind::CommaToken {
            let step_comma = Self::tok(self.cursor.bump());
            let step = self.parse_expression(0);
            (Some(step_comma), Some(step))
        } else {
            (None, None)
        };
        let do_kw = Self::tok(self.cursor.expect(SyntaxKind::DoKeyword, &mut self.diagnostics));
        let body = self.parse_block();
        let end_kw = Self::tok(self.cursor.expect(SyntaxKind::EndKeyword, &mut self.diagnostics));
        Self::node(create_node(
            SyntaxKind::NumericForStatement,
            vec![Some(for_kw), Some(name), Some(equals), Some(start), Some(comma), Some(stop), step_comma, step, Some(do_kw), Some(body), Some(end_kw)],
        ))
    }

    fn parse_generic_for_statement(&mut self, for_kw: GreenElement, first_name: GreenToken) -> GreenElement {
        let mut names = vec![Self::tok(first_name)];
        while self.cursor.current_kind() == SyntaxKind::CommaToken {
            names.push(Self::tok(self.cursor.bump()));
            names.push(Self::tok(self.cursor.expect(SyntaxKind::IdentifierToken, &mut self.diagnostics)));
        }
        let name_list = Self::node(create_list(names));
        let in_kw = Self::tok(self.cursor.expect(SyntaxKind::InKeyword, &mut self.diagnostics));
        let exprs = self.parse_expression_list();
        let do_kw = Self::tok(self.cursor.expect(SyntaxKind::DoKeyword, &mut self.diagnostics));
        let body = self.parse_block();
        let end_kw = Self::tok(self.cursor.expect(SyntaxKind::EndKeyword, &mut self.diagnostics));
        Self::node(create_node(
            SyntaxKind::GenericForStatement,
            vec![Some(for_kw), Some(name_list), Some(in_kw), Some(exprs), Some(do_kw), Some(body), Some(end_kw)],
        ))
    }

    /// `function a.b.c:d() ... end`: a dotted path of `DotIndexExpression`
    /// nodes, with an optional trailing `:name` naming the implicit
    /// method-call receiver. The colon part is not folded into the path
    /// expression itself since it isn't one — it's sugar the body's
    /// caller expands, not a value the declaration indexes into.
    fn parse_function_declaration_statement(&mut self) -> GreenElement {
        let function_kw = Self::tok(self.cursor.bump());
        let first = Self::tok(self.cursor.expect(SyntaxKind::IdentifierToken, &mut self.diagnostics));
        let mut path = Self::node(create_node(SyntaxKind::IdentifierNameExpression, vec![Some(first)]));
        while self.cursor.current_kind() == SyntaxKind::DotToken {
            let dot = Self::tok(self.cursor.bump());
            let field = Self::tok(self.cursor.expect(SyntaxKind::IdentifierToken, &mut self.diagnostics));
            path = Self::node(create_node(SyntaxKind::DotIndexExpression, vec![Some(path), Some(dot), Some(field)]));
        }
        let (colon, method_name) = if self.cursor.current_kind() == SyntaxKind::ColonToken {
            let colon = Self::tok(self.cursor.bump());
            let method_name = Self::tok(self.cursor.expect(SyntaxKind::IdentifierToken, &mut self.diagnostics));
            (Some(colon), Some(method_name))
        } else {
            (None, None)
        };
        let body = self.parse_function_body();
        Self::node(create_node(SyntaxKind::FunctionDeclarationStatement, vec![Some(function_kw), Some(path), colon, method_name, Some(body)]))
    }

    fn parse_local_statement(&mut self) -> GreenElement {
        let local_kw = Self::tok(self.cursor.bump());
        if self.cursor.current_kind() == SyntaxKind::FunctionKeyword {
            let function_kw = Self::tok(self.cursor.bump());
            let name = Self::tok(self.cursor.expect(SyntaxKind::IdentifierToken, &mut self.diagnostics));
            let body = self.parse_function_body();
            return Self::node(create_node(SyntaxKind::LocalFunctionStatement, vec![Some(local_kw), Some(function_kw), Some(name), Some(body)]));
        }
        let names = self.parse_attributed_name_list();
        let (equals, exprs) = if self.cursor.current_kind() == SyntaxKind::EqualsToken {
            let equals = Self::tok(self.cursor.bump());
            let exprs = self.parse_expression_list();
            (Some(equals), Some(exprs))
        } else {
            (None, None)
        };
        Self::node(create_node(SyntaxKind::LocalVariableStatement, vec![Some(local_kw), Some(names), equals, exprs]))
    }

    fn parse_attributed_name_list(&mut self) -> GreenElement {
        let mut items = vec![self.parse_attributed_name()];
        while self.cursor.current_kind() == SyntaxKind::CommaToken {
            items.push(Self::tok(self.cursor.bump()));
            items.push(self.parse_attributed_name());
        }
        Self::node(create_list(items))
    }

    /// A name-list entry is a bare identifier, or — in dialects with
    /// Lua 5.4 attributes — `name <const>`/`name <close>`, modeled as an
    /// `Attribute` node so the list keeps a uniform element shape without
    /// inventing a second list kind for the attributed case.
    fn parse_attributed_name(&mut self) -> GreenElement {
        let name = self.cursor.expect(SyntaxKind::IdentifierToken, &mut self.diagnostics);
        if self.dialect.attributes && self.cursor.current_kind() == SyntaxKind::LessToken {
            let less = Self::tok(self.cursor.bump());
            let attribute_name = Self::tok(self.cursor.expect(SyntaxKind::IdentifierToken, &mut self.diagnostics));
            let greater = Self::tok(self.cursor.expect(SyntaxKind::GreaterToken, &mut self.diagnostics));
            return Self::node(create_node(SyntaxKind::Attribute, vec![Some(Self::tok(name)), Some(less), Some(attribute_name), Some(greater)]));
        }
        Self::tok(name)
    }

    pub(super) fn parse_function_body(&mut self) -> GreenElement {
        let open = Self::tok(self.cursor.expect(SyntaxKind::OpenParenToken, &mut self.diagnostics));
        let params = self.parse_parameter_list();
        let close = Self::tok(self.cursor.expect(SyntaxKind::CloseParenToken, &mut self.diagnostics));
        let parameter_list = Self::node(create_node(SyntaxKind::ParameterList, vec![Some(open), Some(params), Some(close)]));
        let body = self.parse_block();
        let end_kw = Self::tok(self.cursor.expect(SyntaxKind::EndKeyword, &mut self.diagnostics));
        Self::node(create_node(SyntaxKind::FunctionBody, vec![Some(parameter_list), Some(body), Some(end_kw)]))
    }

    fn parse_parameter_list(&mut self) -> GreenElement {
        let mut items = Vec::new();
        if matches!(self.cursor.current_kind(), SyntaxKind::IdentifierToken | SyntaxKind::DotDotDotToken) {
            items.push(self.parse_parameter());
            while self.cursor.current_kind() == SyntaxKind::CommaToken {
                items.push(Self::tok(self.cursor.bump()));
                items.push(self.parse_parameter());
            }
        }
        Self::node(create_list(items))
    }

    fn parse_parameter(&mut self) -> GreenElement {
        if self.cursor.current_kind() == SyntaxKind::DotDotDotToken {
            Self::tok(self.cursor.bump())
        } else {
            Self::tok(self.cursor.expect(SyntaxKind::IdentifierToken, &mut self.diagnostics))
        }
    }

    /// A statement starting with a prefix expression is either an
    /// assignment (one or more comma-separated targets, `=`, then
    /// values) or a call used for its side effect. Anything else
    /// standing alone as a statement (`1 + 2` by itself, say) is
    /// diagnosed but still kept in the tree as an `ExpressionStatement`.
    fn parse_expression_or_assignment_statement(&mut self) -> GreenElement {
        let first = self.parse_suffixed_expression();
        if matches!(self.cursor.current_kind(), SyntaxKind::EqualsToken | SyntaxKind::CommaToken) {
            let mut targets = vec![first];
            while self.cursor.current_kind() == SyntaxKind::CommaToken {
                targets.push(Self::tok(self.cursor.bump()));
                targets.push(self.parse_suffixed_expression());
            }
            let target_list = Self::node(create_list(targets));
            let equals = Self::tok(self.cursor.expect(SyntaxKind::EqualsToken, &mut self.diagnostics));
            let values = self.parse_expression_list();
            return Self::node(create_node(SyntaxKind::AssignmentStatement, vec![Some(target_list), Some(equals), Some(values)]));
        }
        if !matches!(first.kind(), SyntaxKind::FunctionCallExpression | SyntaxKind::MethodCallExpression) {
            let span = self.cursor.current_span();
            self.push_diagnostic("LOPS0004", "expression statements must be function or method calls", span);
        }
        Self::node(create_node(SyntaxKind::ExpressionStatement, vec![Some(first)]))
    }

    pub(super) fn starts_expression(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::NilKeyword
                | SyntaxKind::TrueKeyword
                | SyntaxKind::FalseKeyword
                | SyntaxKind::NumberToken
                | SyntaxKind::StringToken
                | SyntaxKind::DotDotDotToken
                | SyntaxKind::FunctionKeyword
                | SyntaxKind::IdentifierToken
                | SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBraceToken
                | SyntaxKind::NotKeyword
                | SyntaxKind::MinusToken
                | SyntaxKind::HashToken
                | SyntaxKind::TildeToken
        )
    }
}
