//! Per-kind metadata: the single source of truth the derived tables in
//! [`crate::tables`] are built from.
//!
//! In the Roslyn-style architecture this spec is modeled on, this metadata
//! would be declared decoratively on an XML/IDL source-of-truth and a code
//! generator would emit the enum and lookup tables. Loretta has no such
//! generator; `raw_metadata` plays that role directly; the derived tables
//! are still built once, lazily, from it (see [`crate::tables`]).

use crate::kind::SyntaxKind;

/// A property value attached to a `(kind, property key)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyValue {
    Bool(bool),
    Str(&'static str),
    Int(i64),
}

/// Approved category name constants (spec §4.C: "category/property names
/// must belong to the approved constant sets", else `LOSK0006`/`LOSK0007`).
pub mod category {
    pub const KEYWORD: &str = "Keyword";
    pub const OPERATOR: &str = "Operator";
    pub const PUNCTUATION: &str = "Punctuation";
    pub const LITERAL: &str = "Literal";
    pub const TRIVIA: &str = "Trivia";
    pub const BINARY_OPERATOR: &str = "BinaryOperator";
    pub const UNARY_OPERATOR: &str = "UnaryOperator";
    pub const STATEMENT: &str = "Statement";
    pub const EXPRESSION: &str = "Expression";

    pub const ALL: &[&str] =
        &[KEYWORD, OPERATOR, PUNCTUATION, LITERAL, TRIVIA, BINARY_OPERATOR, UNARY_OPERATOR, STATEMENT, EXPRESSION];
}

/// Approved property key constants.
pub mod property {
    pub const RIGHT_ASSOCIATIVE: &str = "RightAssociative";
    pub const SOFT_KEYWORD: &str = "SoftKeyword";

    pub const ALL: &[&str] = &[RIGHT_ASSOCIATIVE, SOFT_KEYWORD];
}

/// Declared metadata for a single [`SyntaxKind`].
#[derive(Debug, Clone, Copy, Default)]
pub struct KindMetadata {
    pub is_trivia: bool,
    pub token_text: Option<&'static str>,
    pub is_keyword: bool,
    pub unary_precedence: u8,
    pub binary_precedence: u8,
    pub categories: &'static [&'static str],
    pub properties: &'static [(&'static str, PropertyValue)],
}

const EMPTY_CATEGORIES: &[&str] = &[];
const EMPTY_PROPERTIES: &[(&str, PropertyValue)] = &[];

macro_rules! trivia {
    () => {
        KindMetadata { is_trivia: true, categories: &[category::TRIVIA], ..EMPTY }
    };
}

macro_rules! punct {
    ($text:expr) => {
        KindMetadata { token_text: Some($text), categories: &[category::PUNCTUATION], ..EMPTY }
    };
}

macro_rules! keyword {
    ($text:expr) => {
        KindMetadata {
            token_text: Some($text),
            is_keyword: true,
            categories: &[category::KEYWORD],
            ..EMPTY
        }
    };
}

const EMPTY: KindMetadata = KindMetadata {
    is_trivia: false,
    token_text: None,
    is_keyword: false,
    unary_precedence: 0,
    binary_precedence: 0,
    categories: EMPTY_CATEGORIES,
    properties: EMPTY_PROPERTIES,
};

const RIGHT_ASSOC: &[(&str, PropertyValue)] = &[(property::RIGHT_ASSOCIATIVE, PropertyValue::Bool(true))];
const SOFT_KEYWORD: &[(&str, PropertyValue)] = &[(property::SOFT_KEYWORD, PropertyValue::Bool(true))];

/// Returns the declared metadata for `kind`. This is the single match
/// statement every derived table in [`crate::tables`] is built from.
pub fn raw_metadata(kind: SyntaxKind) -> KindMetadata {
    use SyntaxKind::*;
    match kind {
        WhitespaceTrivia | EndOfLineTrivia | ShebangTrivia | SingleLineCommentTrivia
        | MultiLineCommentTrivia | SkippedTokenTrivia => trivia!(),

        PlusToken => KindMetadata {
            unary_precedence: 0,
            binary_precedence: 10,
            categories: &[category::PUNCTUATION, category::OPERATOR, category::BINARY_OPERATOR],
            ..punct!("+")
        },
        MinusToken => KindMetadata {
            unary_precedence: 12,
            binary_precedence: 10,
            categories: &[
                category::PUNCTUATION,
                category::OPERATOR,
                category::BINARY_OPERATOR,
                category::UNARY_OPERATOR,
            ],
            ..punct!("-")
        },
        StarToken => KindMetadata {
            binary_precedence: 11,
            categories: &[category::PUNCTUATION, category::OPERATOR, category::BINARY_OPERATOR],
            ..punct!("*")
        },
        SlashToken => KindMetadata {
            binary_precedence: 11,
            categories: &[category::PUNCTUATION, category::OPERATOR, category::BINARY_OPERATOR],
            ..punct!("/")
        },
        DoubleSlashToken => KindMetadata {
            binary_precedence: 11,
            categories: &[category::PUNCTUATION, category::OPERATOR, category::BINARY_OPERATOR],
            ..punct!("//")
        },
        PercentToken => KindMetadata {
            binary_precedence: 11,
            categories: &[category::PUNCTUATION, category::OPERATOR, category::BINARY_OPERATOR],
            ..punct!("%")
        },
        CaretToken => KindMetadata {
            binary_precedence: 14,
            properties: RIGHT_ASSOC,
            categories: &[category::PUNCTUATION, category::OPERATOR, category::BINARY_OPERATOR],
            ..punct!("^")
        },
        HashToken => KindMetadata {
            unary_precedence: 12,
            categories: &[category::PUNCTUATION, category::OPERATOR, category::UNARY_OPERATOR],
            ..punct!("#")
        },
        AmpersandToken => KindMetadata {
            binary_precedence: 6,
            categories: &[category::PUNCTUATION, category::OPERATOR, category::BINARY_OPERATOR],
            ..punct!("&")
        },
        TildeToken => KindMetadata {
            unary_precedence: 12,
            binary_precedence: 5,
            categories: &[
                category::PUNCTUATION,
                category::OPERATOR,
                category::BINARY_OPERATOR,
                category::UNARY_OPERATOR,
            ],
            ..punct!("~")
        },
        PipeToken => KindMetadata {
            binary_precedence: 4,
            categories: &[category::PUNCTUATION, category::OPERATOR, category::BINARY_OPERATOR],
            ..punct!("|")
        },
        LessLessToken => KindMetadata {
            binary_precedence: 7,
            categories: &[category::PUNCTUATION, category::OPERATOR, category::BINARY_OPERATOR],
            ..punct!("<<")
        },
        GreaterGreaterToken => KindMetadata {
            binary_precedence: 7,
            categories: &[category::PUNCTUATION, category::OPERATOR, category::BINARY_OPERATOR],
            ..punct!(">>")
        },
        EqualsEqualsToken => KindMetadata {
            binary_precedence: 3,
            categories: &[category::PUNCTUATION, category::OPERATOR, category::BINARY_OPERATOR],
            ..punct!("==")
        },
        TildeEqualsToken => KindMetadata {
            binary_precedence: 3,
            categories: &[category::PUNCTUATION, category::OPERATOR, category::BINARY_OPERATOR],
            ..punct!("~=")
        },
        LessEqualsToken => KindMetadata {
            binary_precedence: 3,
            categories: &[category::PUNCTUATION, category::OPERATOR, category::BINARY_OPERATOR],
            ..punct!("<=")
        },
        GreaterEqualsToken => KindMetadata {
            binary_precedence: 3,
            categories: &[category::PUNCTUATION, category::OPERATOR, category::BINARY_OPERATOR],
            ..punct!(">=")
        },
        LessToken => KindMetadata {
            binary_precedence: 3,
            categories: &[category::PUNCTUATION, category::OPERATOR, category::BINARY_OPERATOR],
            ..punct!("<")
        },
        GreaterToken => KindMetadata {
            binary_precedence: 3,
            categories: &[category::PUNCTUATION, category::OPERATOR, category::BINARY_OPERATOR],
            ..punct!(">")
        },
        EqualsToken => punct!("="),
        OpenParenToken => punct!("("),
        CloseParenToken => punct!(")"),
        OpenBraceToken => punct!("{"),
        CloseBraceToken => punct!("}"),
        OpenBracketToken => punct!("["),
        CloseBracketToken => punct!("]"),
        ColonColonToken => punct!("::"),
        SemicolonToken => punct!(";"),
        ColonToken => punct!(":"),
        CommaToken => punct!(","),
        DotToken => KindMetadata {
            binary_precedence: 9,
            categories: &[category::PUNCTUATION, category::OPERATOR, category::BINARY_OPERATOR],
            ..punct!(".")
        },
        DotDotToken => KindMetadata {
            binary_precedence: 9,
            properties: RIGHT_ASSOC,
            categories: &[category::PUNCTUATION, category::OPERATOR, category::BINARY_OPERATOR],
            ..punct!("..")
        },
        DotDotDotToken => punct!("..."),

        AndKeyword => KindMetadata {
            binary_precedence: 2,
            categories: &[category::KEYWORD, category::OPERATOR, category::BINARY_OPERATOR],
            ..keyword!("and")
        },
        OrKeyword => KindMetadata {
            binary_precedence: 1,
            categories: &[category::KEYWORD, category::OPERATOR, category::BINARY_OPERATOR],
            ..keyword!("or")
        },
        NotKeyword => KindMetadata {
            unary_precedence: 12,
            categories: &[category::KEYWORD, category::OPERATOR, category::UNARY_OPERATOR],
            ..keyword!("not")
        },
        BreakKeyword => keyword!("break"),
        DoKeyword => keyword!("do"),
        ElseKeyword => keyword!("else"),
        ElseifKeyword => keyword!("elseif"),
        EndKeyword => keyword!("end"),
        FalseKeyword => keyword!("false"),
        ForKeyword => keyword!("for"),
        FunctionKeyword => keyword!("function"),
        GotoKeyword => keyword!("goto"),
        IfKeyword => keyword!("if"),
        InKeyword => keyword!("in"),
        LocalKeyword => keyword!("local"),
        NilKeyword => keyword!("nil"),
        RepeatKeyword => keyword!("repeat"),
        ReturnKeyword => keyword!("return"),
        ThenKeyword => keyword!("then"),
        TrueKeyword => keyword!("true"),
        UntilKeyword => keyword!("until"),
        WhileKeyword => keyword!("while"),
        ContinueKeyword => {
            KindMetadata { properties: SOFT_KEYWORD, categories: &[category::KEYWORD], ..keyword!("continue") }
        }

        IdentifierToken | NumberToken | StringToken => {
            KindMetadata { categories: &[category::LITERAL], ..EMPTY }
        }
        EndOfFileToken | BadToken => EMPTY,

        List => EMPTY,

        _ => KindMetadata {
            categories: if is_statement_kind(kind) {
                &[category::STATEMENT]
            } else {
                &[category::EXPRESSION]
            },
            ..EMPTY
        },
    }
}

fn is_statement_kind(kind: SyntaxKind) -> bool {
    use SyntaxKind::*;
    matches!(
        kind,
        CompilationUnit
            | Block
            | LocalVariableStatement
            | AssignmentStatement
            | ExpressionStatement
            | DoStatement
            | WhileStatement
            | RepeatStatement
            | IfStatement
            | ElseIfClause
            | ElseClause
            | NumericForStatement
            | GenericForStatement
            | FunctionDeclarationStatement
            | LocalFunctionStatement
            | ReturnStatement
            | BreakStatement
            | ContinueStatement
            | GotoStatement
            | GotoLabelStatement
            | EmptyStatement
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::SyntaxKind;

    #[test]
    fn trivia_kinds_are_not_tokens() {
        for &kind in SyntaxKind::ALL {
            let meta = raw_metadata(kind);
            if meta.is_trivia {
                assert!(meta.token_text.is_none(), "{kind:?} is trivia but also has token text");
            }
        }
    }

    #[test]
    fn operators_and_keywords_have_nonempty_text() {
        for &kind in SyntaxKind::ALL {
            let meta = raw_metadata(kind);
            let is_operator = meta.unary_precedence > 0 || meta.binary_precedence > 0;
            if is_operator || meta.is_keyword {
                let text = meta.token_text.expect("operator/keyword kind missing token text");
                assert!(!text.is_empty() && !text.trim().is_empty());
            }
        }
    }
}
