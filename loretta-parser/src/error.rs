//! Internal parser errors: programmer/contract violations, distinct
//! from the [`loretta_green::Diagnostic`]s attached to the tree for
//! malformed *Lua*. A healthy caller never observes these.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// `parse_compilation_unit` requires the token stream to end with an
    /// `EndOfFileToken`, as every `loretta-lexer` run produces. Anything
    /// else means the caller handed the parser a token stream it didn't
    /// get from the lexer.
    #[error("token stream does not end in an end-of-file token")]
    MissingEndOfFile,
}

pub type ParseResult<T> = Result<T, ParseError>;
