//! Diagnostics attached to green tokens and nodes.
//!
//! These ride on the tree itself rather than a side-channel list, so a
//! diagnostic survives wherever its carrying node is shared, copied, or
//! reserialized.

use std::sync::Arc;

use loretta_position::{FileLinePositionSpan, TextSpan};

/// How serious a [`Diagnostic`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Hidden,
    Info,
    Warning,
    Error,
}

/// Where a [`Diagnostic`] points.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticLocation {
    /// A span within the tree that carries this diagnostic. The span is
    /// relative to the node it is attached to; resolving it to an
    /// absolute offset requires the red tree.
    Source(TextSpan),
    /// A span in a file outside the tree being parsed (e.g. a `require`d
    /// module referenced by path).
    External(FileLinePositionSpan, TextSpan),
    /// No location is applicable (a whole-compilation diagnostic).
    None,
}

/// A diagnostic produced during lexing or parsing, attached directly to
/// the green token or node it describes.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub id: Arc<str>,
    pub severity: Severity,
    pub message: Arc<str>,
    pub location: DiagnosticLocation,
}

impl Diagnostic {
    pub fn new(id: impl Into<Arc<str>>, severity: Severity, message: impl Into<Arc<str>>, location: DiagnosticLocation) -> Self {
        Diagnostic { id: id.into(), severity, message: message.into(), location }
    }

    /// Convenience constructor for lexer/parser diagnostics, which always
    /// point at a span within the tree being built.
    pub fn at_span(id: impl Into<Arc<str>>, severity: Severity, message: impl Into<Arc<str>>, span: TextSpan) -> Self {
        Diagnostic::new(id, severity, message, DiagnosticLocation::Source(span))
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
