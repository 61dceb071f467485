//! Self-check over the declared [`SyntaxKind`] metadata.
//!
//! These are internal consistency diagnostics (`LOSK0001`..`LOSK0007`), not
//! user-facing parser diagnostics: they catch mistakes in
//! [`crate::metadata::raw_metadata`] itself, such as two kinds claiming the
//! same fixed text or a property key outside the approved set. Loretta
//! runs this once in its own test suite; it is not part of the parsing
//! hot path.

use std::collections::HashMap;

use crate::kind::SyntaxKind;
use crate::metadata::{category, property, raw_metadata};

/// One consistency problem found in the declared metadata table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub code: &'static str,
    pub kind: SyntaxKind,
    pub message: String,
}

fn diag(code: &'static str, kind: SyntaxKind, message: impl Into<String>) -> ValidationDiagnostic {
    ValidationDiagnostic { code, kind, message: message.into() }
}

/// Runs every consistency check and returns every violation found.
/// An empty result means the metadata table is internally consistent.
pub fn validate() -> Vec<ValidationDiagnostic> {
    let mut out = Vec::new();
    check_duplicate_token_text(&mut out);
    check_list_marker_is_unique(&mut out);
    check_trivia_has_no_token_text(&mut out);
    check_keywords_have_token_text(&mut out);
    check_operator_kinds_are_categorized(&mut out);
    check_categories_are_approved(&mut out);
    check_properties_are_approved(&mut out);
    out
}

/// LOSK0001: two kinds must never share the same fixed token text.
fn check_duplicate_token_text(out: &mut Vec<ValidationDiagnostic>) {
    let mut seen: HashMap<&'static str, SyntaxKind> = HashMap::new();
    for &kind in SyntaxKind::ALL {
        let Some(text) = raw_metadata(kind).token_text else { continue };
        if let Some(&first) = seen.get(text) {
            out.push(diag(
                "LOSK0001",
                kind,
                format!("token text {text:?} is shared with {first:?}"),
            ));
        } else {
            seen.insert(text, kind);
        }
    }
}

/// LOSK0002: `is_list` holds exactly for [`SyntaxKind::List`]; every
/// homogeneous child sequence (statement lists, name lists, ...) shares
/// this one raw kind regardless of what it is a list of.
fn check_list_marker_is_unique(out: &mut Vec<ValidationDiagnostic>) {
    let markers: Vec<SyntaxKind> = SyntaxKind::ALL.iter().copied().filter(|&k| k == SyntaxKind::List).collect();
    if markers.len() != 1 {
        out.push(diag("LOSK0002", SyntaxKind::List, "List marker kind must appear exactly once in SyntaxKind::ALL"));
    }
}

/// LOSK0003: trivia kinds carry no fixed token text (their text is
/// variable-length and produced by the lexer, not looked up by kind).
fn check_trivia_has_no_token_text(out: &mut Vec<ValidationDiagnostic>) {
    for &kind in SyntaxKind::ALL {
        let meta = raw_metadata(kind);
        if meta.is_trivia && meta.token_text.is_some() {
            out.push(diag("LOSK0003", kind, "trivia kind must not declare fixed token text"));
        }
    }
}

/// LOSK0004: every keyword kind must declare the spelling it recognizes.
fn check_keywords_have_token_text(out: &mut Vec<ValidationDiagnostic>) {
    for &kind in SyntaxKind::ALL {
        let meta = raw_metadata(kind);
        if meta.is_keyword && meta.token_text.is_none() {
            out.push(diag("LOSK0004", kind, "keyword kind is missing its fixed token text"));
        }
    }
}

/// LOSK0005: a kind with nonzero unary or binary precedence must be
/// categorized as an operator.
fn check_operator_kinds_are_categorized(out: &mut Vec<ValidationDiagnostic>) {
    for &kind in SyntaxKind::ALL {
        let meta = raw_metadata(kind);
        let has_precedence = meta.unary_precedence > 0 || meta.binary_precedence > 0;
        if has_precedence && !meta.categories.contains(&category::OPERATOR) {
            out.push(diag("LOSK0005", kind, "kind declares operator precedence but is not in the Operator category"));
        }
    }
}

/// LOSK0006: category names must belong to the approved constant set.
fn check_categories_are_approved(out: &mut Vec<ValidationDiagnostic>) {
    for &kind in SyntaxKind::ALL {
        for &cat in raw_metadata(kind).categories {
            if !category::ALL.contains(&cat) {
                out.push(diag("LOSK0006", kind, format!("category {cat:?} is not an approved category name")));
            }
        }
    }
}

/// LOSK0007: property keys must belong to the approved constant set.
fn check_properties_are_approved(out: &mut Vec<ValidationDiagnostic>) {
    for &kind in SyntaxKind::ALL {
        for &(key, _) in raw_metadata(kind).properties {
            if !property::ALL.contains(&key) {
                out.push(diag("LOSK0007", kind, format!("property key {key:?} is not an approved property name")));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_metadata_is_self_consistent() {
        let violations = validate();
        assert!(violations.is_empty(), "metadata validation failed: {violations:#?}");
    }
}
