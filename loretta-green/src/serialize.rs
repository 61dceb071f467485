//! Binary serialization for green trees.
//!
//! Every serialized node writes its kind, diagnostics, annotations, then a
//! subtype-specific payload: raw text for trivia/tokens, child count plus
//! children for many-child nodes, or three fixed slots for small nodes. A
//! small type registry maps the written type tag back to the constructor
//! that rebuilds that subtype. Deserialized annotations keep their
//! original id, so an annotation looked up by reference before a
//! round trip is still `==`-equal to the one found after.

use std::io::{self, Read, Write};
use std::sync::Arc;

use loretta_syntax::SyntaxKind;
use thiserror::Error;

use crate::annotation::SyntaxAnnotation;
use crate::children::GreenChildren;
use crate::diagnostic::{Diagnostic, DiagnosticLocation, Severity};
use crate::node::{GreenElement, GreenNodeData};
use crate::token::{GreenToken, TokenValue};
use crate::trivia::GreenTrivia;
use loretta_position::{FileLinePositionSpan, LinePosition, TextSpan};

#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("I/O error during green tree serialization: {0}")]
    Io(#[from] io::Error),
    #[error("unknown type tag {0} while reading a green element")]
    UnknownTag(u8),
    #[error("unknown syntax kind index {0}")]
    UnknownKindIndex(u16),
    #[error("text was not valid UTF-8")]
    InvalidUtf8,
    #[error("unknown severity tag {0}")]
    UnknownSeverity(u8),
    #[error("unknown diagnostic location tag {0}")]
    UnknownLocationTag(u8),
}

type Result<T> = std::result::Result<T, SerializeError>;

const TAG_TOKEN: u8 = 0;
const TAG_NODE_ONE: u8 = 1;
const TAG_NODE_TWO: u8 = 2;
const TAG_NODE_THREE: u8 = 3;
const TAG_NODE_MANY: u8 = 4;

fn kind_index(kind: SyntaxKind) -> u16 {
    SyntaxKind::ALL.iter().position(|&k| k == kind).expect("SyntaxKind::ALL is exhaustive") as u16
}

fn kind_from_index(index: u16) -> Result<SyntaxKind> {
    SyntaxKind::ALL.get(index as usize).copied().ok_or(SerializeError::UnknownKindIndex(index))
}

fn write_u16(w: &mut impl Write, v: u16) -> Result<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}
fn write_u32(w: &mut impl Write, v: u32) -> Result<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}
fn write_i64(w: &mut impl Write, v: i64) -> Result<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}
fn write_bool(w: &mut impl Write, v: bool) -> Result<()> {
    w.write_all(&[v as u8])?;
    Ok(())
}
fn write_str(w: &mut impl Write, s: &str) -> Result<()> {
    write_u32(w, s.len() as u32)?;
    w.write_all(s.as_bytes())?;
    Ok(())
}
fn write_opt_str(w: &mut impl Write, s: Option<&str>) -> Result<()> {
    match s {
        Some(s) => {
            write_bool(w, true)?;
            write_str(w, s)
        }
        None => write_bool(w, false),
    }
}

fn read_u16(r: &mut impl Read) -> Result<u16> {
    let mut buf = [0u8; 2];
    r.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}
fn read_u32(r: &mut impl Read) -> Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}
fn read_i64(r: &mut impl Read) -> Result<i64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(i64::from_le_bytes(buf))
}
fn read_bool(r: &mut impl Read) -> Result<bool> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0] != 0)
}
fn read_str(r: &mut impl Read) -> Result<String> {
    let len = read_u32(r)? as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|_| SerializeError::InvalidUtf8)
}
fn read_opt_str(r: &mut impl Read) -> Result<Option<String>> {
    if read_bool(r)? {
        Ok(Some(read_str(r)?))
    } else {
        Ok(None)
    }
}

fn write_severity(w: &mut impl Write, s: Severity) -> Result<()> {
    let tag: u8 = match s {
        Severity::Hidden => 0,
        Severity::Info => 1,
        Severity::Warning => 2,
        Severity::Error => 3,
    };
    w.write_all(&[tag])?;
    Ok(())
}
fn read_severity(r: &mut impl Read) -> Result<Severity> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    match buf[0] {
        0 => Ok(Severity::Hidden),
        1 => Ok(Severity::Info),
        2 => Ok(Severity::Warning),
        3 => Ok(Severity::Error),
        other => Err(SerializeError::UnknownSeverity(other)),
    }
}

fn write_location(w: &mut impl Write, loc: &DiagnosticLocation) -> Result<()> {
    match loc {
        DiagnosticLocation::None => w.write_all(&[0]).map_err(SerializeError::from),
        DiagnosticLocation::Source(span) => {
            w.write_all(&[1])?;
            write_u32(w, span.start)?;
            write_u32(w, span.length)
        }
        DiagnosticLocation::External(file_span, span) => {
            w.write_all(&[2])?;
            write_opt_str(w, file_span.path.as_deref())?;
            write_u32(w, file_span.start.line)?;
            write_u32(w, file_span.start.character)?;
            write_u32(w, file_span.end.line)?;
            write_u32(w, file_span.end.character)?;
            write_u32(w, span.start)?;
            write_u32(w, span.length)
        }
    }
}
fn read_location(r: &mut impl Read) -> Result<DiagnosticLocation> {
    let mut tag = [0u8; 1];
    r.read_exact(&mut tag)?;
    match tag[0] {
        0 => Ok(DiagnosticLocation::None),
        1 => {
            let start = read_u32(r)?;
            let length = read_u32(r)?;
            Ok(DiagnosticLocation::Source(TextSpan::new(start, length)))
        }
        2 => {
            let path = read_opt_str(r)?;
            let start = LinePosition::new(read_u32(r)?, read_u32(r)?);
            let end = LinePosition::new(read_u32(r)?, read_u32(r)?);
            let span_start = read_u32(r)?;
            let span_length = read_u32(r)?;
            let file_span = match path {
                Some(path) => FileLinePositionSpan::with_path(path, start, end),
                None => FileLinePositionSpan::new(start, end),
            };
            Ok(DiagnosticLocation::External(file_span, TextSpan::new(span_start, span_length)))
        }
        other => Err(SerializeError::UnknownLocationTag(other)),
    }
}

fn write_diagnostic(w: &mut impl Write, d: &Diagnostic) -> Result<()> {
    write_str(w, &d.id)?;
    write_severity(w, d.severity)?;
    write_str(w, &d.message)?;
    write_location(w, &d.location)
}
fn read_diagnostic(r: &mut impl Read) -> Result<Diagnostic> {
    let id = read_str(r)?;
    let severity = read_severity(r)?;
    let message = read_str(r)?;
    let location = read_location(r)?;
    Ok(Diagnostic::new(id, severity, message, location))
}

fn write_annotation(w: &mut impl Write, a: &SyntaxAnnotation) -> Result<()> {
    write_i64(w, a.id())?;
    write_opt_str(w, a.kind.as_deref())?;
    write_opt_str(w, a.data.as_deref())
}
fn read_annotation(r: &mut impl Read) -> Result<SyntaxAnnotation> {
    let id = read_i64(r)?;
    let kind = read_opt_str(r)?;
    let data = read_opt_str(r)?;
    Ok(SyntaxAnnotation::with_id(id, kind, data))
}

fn write_diagnostics(w: &mut impl Write, diagnostics: &[Diagnostic]) -> Result<()> {
    write_u32(w, diagnostics.len() as u32)?;
    for d in diagnostics {
        write_diagnostic(w, d)?;
    }
    Ok(())
}
fn read_diagnostics(r: &mut impl Read) -> Result<Arc<[Diagnostic]>> {
    let count = read_u32(r)?;
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        out.push(read_diagnostic(r)?);
    }
    Ok(Arc::from(out))
}

fn write_annotations(w: &mut impl Write, annotations: &[SyntaxAnnotation]) -> Result<()> {
    write_u32(w, annotations.len() as u32)?;
    for a in annotations {
        write_annotation(w, a)?;
    }
    Ok(())
}
fn read_annotations(r: &mut impl Read) -> Result<Arc<[SyntaxAnnotation]>> {
    let count = read_u32(r)?;
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        out.push(read_annotation(r)?);
    }
    Ok(Arc::from(out))
}

fn write_trivia(w: &mut impl Write, trivia: &[GreenTrivia]) -> Result<()> {
    write_u32(w, trivia.len() as u32)?;
    for t in trivia {
        write_u16(w, kind_index(t.kind()))?;
        write_str(w, t.text())?;
    }
    Ok(())
}
fn read_trivia(r: &mut impl Read) -> Result<Arc<[GreenTrivia]>> {
    let count = read_u32(r)?;
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let kind = kind_from_index(read_u16(r)?)?;
        let text = read_str(r)?;
        out.push(GreenTrivia::new(kind, text));
    }
    Ok(Arc::from(out))
}

fn write_token(w: &mut impl Write, token: &GreenToken) -> Result<()> {
    w.write_all(&[TAG_TOKEN])?;
    write_u16(w, kind_index(token.kind()))?;
    write_diagnostics(w, token.diagnostics())?;
    write_annotations(w, token.annotations())?;
    write_bool(w, token.is_missing())?;
    let owns_text = loretta_syntax::token_text(token.kind()).is_none();
    write_bool(w, owns_text)?;
    if owns_text {
        write_str(w, token.text())?;
    }
    match token.value() {
        None => w.write_all(&[0])?,
        Some(TokenValue::Number(n)) => {
            w.write_all(&[1])?;
            w.write_all(&n.to_le_bytes())?;
        }
        Some(TokenValue::Integer(i)) => {
            w.write_all(&[2])?;
            write_i64(w, *i)?;
        }
        Some(TokenValue::Str(s)) => {
            w.write_all(&[3])?;
            write_str(w, s)?;
        }
    }
    write_trivia(w, token.leading_trivia())?;
    write_trivia(w, token.trailing_trivia())?;
    Ok(())
}

fn read_token(r: &mut impl Read) -> Result<GreenToken> {
    let kind = kind_from_index(read_u16(r)?)?;
    let diagnostics = read_diagnostics(r)?;
    let annotations = read_annotations(r)?;
    let is_missing = read_bool(r)?;
    let owns_text = read_bool(r)?;
    let text = if owns_text { Some(read_str(r)?) } else { None };
    let mut value_tag = [0u8; 1];
    r.read_exact(&mut value_tag)?;
    let value = match value_tag[0] {
        0 => None,
        1 => {
            let mut buf = [0u8; 8];
            r.read_exact(&mut buf)?;
            Some(TokenValue::Number(f64::from_le_bytes(buf)))
        }
        2 => Some(TokenValue::Integer(read_i64(r)?)),
        3 => Some(TokenValue::Str(Arc::from(read_str(r)?))),
        other => return Err(SerializeError::UnknownTag(other)),
    };
    let leading = read_trivia(r)?;
    let trailing = read_trivia(r)?;

    let mut token = if is_missing { GreenToken::missing(kind) } else { GreenToken::new(kind, text) };
    if let Some(value) = value {
        token = token.with_value(value);
    }
    token = token.with_leading_trivia(leading).with_trailing_trivia(trailing);
    token = token.with_diagnostics(diagnostics).with_annotations(annotations);
    Ok(token)
}

/// Writes `element` in Loretta's green-tree binary wire format.
pub fn write_to(element: &GreenElement, w: &mut impl Write) -> Result<()> {
    match element {
        GreenElement::Token(token) => write_token(w, token),
        GreenElement::Node(node) => write_node(w, node),
    }
}

fn write_node(w: &mut impl Write, node: &GreenNodeData) -> Result<()> {
    let count = node.full_slot_count();
    let tag = match count {
        1 => TAG_NODE_ONE,
        2 => TAG_NODE_TWO,
        3 => TAG_NODE_THREE,
        _ => TAG_NODE_MANY,
    };
    w.write_all(&[tag])?;
    write_u16(w, kind_index(node.kind()))?;
    write_diagnostics(w, node.diagnostics())?;
    write_annotations(w, node.annotations())?;
    if tag == TAG_NODE_MANY {
        write_u32(w, count as u32)?;
    }
    for i in 0..count {
        match node.get_slot(i) {
            None => w.write_all(&[0])?,
            Some(child) => {
                w.write_all(&[1])?;
                write_to(child, w)?;
            }
        }
    }
    Ok(())
}

/// Reads a green element previously written by [`write_to`]. The leading
/// tag byte is the type registry's dispatch key.
pub fn read_from(r: &mut impl Read) -> Result<GreenElement> {
    let mut tag = [0u8; 1];
    r.read_exact(&mut tag)?;
    match tag[0] {
        TAG_TOKEN => Ok(GreenElement::Token(Arc::new(read_token(r)?))),
        TAG_NODE_ONE | TAG_NODE_TWO | TAG_NODE_THREE | TAG_NODE_MANY => {
            let kind = kind_from_index(read_u16(r)?)?;
            let diagnostics = read_diagnostics(r)?;
            let annotations = read_annotations(r)?;
            let count = if tag[0] == TAG_NODE_MANY { read_u32(r)? as usize } else { (tag[0]) as usize };
            let mut children = Vec::with_capacity(count);
            for _ in 0..count {
                let mut present = [0u8; 1];
                r.read_exact(&mut present)?;
                if present[0] == 0 {
                    children.push(None);
                } else {
                    children.push(Some(read_from(r)?));
                }
            }
            Ok(GreenElement::Node(Arc::new(GreenNodeData::with_metadata(
                kind,
                GreenChildren::new(children),
                diagnostics,
                annotations,
            ))))
        }
        other => Err(SerializeError::UnknownTag(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Severity;

    fn ident(text: &str) -> GreenElement {
        GreenElement::Token(Arc::new(GreenToken::new(SyntaxKind::IdentifierToken, Some(Arc::from(text)))))
    }

    #[test]
    fn token_round_trips() {
        let token = ident("foo");
        let mut buf = Vec::new();
        write_to(&token, &mut buf).unwrap();
        let read_back = read_from(&mut buf.as_slice()).unwrap();
        assert_eq!(token, read_back);
    }

    #[test]
    fn node_with_diagnostics_and_annotations_round_trips() {
        let diag = Diagnostic::at_span("LOX0001", Severity::Error, "oops", TextSpan::new(0, 3));
        let annotation = SyntaxAnnotation::new(Some("Marker"), None::<Arc<str>>);
        let original_id = annotation.id();
        let children = GreenChildren::new(vec![Some(ident("x")), None, Some(ident("y"))]);
        let node = GreenNodeData::with_metadata(
            SyntaxKind::IfStatement,
            children,
            Arc::from(vec![diag]),
            Arc::from(vec![annotation]),
        );
        let element = GreenElement::Node(Arc::new(node));

        let mut buf = Vec::new();
        write_to(&element, &mut buf).unwrap();
        let read_back = read_from(&mut buf.as_slice()).unwrap();

        let GreenElement::Node(back) = &read_back else { panic!("expected node") };
        assert_eq!(back.annotations()[0].id(), original_id);
        assert_eq!(back.diagnostics()[0].id.as_ref(), "LOX0001");
        assert_eq!(back.get_slot(1), None);
        assert_eq!(element, read_back);
    }
}
