//! Source text and position tracking for the Loretta Lua front end.
//!
//! This crate has no internal dependencies; it is a tier-1 leaf crate
//! consumed by every other part of the workspace that needs to talk about
//! "where" something is in the source.

mod error;
mod line_index;
mod source_text;
mod span;

pub use error::RangeError;
pub use line_index::LineIndex;
pub use source_text::{SourceText, TextLine};
pub use span::{FileLinePositionSpan, LinePosition, TextSpan};
