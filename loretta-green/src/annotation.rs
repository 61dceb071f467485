//! Immutable tags attachable to any green node without changing its
//! structural identity.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

static NEXT_ID: AtomicI64 = AtomicI64::new(1);

/// An immutable, identity-bearing tag attached to a green node. Two
/// annotations are equal iff their `id`s match, regardless of `kind`/`data`
/// — this is what lets a caller look a specific annotation instance back
/// up after it has ridden through a tree rewrite.
#[derive(Debug, Clone)]
pub struct SyntaxAnnotation {
    id: i64,
    pub kind: Option<Arc<str>>,
    pub data: Option<Arc<str>>,
}

impl PartialEq for SyntaxAnnotation {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for SyntaxAnnotation {}

impl SyntaxAnnotation {
    /// Creates a fresh annotation with a new process-wide unique id.
    pub fn new(kind: Option<impl Into<Arc<str>>>, data: Option<impl Into<Arc<str>>>) -> Self {
        SyntaxAnnotation { id: next_id(), kind: kind.map(Into::into), data: data.map(Into::into) }
    }

    /// Reconstructs an annotation with a specific id, restoring identity
    /// across a `write_to`/`read_from` round trip (see
    /// [`crate::serialize`]).
    pub fn with_id(id: i64, kind: Option<impl Into<Arc<str>>>, data: Option<impl Into<Arc<str>>>) -> Self {
        SyntaxAnnotation { id, kind: kind.map(Into::into), data: data.map(Into::into) }
    }

    pub fn id(&self) -> i64 {
        self.id
    }
}

fn next_id() -> i64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// The predefined "elastic" annotation: formatters treat a token carrying
/// it as eligible for whitespace adjustment. Shared by reference so every
/// caller that marks a token elastic produces `==`-equal annotations.
pub fn elastic_annotation() -> SyntaxAnnotation {
    static ELASTIC_ID: AtomicI64 = AtomicI64::new(0);
    let id = ELASTIC_ID.load(Ordering::Relaxed);
    let id = if id != 0 {
        id
    } else {
        let fresh = next_id();
        match ELASTIC_ID.compare_exchange(0, fresh, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => fresh,
            Err(existing) => existing,
        }
    };
    SyntaxAnnotation::with_id(id, Some("Elastic"), None::<Arc<str>>)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_annotations_have_distinct_ids() {
        let a = SyntaxAnnotation::new(Some("Foo"), None::<Arc<str>>);
        let b = SyntaxAnnotation::new(Some("Foo"), None::<Arc<str>>);
        assert_ne!(a, b);
    }

    #[test]
    fn with_id_restores_identity() {
        let a = SyntaxAnnotation::new(Some("Foo"), Some("bar"));
        let restored = SyntaxAnnotation::with_id(a.id(), Some("Foo"), Some("bar"));
        assert_eq!(a, restored);
    }

    #[test]
    fn elastic_annotation_is_stable() {
        assert_eq!(elastic_annotation(), elastic_annotation());
    }
}
