//! Slot storage for interior green nodes, specialized to avoid a heap
//! allocation for the overwhelmingly common 1-3 child case.

use std::sync::Arc;

use crate::node::GreenElement;

/// The children of an interior [`crate::node::GreenNodeData`]. Each slot
/// is `Option` because some node kinds have structurally optional
/// children (an `if` without an `else` clause) distinct from a *missing*
/// token (a required child the parser failed to find, represented by a
/// zero-width token, not an absent slot).
#[derive(Debug, Clone, PartialEq)]
pub enum GreenChildren {
    One([Option<GreenElement>; 1]),
    Two([Option<GreenElement>; 2]),
    Three([Option<GreenElement>; 3]),
    Many(Arc<[Option<GreenElement>]>),
}

impl GreenChildren {
    /// Picks the cheapest representation for `children`.
    pub fn new(children: Vec<Option<GreenElement>>) -> Self {
        let children = match <[Option<GreenElement>; 1]>::try_from(children) {
            Ok(one) => return GreenChildren::One(one),
            Err(children) => children,
        };
        let children = match <[Option<GreenElement>; 2]>::try_from(children) {
            Ok(two) => return GreenChildren::Two(two),
            Err(children) => children,
        };
        match <[Option<GreenElement>; 3]>::try_from(children) {
            Ok(three) => GreenChildren::Three(three),
            Err(children) => GreenChildren::Many(Arc::from(children)),
        }
    }

    pub fn slot_count(&self) -> usize {
        match self {
            GreenChildren::One(_) => 1,
            GreenChildren::Two(_) => 2,
            GreenChildren::Three(_) => 3,
            GreenChildren::Many(slots) => slots.len(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&GreenElement> {
        let slot: &Option<GreenElement> = match self {
            GreenChildren::One(slots) => slots.get(index)?,
            GreenChildren::Two(slots) => slots.get(index)?,
            GreenChildren::Three(slots) => slots.get(index)?,
            GreenChildren::Many(slots) => slots.get(index)?,
        };
        slot.as_ref()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&GreenElement>> {
        (0..self.slot_count()).map(move |i| self.get(i))
    }
}

/// True if `slot_count > 1` and slots strictly alternate node/token
/// starting with a node (a "separated list": `a, b, c` is node-token-node
/// or similar, where tokens are the separators).
pub fn is_separated(children: &GreenChildren) -> bool {
    if children.slot_count() <= 1 {
        return false;
    }
    children.iter().enumerate().all(|(i, slot)| match slot {
        None => false,
        Some(element) => {
            let expect_node = i % 2 == 0;
            expect_node == element.is_node()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::GreenToken;
    use loretta_syntax::SyntaxKind;

    fn tok(kind: SyntaxKind) -> GreenElement {
        GreenElement::Token(Arc::new(GreenToken::new(kind, None::<Arc<str>>)))
    }

    #[test]
    fn picks_one_child_representation() {
        let children = GreenChildren::new(vec![Some(tok(SyntaxKind::IdentifierToken))]);
        assert!(matches!(children, GreenChildren::One(_)));
        assert_eq!(children.slot_count(), 1);
    }

    #[test]
    fn picks_many_for_four_or_more() {
        let children = GreenChildren::new(vec![
            Some(tok(SyntaxKind::IdentifierToken)),
            Some(tok(SyntaxKind::CommaToken)),
            Some(tok(SyntaxKind::IdentifierToken)),
            Some(tok(SyntaxKind::CommaToken)),
        ]);
        assert!(matches!(children, GreenChildren::Many(_)));
    }

    #[test]
    fn detects_separated_list() {
        let children = GreenChildren::new(vec![
            Some(tok(SyntaxKind::IdentifierToken)),
            Some(tok(SyntaxKind::CommaToken)),
            Some(tok(SyntaxKind::IdentifierToken)),
        ]);
        assert!(is_separated(&children));
    }

    #[test]
    fn non_alternating_is_not_separated() {
        let children = GreenChildren::new(vec![
            Some(tok(SyntaxKind::IdentifierToken)),
            Some(tok(SyntaxKind::IdentifierToken)),
        ]);
        assert!(!is_separated(&children));
    }
}
