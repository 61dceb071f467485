//! [`RedToken`]: a leaf in the red tree — a green token plus the
//! position and parent a green token can't carry on its own. Cheap
//! enough (one `Arc` clone, no child cache) that it's never memoized;
//! every access through [`crate::RedNode::get_child`] or a
//! [`crate::RedNode::child_nodes_and_tokens`] enumerator rebuilds it.

use std::sync::Arc;

use loretta_green::GreenToken;
use loretta_position::TextSpan;
use loretta_syntax::SyntaxKind;

use crate::node::RedNode;

#[derive(Clone)]
pub struct RedToken {
    green: Arc<GreenToken>,
    parent: Option<RedNode>,
    position: u32,
}

impl PartialEq for RedToken {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.green, &other.green) && self.position == other.position
    }
}

impl Eq for RedToken {}

impl std::fmt::Debug for RedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedToken").field("kind", &self.kind()).field("position", &self.position).finish()
    }
}

impl RedToken {
    pub(crate) fn new(green: Arc<GreenToken>, parent: Option<RedNode>, position: u32) -> RedToken {
        RedToken { green, parent, position }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.green.kind()
    }

    pub fn text(&self) -> &str {
        self.green.text()
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn full_span(&self) -> TextSpan {
        TextSpan::new(self.position, self.green.full_width())
    }

    /// The span of the token's own text, excluding leading/trailing trivia.
    pub fn span(&self) -> TextSpan {
        let leading: u32 = self.green.leading_trivia().iter().map(loretta_green::GreenTrivia::full_width).sum();
        TextSpan::new(self.position + leading, self.green.width())
    }

    pub fn parent(&self) -> Option<RedNode> {
        self.parent.clone()
    }

    pub fn is_missing(&self) -> bool {
        self.green.is_missing()
    }

    pub fn green(&self) -> &GreenToken {
        &self.green
    }
}
