//! The red syntax tree: a lazy facade over a `loretta-green` tree that
//! adds what a green node can't carry on its own — a parent pointer and
//! an absolute byte position. Every red node is materialized on first
//! access and cached on its parent; nothing here mutates the green tree
//! it wraps.

mod element;
mod node;
mod token;

pub use element::RedElement;
pub use node::{ChildNodesAndTokens, RedNode};
pub use token::RedToken;
