#![allow(
    clippy::missing_docs_in_private_items,
    reason = "Internal implementation details don't need public documentation"
)]
#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]

//! Mutable HTML document tree backed by an `indextree` arena.
//!
//! Documents are built by html5ever's tree builder (see [`Document::parse`]),
//! queried and mutated through [`Document`], and written back out with
//! [`Document::to_html`].

pub mod dom;
pub mod parser;

pub use dom::{DOMNode, Document, NodeKind};
pub use indextree::NodeId;
