//! Read-only syntax tree consumed by the overlay engine.
//!
//! The engine never parses; it receives a flat stream of `{kind, from, to}`
//! nodes from an external parser. `markdown` adapts a tree-sitter markdown
//! parse into that stream for hosts (and the CLI) that have no parser of
//! their own.

pub mod markdown;
mod node;
mod tree;

pub use markdown::MarkdownParser;
pub use node::{NodeKind, SyntaxNode};
pub use tree::SyntaxTree;
pub(crate) use tree::{in_regions, within_regions};
