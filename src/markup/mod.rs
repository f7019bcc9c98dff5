//! Markup adapter: arena-backed markup nodes built with the depth tree builder
//!
//! Attributes are named properties of their element; every other node kind
//! is an ordinary, ordered child.

pub mod builder;
pub mod display;
pub mod document;

pub use builder::{Markup, MarkupArg, ValuePolicy};
pub use display::{DisplayOptions, TreeNodeConvert};
pub use document::{Document, MarkupNode, NodeKind, NodeRole};
