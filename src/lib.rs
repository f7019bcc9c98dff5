//! depthtree: build trees visually from a flat stream of values and indent markers.
//!
//! Architecture (layered):
//! - `domain`: depth tree builder and argument flattening (no I/O)
//! - `markup`: arena-backed markup nodes and the builder facade for them
//! - `application`: build scripts and reports
//! - `config`: layered settings
//! - `cli`: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod markup;
pub mod util;

pub use domain::{Arg, Attach, DepthTreeBuilder, DomainError, DomainResult};
pub use markup::{Document, Markup, MarkupArg, NodeKind};
