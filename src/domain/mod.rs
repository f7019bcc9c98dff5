//! Domain layer: depth-to-parent inference and argument flattening
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod error;
pub mod flatten;

pub use builder::{Attach, DepthTreeBuilder};
pub use error::{DomainError, DomainResult};
pub use flatten::{flatten, Arg, Item, BASE_DEPTH};
