//! Application layer: build scripts and reporting
//!
//! This layer drives the markup adapter from files on disk.

pub mod error;
pub mod error_ext;
pub mod report;
pub mod script;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use report::BuildReport;
pub use script::{AddCall, ArgSpec, NodeSpec, Script};
