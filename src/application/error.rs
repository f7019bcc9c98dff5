//! Application-level errors (carries domain errors per add call)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Application errors carry domain failures per add call, plus script and config context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("invalid build script {path}: {message}")]
    Script { path: PathBuf, message: String },

    #[error("add call #{call} failed: {source}")]
    AddCall {
        call: usize,
        #[source]
        source: DomainError,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
