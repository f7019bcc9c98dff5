//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => crate::exitcode::USAGE,
            CliError::Application(e) => match e {
                ApplicationError::Script { .. } => crate::exitcode::DATAERR,
                ApplicationError::AddCall { source, .. } => match source {
                    DomainError::InvalidArgument { .. } => crate::exitcode::DATAERR,
                    DomainError::InvalidDepth(_) => crate::exitcode::SOFTWARE,
                },
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::OperationFailed { .. } => crate::exitcode::NOINPUT,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_add_call_failure_when_mapping_exit_code_then_uses_domain_source() {
        let invalid = CliError::from(ApplicationError::AddCall {
            call: 2,
            source: DomainError::InvalidArgument {
                position: 1,
                reason: "absent value".to_string(),
            },
        });
        let depth = CliError::from(ApplicationError::AddCall {
            call: 1,
            source: DomainError::InvalidDepth(-1),
        });

        assert_eq!(invalid.exit_code(), crate::exitcode::DATAERR);
        assert_eq!(depth.exit_code(), crate::exitcode::SOFTWARE);
    }
}
