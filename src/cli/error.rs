//! CLI-level errors (wraps application errors)

use std::path::PathBuf;

use thiserror::Error;

use crate::application::ApplicationError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("input not found: {0}")]
    InputNotFound(PathBuf),

    #[error("{failed} of {total} notations failed")]
    BatchFailed { failed: usize, total: usize },

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Io { .. } => crate::exitcode::IOERR,
            CliError::InputNotFound(_) => crate::exitcode::NOINPUT,
            CliError::BatchFailed { .. } => crate::exitcode::DATAERR,
            CliError::Application(e) => match e {
                ApplicationError::Domain(_) => crate::exitcode::DATAERR,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
            },
        }
    }
}
