//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::exitcode;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Store(_) => exitcode::IOERR,
                InfraError::Output(_) => exitcode::SOFTWARE,
                InfraError::Application(e) => match e {
                    ApplicationError::Domain(_)
                    | ApplicationError::MissingPostId
                    | ApplicationError::UsernameTaken(_) => exitcode::DATAERR,
                    ApplicationError::PostNotFound(_)
                    | ApplicationError::ParentNotFound(_)
                    | ApplicationError::MalformedId { .. }
                    | ApplicationError::UnknownUser(_) => exitcode::NOINPUT,
                    ApplicationError::Persistence(_) => exitcode::IOERR,
                    ApplicationError::Config { .. } => exitcode::CONFIG,
                },
            },
        }
    }
}
