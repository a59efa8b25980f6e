//! Infrastructure-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::infrastructure::traits::StoreError;

/// Infrastructure errors wrap application errors and add wiring-level concerns.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("cannot open store: {0}")]
    Store(#[from] StoreError),

    #[error("serialize output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Result type for infrastructure layer operations.
pub type InfraResult<T> = Result<T, InfraError>;
