//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::{CommentId, DomainError, PostId};
use crate::infrastructure::traits::StoreError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("post id is required")]
    MissingPostId,

    #[error("post not found: {0}")]
    PostNotFound(PostId),

    #[error("parent comment not found: {0}")]
    ParentNotFound(CommentId),

    #[error("malformed {field}: {value}")]
    MalformedId { field: &'static str, value: String },

    #[error("unknown user: {0}")]
    UnknownUser(String),

    #[error("username already exists: {0}")]
    UsernameTaken(String),

    #[error("storage failure: {0}")]
    Persistence(#[from] StoreError),

    #[error("config error: {message}")]
    Config { message: String },
}

impl ApplicationError {
    /// Caused by the caller's input or references rather than a collaborator fault.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            ApplicationError::Persistence(_) | ApplicationError::Config { .. }
        )
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
