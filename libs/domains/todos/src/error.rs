use std::fmt::Display;
use thiserror::Error;

use crate::repository::StoreError;
use crate::values::TextValueError;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Every failure a use-case can report.
///
/// The set is closed: client-caused failures and server-caused failures,
/// two kinds each. Anything caught at a use-case boundary is classified into
/// one of these four before it leaves.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Server(#[from] ServerError),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    #[error("{message}")]
    Validation {
        message: String,
        #[source]
        cause: Option<BoxError>,
    },
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{message}")]
    Persistence {
        message: String,
        #[source]
        cause: Option<BoxError>,
    },

    #[error("{message}")]
    Unexpected {
        message: String,
        #[source]
        cause: Option<BoxError>,
    },
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_found(resource: impl Into<String>, id: impl Display) -> Self {
        ClientError::NotFound {
            resource: resource.into(),
            id: id.to_string(),
        }
        .into()
    }

    pub fn validation(message: impl Into<String>, cause: Option<BoxError>) -> Self {
        ClientError::Validation {
            message: message.into(),
            cause,
        }
        .into()
    }

    pub fn persistence(message: impl Into<String>, cause: Option<BoxError>) -> Self {
        ServerError::Persistence {
            message: message.into(),
            cause,
        }
        .into()
    }

    pub fn unexpected(message: impl Into<String>, cause: Option<BoxError>) -> Self {
        ServerError::Unexpected {
            message: message.into(),
            cause,
        }
        .into()
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::Client(_))
    }

    /// Failure from a write path. Every storage error counts as persistence.
    pub(crate) fn from_write(context: &str, err: StoreError) -> Self {
        Self::persistence(context, Some(Box::new(err)))
    }

    /// Failure from a read path. Database errors count as persistence,
    /// anything else the store reports is unexpected.
    pub(crate) fn from_read(context: &str, err: StoreError) -> Self {
        match err {
            StoreError::Database(_) | StoreError::Unavailable(_) => {
                Self::persistence(context, Some(Box::new(err)))
            }
            StoreError::CorruptRecord { .. } => Self::unexpected(context, Some(Box::new(err))),
        }
    }
}

/// Validation messages are passed through verbatim.
impl From<TextValueError> for AppError {
    fn from(err: TextValueError) -> Self {
        Self::validation(err.to_string(), Some(Box::new(err)))
    }
}
