use thiserror::Error;

use crate::certificate::CertificateError;

/// Errors raised while building the service or a query.
#[derive(Debug, Error)]
pub enum AppError {
    /// Certificate, key or passphrase absent
    #[error("Missing credential: {0}")]
    MissingCredential(String),
    /// A required identity or query field is empty
    #[error("Missing field: {0}")]
    MissingField(String),
    /// A supplied value violates a length constraint
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Combined archive could not be turned into a PEM pair
    #[error("Certificate error: {0}")]
    Certificate(#[from] CertificateError),
    /// Invalid input format
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// IO operation failed
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

// Custom type alias for Results in this application
pub type AppResult<T> = Result<T, AppError>;
