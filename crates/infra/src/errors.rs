//! Infrastructure error types and their domain mapping.

use focusboard_domain::FocusboardError;
use thiserror::Error;

/// Errors raised inside the infrastructure layer before they cross the
/// domain boundary.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<InfraError> for FocusboardError {
    fn from(err: InfraError) -> Self {
        match err {
            InfraError::Sqlite(e) => Self::Database(e.to_string()),
            InfraError::Pool(e) => Self::Database(e.to_string()),
            InfraError::Http(e) => Self::Network(e.to_string()),
        }
    }
}
