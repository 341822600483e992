//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Focusboard
///
/// The variants mirror the failure classes the GitHub connect flow must
/// keep apart: configuration problems are fatal and never retried,
/// upstream authorization failures require a fresh flow, network
/// failures are retriable by the caller, and a missing connection must
/// prompt reconnection rather than a retry.
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum FocusboardError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    /// Upstream authorization failure (bad/expired/reused code, denied
    /// scope). Not retriable; the user must restart the connect flow.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Security-relevant rejection (CSRF state mismatch, bad webhook
    /// signature).
    #[error("Security error: {0}")]
    Security(String),

    /// No stored GitHub connection where one is required. Distinct from
    /// transient failure so callers can prompt a reconnect.
    #[error("GitHub connection not found: {0}")]
    NotConnected(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Focusboard operations
pub type Result<T> = std::result::Result<T, FocusboardError>;
