//! # Focusboard API
//!
//! HTTP surface of the connect service. Two endpoints mirror the
//! hosted function layout:
//! - `POST /functions/github-oauth` dispatches on an `action` field
//!   (exchange, repositories, issues, track, connection, disconnect)
//! - `POST /functions/github-webhooks` receives signed GitHub
//!   deliveries

pub mod context;
pub mod error;
pub mod routes;

pub use context::AppContext;
pub use error::ApiError;
pub use routes::router;
