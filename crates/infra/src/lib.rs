//! # Focusboard Infrastructure
//!
//! Adapters behind the `focusboard-core` ports:
//! - SQLite persistence for connections, tracking preferences and tasks
//! - The GitHub HTTP client (token endpoint and REST API)
//! - Bearer-session verification against the hosted auth service
//! - Webhook signature verification
//! - Environment-based configuration loading

pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod github;
pub mod webhook;

pub use auth::{HostedSessionVerifier, NoopSessionVerifier};
pub use database::{
    DbManager, SqliteConnectionRepository, SqliteTaskRepository, SqliteTrackingRepository,
};
pub use errors::InfraError;
pub use github::GitHubApiClient;
pub use webhook::verify_signature;
