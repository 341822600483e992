//! # Focusboard Core
//!
//! Pure business logic for the GitHub connect flow.
//!
//! This crate contains:
//! - The browser-side connect flow (Authorization Initiator and
//!   Callback Receiver) behind a storage port
//! - The Token Exchange, Relay and Webhook services behind GitHub and
//!   persistence ports
//!
//! ## Architecture Principles
//! - Only depends on `focusboard-domain`
//! - No database or HTTP code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod connect;
pub mod exchange;
pub mod ports;
pub mod relay;
pub mod webhook;

// Re-export specific items to avoid ambiguity
pub use connect::{
    generate_nonce, AuthorizationInitiator, CallbackOutcome, CallbackParams, CallbackReceiver,
    ExchangePort, StateStore, OAUTH_STATE_KEY,
};
pub use exchange::{ExchangeOutcome, ExchangeRequest, TokenExchangeService};
pub use ports::{
    ConnectionRepository, GitHubGateway, IssueEntry, SessionVerifier, TaskRepository,
    TrackingRepository,
};
pub use relay::RelayService;
pub use webhook::{WebhookDisposition, WebhookProcessor};
