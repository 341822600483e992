//! Token Exchange Service

pub mod service;

pub use service::{ExchangeOutcome, ExchangeRequest, TokenExchangeService};
