//! Bearer-session verification adapters

pub mod verifier;

pub use verifier::{HostedSessionVerifier, NoopSessionVerifier};
