//! Webhook transport security

pub mod signature;

pub use signature::verify_signature;
