//! Webhook event processing

pub mod service;

pub use service::{WebhookDisposition, WebhookProcessor};
