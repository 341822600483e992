//! Repository/Issue relay

pub mod service;

pub use service::RelayService;
