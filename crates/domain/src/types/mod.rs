//! Domain data types

pub mod github;
pub mod task;
pub mod webhook;

pub use github::*;
pub use task::*;
pub use webhook::*;
