//! SQLite persistence adapters
//!
//! All repositories run their queries in `spawn_blocking` so the async
//! runtime never blocks on SQLite.

pub mod connection_repository;
pub mod manager;
pub mod task_repository;
pub mod tracking_repository;

pub use connection_repository::SqliteConnectionRepository;
pub use manager::{DbConnection, DbManager};
pub use task_repository::SqliteTaskRepository;
pub use tracking_repository::SqliteTrackingRepository;

use focusboard_domain::FocusboardError;
use tokio::task;

/// Map a `spawn_blocking` join failure into the domain error space.
pub(crate) fn map_join_error(err: task::JoinError) -> FocusboardError {
    if err.is_cancelled() {
        FocusboardError::Internal("blocking task cancelled".into())
    } else {
        FocusboardError::Internal(format!("blocking task failed: {err}"))
    }
}
