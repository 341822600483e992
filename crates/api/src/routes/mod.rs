//! HTTP routes

pub mod github_oauth;
pub mod github_webhooks;

use std::sync::Arc;

use axum::routing::post;
use axum::Router;

use crate::context::AppContext;

/// Build the service router.
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/functions/github-oauth", post(github_oauth::handle))
        .route("/functions/github-webhooks", post(github_webhooks::handle))
        .with_state(ctx)
}
