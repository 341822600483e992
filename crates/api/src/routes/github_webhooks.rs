//! The github-webhooks function endpoint.
//!
//! Every delivery is signature-checked against the raw body before any
//! parsing happens. A delivery that fails verification is rejected
//! without touching the database; one we verify but do not handle is
//! acknowledged with success so GitHub does not retry it.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use focusboard_core::WebhookDisposition;
use focusboard_domain::FocusboardError;
use focusboard_infra::verify_signature;
use serde_json::{json, Value};
use tracing::debug;

use crate::context::AppContext;
use crate::error::ApiError;

const SIGNATURE_HEADER: &str = "x-hub-signature-256";
const EVENT_HEADER: &str = "x-github-event";

pub async fn handle(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| FocusboardError::Security("missing webhook signature".to_string()))?;

    verify_signature(&ctx.config.webhook.secret, &body, signature)?;

    let event = headers
        .get(EVENT_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    debug!(event, bytes = body.len(), "verified webhook delivery");

    match ctx.webhooks.process(event, &body).await? {
        WebhookDisposition::Processed { tasks_created, tasks_completed } => Ok(Json(json!({
            "success": true,
            "tasks_created": tasks_created,
            "tasks_completed": tasks_completed,
        }))),
        WebhookDisposition::Ignored => Ok(Json(json!({ "success": true, "ignored": true }))),
    }
}
