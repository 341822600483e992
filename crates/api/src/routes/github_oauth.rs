//! The github-oauth function endpoint.
//!
//! One POST endpoint dispatching on an `action` field, matching the
//! function layout the web client already speaks. The caller's bearer
//! session (if any) is resolved before dispatch; individual actions
//! decide whether an anonymous caller is acceptable.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use focusboard_core::ExchangeRequest;
use focusboard_domain::{FocusboardError, TrackingUpsert};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::context::AppContext;
use crate::error::ApiError;

/// Request body for every github-oauth action. Field names are
/// camelCase on the wire.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthRequest {
    pub action: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub redirect_uri: Option<String>,
    /// Session-only mode: the token obtained from an anonymous
    /// exchange, passed back explicitly because nothing was persisted.
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub repo_id: Option<i64>,
    #[serde(default)]
    pub repo_owner: Option<String>,
    #[serde(default)]
    pub repo_name: Option<String>,
    #[serde(default)]
    pub track_issues: Option<bool>,
    #[serde(default)]
    pub track_pull_requests: Option<bool>,
}

pub async fn handle(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(request): Json<OAuthRequest>,
) -> Result<Json<Value>, ApiError> {
    let user_id = resolve_user(&ctx, &headers).await?;
    debug!(action = %request.action, authenticated = user_id.is_some(), "github-oauth request");

    match request.action.as_str() {
        "exchange" => exchange(&ctx, user_id, request).await,
        "repositories" => repositories(&ctx, user_id, request).await,
        "issues" => issues(&ctx, user_id, request).await,
        "track" => track(&ctx, user_id, request).await,
        "connection" => connection(&ctx, user_id).await,
        "disconnect" => disconnect(&ctx, user_id).await,
        other => Err(FocusboardError::InvalidInput(format!("unknown action: {other}")).into()),
    }
}

/// Resolve the Authorization header into a user id, if present and
/// valid. An unverifiable token is anonymous, not an error; actions
/// that need identity reject anonymous callers themselves.
async fn resolve_user(ctx: &AppContext, headers: &HeaderMap) -> Result<Option<String>, ApiError> {
    let bearer = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match bearer {
        Some(token) => Ok(ctx.sessions.verify(token).await?),
        None => Ok(None),
    }
}

fn require_user(user_id: Option<String>) -> Result<String, ApiError> {
    user_id.ok_or_else(|| FocusboardError::Auth("authentication required".to_string()).into())
}

async fn exchange(
    ctx: &AppContext,
    user_id: Option<String>,
    request: OAuthRequest,
) -> Result<Json<Value>, ApiError> {
    let code = request
        .code
        .ok_or_else(|| FocusboardError::InvalidInput("missing code parameter".to_string()))?;

    let outcome = ctx
        .exchange
        .exchange(ExchangeRequest {
            code,
            redirect_uri: request.redirect_uri.unwrap_or_default(),
            user_id,
        })
        .await?;

    let mut body = serde_json::to_value(&outcome)
        .map_err(|e| FocusboardError::Internal(format!("response encoding failed: {e}")))?;
    if let Some(map) = body.as_object_mut() {
        map.insert("success".to_string(), json!(true));
    }
    Ok(Json(body))
}

async fn repositories(
    ctx: &AppContext,
    user_id: Option<String>,
    request: OAuthRequest,
) -> Result<Json<Value>, ApiError> {
    let repos = ctx.relay.repositories(user_id.as_deref(), request.access_token).await?;
    Ok(Json(json!({ "repositories": repos })))
}

async fn issues(
    ctx: &AppContext,
    user_id: Option<String>,
    request: OAuthRequest,
) -> Result<Json<Value>, ApiError> {
    let owner = request
        .repo_owner
        .ok_or_else(|| FocusboardError::InvalidInput("missing repoOwner parameter".to_string()))?;
    let name = request
        .repo_name
        .ok_or_else(|| FocusboardError::InvalidInput("missing repoName parameter".to_string()))?;

    let issues = ctx
        .relay
        .issues(user_id.as_deref(), request.access_token, &owner, &name)
        .await?;
    Ok(Json(json!({ "issues": issues })))
}

async fn track(
    ctx: &AppContext,
    user_id: Option<String>,
    request: OAuthRequest,
) -> Result<Json<Value>, ApiError> {
    let user_id = require_user(user_id)?;
    let repo_id = request
        .repo_id
        .ok_or_else(|| FocusboardError::InvalidInput("missing repoId parameter".to_string()))?;
    let repo_owner = request
        .repo_owner
        .ok_or_else(|| FocusboardError::InvalidInput("missing repoOwner parameter".to_string()))?;
    let repo_name = request
        .repo_name
        .ok_or_else(|| FocusboardError::InvalidInput("missing repoName parameter".to_string()))?;

    let preference = ctx
        .relay
        .track(
            &user_id,
            TrackingUpsert {
                repo_id,
                repo_owner,
                repo_name,
                track_issues: request.track_issues.unwrap_or(true),
                track_pull_requests: request.track_pull_requests.unwrap_or(false),
            },
        )
        .await?;
    Ok(Json(json!({ "success": true, "tracking": preference })))
}

async fn connection(ctx: &AppContext, user_id: Option<String>) -> Result<Json<Value>, ApiError> {
    let user_id = require_user(user_id)?;
    let summary = ctx.relay.connection(&user_id).await?;
    Ok(Json(json!({ "connected": summary.is_some(), "connection": summary })))
}

async fn disconnect(ctx: &AppContext, user_id: Option<String>) -> Result<Json<Value>, ApiError> {
    let user_id = require_user(user_id)?;
    let removed = ctx.relay.disconnect(&user_id).await?;
    Ok(Json(json!({ "success": removed })))
}
