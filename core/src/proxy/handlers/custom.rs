//! Custom-target passthrough
//! Handles POST /custom-model-proxy?url=<absolute url>

use axum::{
    body::Body,
    extract::{Query, State},
    http::Request,
    response::Response,
};
use serde::Deserialize;
use url::Url;

use crate::proxy::error::{ProxyError, ProxyResult};
use crate::proxy::server::AppState;

#[derive(Debug, Deserialize)]
pub struct CustomProxyQuery {
    pub url: Option<String>,
}

/// Validate the target, then forward method, headers and body untouched.
/// No deadline applies here.
pub async fn handle_custom_model_proxy(
    State(state): State<AppState>,
    Query(query): Query<CustomProxyQuery>,
    request: Request<Body>,
) -> ProxyResult<Response> {
    let target = parse_target(query.url.as_deref())?;

    tracing::info!(host = target.host_str().unwrap_or_default(), "Custom model proxy request");

    let (parts, body) = request.into_parts();
    state
        .upstream
        .fetch(parts.method, target.as_str(), parts.headers, body)
        .await
}

fn parse_target(raw: Option<&str>) -> ProxyResult<Url> {
    let raw = raw.ok_or_else(|| ProxyError::InvalidTarget("missing `url` query parameter".to_string()))?;
    Url::parse(raw).map_err(|e| ProxyError::InvalidTarget(format!("{}: {}", raw, e)))
}
