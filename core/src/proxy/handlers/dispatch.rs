//! Route-table dispatch
//! Handles every request not claimed by a fixed route

use axum::{
    body::Body,
    extract::State,
    http::{header, uri::Authority, HeaderMap, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use tracing::info;

use crate::proxy::error::ProxyResult;
use crate::proxy::headers::forward_headers;
use crate::proxy::server::AppState;

/// Look the request up in the route table and forward it, or answer 404.
pub async fn handle_dispatch(
    State(state): State<AppState>,
    request: Request<Body>,
) -> ProxyResult<Response> {
    let (parts, body) = request.into_parts();
    let hostname = request_hostname(&parts.uri, &parts.headers);

    let Some(entry) = state.routes.find(parts.uri.path(), hostname.as_deref()) else {
        return Ok((StatusCode::NOT_FOUND, "404 Not Found").into_response());
    };

    let url = entry.upstream_url(parts.uri.path(), parts.uri.query());
    let headers = forward_headers(entry, &parts.headers);

    info!(
        route = entry.path_segment(),
        method = %parts.method,
        path = parts.uri.path(),
        "Dispatching to upstream"
    );

    state
        .upstream
        .fetch_with_timeout(parts.method, &url, headers, body, state.request_timeout)
        .await
}

/// Hostname of the request without port, from the URI authority or the
/// `Host` header.
pub fn request_hostname(uri: &Uri, headers: &HeaderMap) -> Option<String> {
    if let Some(host) = uri.host() {
        return Some(host.to_ascii_lowercase());
    }

    let value = headers.get(header::HOST)?.to_str().ok()?;
    let authority: Authority = value.parse().ok()?;
    Some(authority.host().to_ascii_lowercase())
}
