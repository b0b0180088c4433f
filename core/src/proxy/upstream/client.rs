//! Upstream client for forwarding requests to provider APIs

use axum::{
    body::{Body, HttpBody},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use reqwest::Client;
use tokio::sync::mpsc;
use tokio::time::Duration;
use tokio_stream::wrappers::ReceiverStream;

use crate::proxy::error::ProxyResult;
use crate::proxy::headers::{filter_hop_by_hop, transmission_headers};

/// Inbound body chunks buffered ahead of the upstream connection
const BODY_CHANNEL_CAPACITY: usize = 16;

#[derive(Clone)]
pub struct UpstreamClient {
    http_client: Client,
}

impl UpstreamClient {
    /// No overall request timeout on the client itself: route dispatch
    /// applies its own deadline and the custom-target endpoint has none.
    pub fn new() -> ProxyResult<Self> {
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(20))
            .pool_max_idle_per_host(16)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .build()?;
        Ok(Self { http_client })
    }

    /// Forward a request, giving up once `timeout` elapses without response
    /// headers. Dropping the pending future aborts the outbound connection.
    pub async fn fetch_with_timeout(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: Body,
        timeout: Duration,
    ) -> ProxyResult<Response> {
        match tokio::time::timeout(timeout, self.fetch(method, url, headers, body)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(timeout_ms = timeout.as_millis() as u64, "Upstream request timed out");
                Ok((StatusCode::GATEWAY_TIMEOUT, "Request timeout").into_response())
            }
        }
    }

    /// Forward a request and relay the upstream response as a stream
    pub async fn fetch(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: Body,
    ) -> ProxyResult<Response> {
        let mut builder = self
            .http_client
            .request(method, url)
            .headers(transmission_headers(headers));

        if body.size_hint().exact() != Some(0) {
            builder = builder.body(stream_request_body(body));
        }

        let upstream = builder.send().await?;
        tracing::debug!(status = %upstream.status(), "Upstream responded");

        Ok(relay_response(upstream))
    }
}

/// Pump the inbound body into the outbound request chunk by chunk.
fn stream_request_body(body: Body) -> reqwest::Body {
    let (tx, rx) = mpsc::channel(BODY_CHANNEL_CAPACITY);

    tokio::spawn(async move {
        let mut chunks = body.into_data_stream();
        while let Some(chunk) = chunks.next().await {
            if tx.send(chunk).await.is_err() {
                break;
            }
        }
    });

    reqwest::Body::wrap_stream(ReceiverStream::new(rx))
}

fn relay_response(upstream: reqwest::Response) -> Response {
    let status = upstream.status();
    let headers = filter_hop_by_hop(upstream.headers().clone());

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
