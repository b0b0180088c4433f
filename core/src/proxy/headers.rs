//! Header edits applied when forwarding to an upstream

use axum::http::header::{self, HeaderMap, HeaderName};

use crate::proxy::routes::RouteEntry;

/// Anthropic rejects browser-originated requests that carry `origin`.
const ORIGIN_STRIPPED_SEGMENT: &str = "anthropic";

/// Hop-by-hop headers that must never be forwarded
const HOP_BY_HOP_HEADERS: &[HeaderName] = &[
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Clone inbound headers for a route-table forward.
///
/// `host` and `content-length` are left alone here; the upstream client
/// deals with `host` when the request goes on the wire.
pub fn forward_headers(entry: &RouteEntry, inbound: &HeaderMap) -> HeaderMap {
    let mut headers = inbound.clone();
    if entry.path_segment() == ORIGIN_STRIPPED_SEGMENT {
        headers.remove(header::ORIGIN);
    }
    headers
}

pub fn is_hop_by_hop_header(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(name) || name.as_str() == "keep-alive"
}

/// Headers as they are sent to the upstream: `host` is derived from the
/// target URL by the HTTP client.
pub fn transmission_headers(headers: HeaderMap) -> HeaderMap {
    let mut filtered = filter_hop_by_hop(headers);
    filtered.remove(header::HOST);
    filtered
}

pub fn filter_hop_by_hop(headers: HeaderMap) -> HeaderMap {
    let mut filtered = HeaderMap::with_capacity(headers.len());
    let mut current: Option<HeaderName> = None;

    // Iterating an owned HeaderMap yields `None` names for repeated values.
    for (name, value) in headers {
        if let Some(name) = name {
            current = Some(name);
        }
        if let Some(name) = &current {
            if !is_hop_by_hop_header(name) {
                filtered.append(name.clone(), value);
            }
        }
    }

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn inbound() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ORIGIN, HeaderValue::from_static("https://chat.example"));
        headers.insert(header::HOST, HeaderValue::from_static("proxy.example"));
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("12"));
        headers.insert("x-api-key", HeaderValue::from_static("sk-test"));
        headers
    }

    #[test]
    fn anthropic_drops_origin() {
        let entry = RouteEntry::new("anthropic", "https://api.anthropic.com");
        let headers = forward_headers(&entry, &inbound());

        assert!(headers.get(header::ORIGIN).is_none());
        assert_eq!(headers.get("x-api-key").unwrap(), "sk-test");
    }

    #[test]
    fn other_routes_keep_every_header() {
        let entry = RouteEntry::new("openai", "https://api.openai.com");
        let headers = forward_headers(&entry, &inbound());

        assert_eq!(headers, inbound());
    }

    #[test]
    fn transmission_drops_host_and_hop_by_hop() {
        let mut headers = inbound();
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        headers.insert("keep-alive", HeaderValue::from_static("timeout=5"));

        let sent = transmission_headers(headers);

        assert!(sent.get(header::HOST).is_none());
        assert!(sent.get(header::CONNECTION).is_none());
        assert!(sent.get(header::TRANSFER_ENCODING).is_none());
        assert!(sent.get("keep-alive").is_none());
        assert_eq!(sent.get(header::CONTENT_LENGTH).unwrap(), "12");
        assert_eq!(sent.get(header::ORIGIN).unwrap(), "https://chat.example");
    }

    #[test]
    fn repeated_values_survive_filtering() {
        let mut headers = HeaderMap::new();
        headers.append(header::SET_COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::SET_COOKIE, HeaderValue::from_static("b=2"));

        let filtered = filter_hop_by_hop(headers);

        let cookies: Vec<_> = filtered.get_all(header::SET_COOKIE).iter().collect();
        assert_eq!(cookies, vec!["a=1", "b=2"]);
    }
}
