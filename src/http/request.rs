//! Request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) when the client sent none
//! - Extract the resolution-relevant parts of a request (host, path, query)
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Host comes from the `Host` header, falling back to the URI authority (HTTP/2)
//! - Host, path and query are passed on exactly as received

use axum::http::{header, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::resolution::{RequestContext, Scheme};

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeUuidRequestId;

impl MakeRequestId for MakeUuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// The request ID set by the request-id layer, or `"unknown"`.
pub fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Build the resolution context for a request accepted on a `scheme` listener.
///
/// A missing or non-UTF-8 host yields an empty host, which fails validation.
pub fn request_context<B>(scheme: Scheme, request: &Request<B>) -> RequestContext {
    let uri = request.uri();
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .unwrap_or("");

    RequestContext::new(scheme, host, uri.path(), uri.query().unwrap_or(""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_context_from_host_header() {
        let req = Request::builder()
            .uri("/a/b?c=d&e")
            .header("Host", "Mixed.Example")
            .body(Body::empty())
            .unwrap();

        let ctx = request_context(Scheme::Http, &req);
        assert_eq!(ctx.host(), "Mixed.Example");
        assert_eq!(ctx.path(), "/a/b");
        assert_eq!(ctx.query(), "c=d&e");
        assert_eq!(ctx.url(), "http://Mixed.Example/a/b?c=d&e");
    }

    #[test]
    fn test_context_from_authority() {
        let req = Request::builder()
            .uri("https://h2.example/x")
            .body(Body::empty())
            .unwrap();

        let ctx = request_context(Scheme::Https, &req);
        assert_eq!(ctx.host(), "h2.example");
        assert_eq!(ctx.url(), "https://h2.example/x");
    }

    #[test]
    fn test_missing_host() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        assert_eq!(request_context(Scheme::Http, &req).host(), "");
    }

    #[test]
    fn test_request_ids() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        assert_eq!(request_id(&req), "unknown");

        let id = MakeUuidRequestId.make_request_id(&req).unwrap();
        let value = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(value).is_ok());
    }
}
