//! Response construction.
//!
//! # Responsibilities
//! - Map a [`Resolution`] to an HTTP response
//! - Render informational pages for every terminal error
//!
//! # Design Decisions
//! - Only two statuses: 302 for redirects, 200 for everything else
//! - Error detail shown to clients is HTML-escaped
//! - A location that is not a valid header value is never emitted

use axum::{
    body::Body,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};

use crate::resolution::{Resolution, ResolveError};

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

const MALFORMED_TARGET_PAGE: &str =
    "<h1>Target Rule Malformed</h1><p>This domain has a malformed target rule.</p>\n";

/// Build the response for a finished resolution.
pub fn resolution_response(resolution: &Resolution, method: &Method) -> Response {
    match resolution {
        Resolution::Ignored => StatusCode::OK.into_response(),
        Resolution::Redirect(redirect) => redirect_response(&redirect.location, method),
        Resolution::Page(err) => page(error_page(err)),
    }
}

fn redirect_response(location: &str, method: &Method) -> Response {
    let Ok(value) = HeaderValue::from_str(location) else {
        tracing::error!(location = %location, "Refusing to emit invalid Location header");
        return page(MALFORMED_TARGET_PAGE.to_string());
    };

    let body = if method == Method::GET || method == Method::HEAD {
        Body::from(format!("<a href=\"{}\">Found</a>.\n", escape_html(location)))
    } else {
        Body::empty()
    };

    (
        StatusCode::FOUND,
        [
            (header::LOCATION, value),
            (header::CONTENT_TYPE, HeaderValue::from_static(HTML_CONTENT_TYPE)),
        ],
        body,
    )
        .into_response()
}

fn page(body: String) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, HeaderValue::from_static(HTML_CONTENT_TYPE))],
        body,
    )
        .into_response()
}

/// HTML body for a terminal error.
pub fn error_page(err: &ResolveError) -> String {
    match err {
        ResolveError::InvalidHostname(_) => {
            "<h1>Invalid Hostname</h1><p>This domain is not in a valid format for this service.</p>\n"
                .to_string()
        }
        ResolveError::DnsLookup { .. } => {
            format!("<h1>ERROR OCCURRED</h1><pre>{}</pre>\n", escape_html(&err.to_string()))
        }
        ResolveError::Unconfigured(_) => {
            "<h1>Unconfigured</h1><p>This URL is unconfigured <i>or</i> is not valid in the system.</p>\n"
                .to_string()
        }
        ResolveError::NoValidRules { .. } => {
            "<h1>No Valid Rules</h1><p>This domain is configured, but none of the rules were formatted correctly.</p>\n"
                .to_string()
        }
        ResolveError::MalformedRule { .. } => {
            "<h1>Match Rule Malformed</h1><p>This domain has a malformed match rule.</p>\n"
                .to_string()
        }
        ResolveError::NoMatch(_) => {
            "<h1>No Match</h1><p>This domain is configured, but none of the rules matched.</p>\n"
                .to_string()
        }
        ResolveError::Render { .. } => MALFORMED_TARGET_PAGE.to_string(),
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::LookupError;
    use crate::resolution::{Redirect, RedirectSource};

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_redirect_response() {
        let resolution = Resolution::Redirect(Redirect {
            location: "https://x.example/?a=1&b=2".into(),
            source: RedirectSource::Rule { order: 1 },
        });
        let response = resolution_response(&resolution, &Method::GET);

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[header::LOCATION],
            "https://x.example/?a=1&b=2"
        );
        assert_eq!(
            body_text(response).await,
            "<a href=\"https://x.example/?a=1&amp;b=2\">Found</a>.\n"
        );
    }

    #[tokio::test]
    async fn test_redirect_without_body_for_post() {
        let resolution = Resolution::Redirect(Redirect {
            location: "https://x.example/".into(),
            source: RedirectSource::NoRecords,
        });
        let response = resolution_response(&resolution, &Method::POST);
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(body_text(response).await, "");
    }

    #[tokio::test]
    async fn test_invalid_location_becomes_page() {
        let resolution = Resolution::Redirect(Redirect {
            location: "https://x\n".into(),
            source: RedirectSource::Rule { order: 1 },
        });
        let response = resolution_response(&resolution, &Method::GET);
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::LOCATION).is_none());
        assert!(body_text(response).await.contains("Target Rule Malformed"));
    }

    #[tokio::test]
    async fn test_ignored_is_empty_ok() {
        let response = resolution_response(&Resolution::Ignored, &Method::GET);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "");
    }

    #[tokio::test]
    async fn test_pages_are_ok_status() {
        let errors = vec![
            ResolveError::InvalidHostname("bad_host".into()),
            ResolveError::Unconfigured("www.a.example".into()),
            ResolveError::NoValidRules { records: 2 },
            ResolveError::NoMatch("http://www.a.example/".into()),
        ];
        for err in errors {
            let response = resolution_response(&Resolution::Page(err), &Method::GET);
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(response.headers()[header::CONTENT_TYPE], HTML_CONTENT_TYPE);
        }
    }

    #[tokio::test]
    async fn test_lookup_error_detail_is_escaped() {
        let err = ResolveError::DnsLookup {
            name: "_tgt._redir.a.example".into(),
            source: LookupError::Resolve("<script>".into()),
        };
        let body = body_text(resolution_response(&Resolution::Page(err), &Method::GET)).await;
        assert!(body.starts_with("<h1>ERROR OCCURRED</h1><pre>"));
        assert!(body.contains("_tgt._redir.a.example"));
        assert!(body.contains("&lt;script&gt;"));
        assert!(!body.contains("<script>"));
    }
}
