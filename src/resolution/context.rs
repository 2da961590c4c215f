//! Per-request context.
//!
//! Built once per request from the transport and the request line, dropped
//! after the redirect decision. Path and query are kept exactly as received.

/// Transport scheme of the listener that accepted the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request-derived fields available to matching and templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    scheme: Scheme,
    host: String,
    path: String,
    query: String,
}

impl RequestContext {
    pub fn new(
        scheme: Scheme,
        host: impl Into<String>,
        path: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            scheme,
            host: host.into(),
            path: path.into(),
            query: query.into(),
        }
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Host as presented by the client.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw query string without the leading `?`.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Full request URL, the string rule patterns are matched against.
    pub fn url(&self) -> String {
        self.url_for_host(&self.host)
    }

    /// Origin-form request target: path plus `?query` when present.
    pub fn request_uri(&self) -> String {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        if self.query.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, self.query)
        }
    }

    /// The same URL on the `www.`-prefixed host.
    pub fn www_url(&self) -> String {
        self.url_for_host(&format!("www.{}", self.host))
    }

    /// Whether the host already starts with `www.` (ASCII case-insensitive).
    pub fn has_www_prefix(&self) -> bool {
        self.host
            .get(..4)
            .map(|prefix| prefix.eq_ignore_ascii_case("www."))
            .unwrap_or(false)
    }

    fn url_for_host(&self, host: &str) -> String {
        format!("{}://{}{}", self.scheme, host, self.request_uri())
    }
}
