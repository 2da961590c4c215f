//! Resolution orchestrator.
//!
//! # State Machine
//! ```text
//! START ──invalid host──────────────────────────────▶ InvalidHostname page
//!   │
//! LOOKUP ──error/timeout────────────────────────────▶ DnsLookup page
//!   │ ──no records──▶ www. redirect, or Unconfigured page if already www.
//!   │
//! PARSE ──no rule survives──────────────────────────▶ NoValidRules page
//!   │
//! MATCH_LOOP (ascending order)
//!   │ ──pattern fails to compile──────────────────────▶ MalformedRule page
//!   │ ──first match (full URL, then request target)──▶ render ──▶ 302 (or Render page)
//!   │ ──exhausted──▶ www. redirect, or NoMatch page if already www.
//! ```
//!
//! The resolver holds no mutable state; one instance serves every listener.
//!
//! # Matching
//! Each pattern is tried against the full URL and, only if that fails, against
//! the request target (`/path?query`). A start-anchored path pattern such as
//! `^/a$` therefore fires even though it can never match a full URL.
//!
//! The favicon check compares the path alone, so `/favicon.ico?v=2` is
//! ignored as well.

use std::sync::Arc;
use std::time::Duration;

use crate::config::DnsConfig;
use crate::dns::TxtSource;
use crate::observability::metrics;
use crate::resilience::timeouts::lookup_with_deadline;
use crate::resolution::context::RequestContext;
use crate::resolution::hostname::is_valid_hostname;
use crate::resolution::outcome::{Redirect, RedirectSource, Resolution, ResolveError};
use crate::rules::{render_target, PatternMatcher, RuleSet};

/// Request path answered with an empty page before any resolution.
pub const FAVICON_PATH: &str = "/favicon.ico";

/// Label prepended to the request host to form the TXT query name.
pub const DEFAULT_RECORD_PREFIX: &str = "_tgt._redir";

/// Tunables for [`Resolver`].
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    pub record_prefix: String,
    pub lookup_timeout: Duration,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            record_prefix: DEFAULT_RECORD_PREFIX.to_string(),
            lookup_timeout: Duration::from_secs(10),
        }
    }
}

impl From<&DnsConfig> for ResolverOptions {
    fn from(config: &DnsConfig) -> Self {
        Self {
            record_prefix: config.record_prefix.clone(),
            lookup_timeout: Duration::from_secs(config.lookup_timeout_secs),
        }
    }
}

/// Turns a request into a redirect decision using TXT-published rules.
#[derive(Clone)]
pub struct Resolver {
    source: Arc<dyn TxtSource>,
    options: ResolverOptions,
}

impl Resolver {
    pub fn new(source: Arc<dyn TxtSource>, options: ResolverOptions) -> Self {
        Self { source, options }
    }

    /// TXT query name for `host`.
    pub fn query_name(&self, host: &str) -> String {
        format!("{}.{}", self.options.record_prefix, host)
    }

    /// Resolve one request.
    pub async fn resolve(&self, context: &RequestContext) -> Resolution {
        if context.path() == FAVICON_PATH {
            return Resolution::Ignored;
        }

        match self.evaluate(context).await {
            Ok(redirect) => Resolution::Redirect(redirect),
            Err(err) => Resolution::Page(err),
        }
    }

    async fn evaluate(&self, context: &RequestContext) -> Result<Redirect, ResolveError> {
        let host = context.host();
        if !is_valid_hostname(host) {
            return Err(ResolveError::InvalidHostname(host.to_string()));
        }

        let name = self.query_name(host);
        let records =
            match lookup_with_deadline(self.source.as_ref(), &name, self.options.lookup_timeout)
                .await
            {
                Ok(records) => {
                    metrics::record_dns_lookup(if records.is_empty() { "empty" } else { "ok" });
                    records
                }
                Err(source) => {
                    metrics::record_dns_lookup("error");
                    return Err(ResolveError::DnsLookup { name, source });
                }
            };

        if records.is_empty() {
            tracing::debug!(name = %name, "No TXT records");
            return www_fallback(context, RedirectSource::NoRecords)
                .ok_or_else(|| ResolveError::Unconfigured(host.to_string()));
        }

        let rules = RuleSet::parse(&records);
        if rules.is_empty() {
            return Err(ResolveError::NoValidRules {
                records: records.len(),
            });
        }

        let url = context.url();
        let request_uri = context.request_uri();
        for rule in &rules {
            let order = rule.order();
            let matcher = PatternMatcher::compile(rule.pattern())
                .map_err(|source| ResolveError::MalformedRule { order, source })?;

            // Start-anchored patterns may be written against the request target alone.
            let captures = matcher
                .captures(&url)
                .or_else(|| matcher.captures(&request_uri));
            if let Some(captures) = captures {
                tracing::debug!(order, pattern = %rule.pattern(), url = %url, "Rule matched");
                let location = render_target(rule.target(), context, &captures)
                    .map_err(|source| ResolveError::Render { order, source })?;
                return Ok(Redirect {
                    location,
                    source: RedirectSource::Rule { order },
                });
            }
        }

        www_fallback(context, RedirectSource::NoMatch).ok_or(ResolveError::NoMatch(url))
    }
}

fn www_fallback(context: &RequestContext, source: RedirectSource) -> Option<Redirect> {
    if context.has_www_prefix() {
        return None;
    }
    Some(Redirect {
        location: context.www_url(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::{LookupError, StaticTxtSource};
    use crate::resolution::context::Scheme;
    use crate::rules::RenderError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts lookups so tests can assert DNS was never reached.
    #[derive(Default)]
    struct CountingSource {
        inner: StaticTxtSource,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TxtSource for CountingSource {
        async fn lookup_txt(&self, name: &str) -> Result<Vec<String>, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.lookup_txt(name).await
        }
    }

    fn resolver_with(host: &str, records: &[&str]) -> Resolver {
        let source = StaticTxtSource::new()
            .with_records(&format!("_tgt._redir.{host}"), records.iter().copied());
        Resolver::new(Arc::new(source), ResolverOptions::default())
    }

    fn request(scheme: Scheme, host: &str, path: &str, query: &str) -> RequestContext {
        RequestContext::new(scheme, host, path, query)
    }

    fn location(resolution: &Resolution) -> &str {
        &resolution.redirect().expect("expected a redirect").location
    }

    #[tokio::test]
    async fn test_no_records_redirects_to_www() {
        let resolver = resolver_with("other.example", &[]);
        let resolution = resolver
            .resolve(&request(Scheme::Https, "a.example", "/p/q", "x=1"))
            .await;
        assert_eq!(location(&resolution), "https://www.a.example/p/q?x=1");
        assert_eq!(
            resolution.redirect().unwrap().source,
            RedirectSource::NoRecords
        );
    }

    #[tokio::test]
    async fn test_no_records_on_www_is_unconfigured() {
        let resolver = resolver_with("other.example", &[]);
        let resolution = resolver
            .resolve(&request(Scheme::Http, "www.a.example", "/", ""))
            .await;
        assert!(matches!(
            resolution.error(),
            Some(ResolveError::Unconfigured(host)) if host == "www.a.example"
        ));
    }

    #[tokio::test]
    async fn test_first_match_in_order_wins() {
        let resolver = resolver_with("a.example", &["1 ^/a$ https://x", "2 ^/b$ https://y"]);
        let resolution = resolver
            .resolve(&request(Scheme::Http, "a.example", "/a", ""))
            .await;
        assert_eq!(location(&resolution), "https://x");
        assert_eq!(
            resolution.redirect().unwrap().source,
            RedirectSource::Rule { order: 1 }
        );

        let resolver = resolver_with("a.example", &["1 . https://first", "2 . https://second"]);
        let resolution = resolver
            .resolve(&request(Scheme::Http, "a.example", "/a", ""))
            .await;
        assert_eq!(location(&resolution), "https://first");
    }

    #[tokio::test]
    async fn test_full_url_match_takes_precedence() {
        let resolver = resolver_with("a.example", &[r"1 ^(https?)://([^/]+)/(.*)$ %[3]s-%[2]s-%[1]s"]);
        let resolution = resolver
            .resolve(&request(Scheme::Https, "a.example", "/x", ""))
            .await;
        assert_eq!(location(&resolution), "x-a.example-https");

        let resolver = resolver_with("a.example", &[r"1 ^/(\w+)$ https://b.example/%s"]);
        let resolution = resolver
            .resolve(&request(Scheme::Https, "a.example", "/docs", ""))
            .await;
        assert_eq!(location(&resolution), "https://b.example/docs");
    }

    #[tokio::test]
    async fn test_captures_and_context_render() {
        let resolver = resolver_with(
            "a.example",
            &[r"10 ^https?://[^/]+/blog/(\d+)$ ${SCHEME}://blog.example/posts/%s?from=${HOST}"],
        );
        let resolution = resolver
            .resolve(&request(Scheme::Https, "a.example", "/blog/42", ""))
            .await;
        assert_eq!(
            location(&resolution),
            "https://blog.example/posts/42?from=a.example"
        );
    }

    #[tokio::test]
    async fn test_catch_all_record_evaluates_last() {
        let resolver = resolver_with(
            "a.example",
            &["https://fallback.example${PATH}", "5 /special$ https://special"],
        );
        let special = resolver
            .resolve(&request(Scheme::Http, "a.example", "/special", ""))
            .await;
        assert_eq!(location(&special), "https://special");

        let other = resolver
            .resolve(&request(Scheme::Http, "a.example", "/x", ""))
            .await;
        assert_eq!(location(&other), "https://fallback.example/x");
    }

    #[tokio::test]
    async fn test_malformed_rule_halts_evaluation() {
        let resolver = resolver_with("a.example", &["1 ([a- https://x", "2 . https://y"]);
        let resolution = resolver
            .resolve(&request(Scheme::Http, "a.example", "/", ""))
            .await;
        assert!(matches!(
            resolution.error(),
            Some(ResolveError::MalformedRule { order: 1, .. })
        ));
    }

    #[tokio::test]
    async fn test_malformed_rule_after_match_is_not_reached() {
        let resolver = resolver_with("a.example", &["1 . https://x", "2 ([a- https://y"]);
        let resolution = resolver
            .resolve(&request(Scheme::Http, "a.example", "/", ""))
            .await;
        assert_eq!(location(&resolution), "https://x");
    }

    #[tokio::test]
    async fn test_no_valid_rules() {
        let resolver = resolver_with("a.example", &["", "17", "3 ^/a$"]);
        let resolution = resolver
            .resolve(&request(Scheme::Http, "a.example", "/", ""))
            .await;
        assert!(matches!(
            resolution.error(),
            Some(ResolveError::NoValidRules { records: 3 })
        ));
    }

    #[tokio::test]
    async fn test_no_match_falls_back_to_www() {
        let resolver = resolver_with("a.example", &["1 /nothing$ https://x"]);
        let resolution = resolver
            .resolve(&request(Scheme::Http, "a.example", "/page", "q"))
            .await;
        assert_eq!(location(&resolution), "http://www.a.example/page?q");
        assert_eq!(resolution.redirect().unwrap().source, RedirectSource::NoMatch);
    }

    #[tokio::test]
    async fn test_no_match_on_www_is_page() {
        let resolver = resolver_with("www.a.example", &["1 /nothing$ https://x"]);
        let resolution = resolver
            .resolve(&request(Scheme::Http, "www.a.example", "/page", ""))
            .await;
        assert!(matches!(
            resolution.error(),
            Some(ResolveError::NoMatch(url)) if url == "http://www.a.example/page"
        ));
    }

    #[tokio::test]
    async fn test_render_error_is_reported() {
        let resolver = resolver_with("a.example", &["1 ^http://a.example/(x)$ https://y/%s/%s"]);
        let resolution = resolver
            .resolve(&request(Scheme::Http, "a.example", "/x", ""))
            .await;
        assert!(matches!(
            resolution.error(),
            Some(ResolveError::Render {
                order: 1,
                source: RenderError::MissingCapture { referenced: 2, captured: 1 }
            })
        ));
    }

    #[tokio::test]
    async fn test_invalid_hostname_never_looks_up() {
        let source = Arc::new(CountingSource::default());
        let resolver = Resolver::new(source.clone(), ResolverOptions::default());

        for host in ["bad_host.example", "double..dot", "", "a.example:8080"] {
            let resolution = resolver.resolve(&request(Scheme::Http, host, "/", "")).await;
            assert!(matches!(
                resolution.error(),
                Some(ResolveError::InvalidHostname(_))
            ));
        }
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_favicon_short_circuits() {
        let source = Arc::new(CountingSource::default());
        let resolver = Resolver::new(source.clone(), ResolverOptions::default());

        for host in ["a.example", "bad_host"] {
            for query in ["", "v=2"] {
                let resolution = resolver
                    .resolve(&request(Scheme::Http, host, FAVICON_PATH, query))
                    .await;
                assert!(matches!(resolution, Resolution::Ignored));
            }
        }
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_lookup_error_page() {
        let source = StaticTxtSource::new().with_failure("_tgt._redir.a.example", "SERVFAIL");
        let resolver = Resolver::new(Arc::new(source), ResolverOptions::default());
        let resolution = resolver
            .resolve(&request(Scheme::Http, "a.example", "/", ""))
            .await;
        match resolution.error() {
            Some(ResolveError::DnsLookup { name, source }) => {
                assert_eq!(name, "_tgt._redir.a.example");
                assert_eq!(source, &LookupError::Resolve("SERVFAIL".into()));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_custom_record_prefix() {
        let source = StaticTxtSource::new().with_records("_r.a.example", ["1 . https://custom"]);
        let options = ResolverOptions {
            record_prefix: "_r".into(),
            ..ResolverOptions::default()
        };
        let resolver = Resolver::new(Arc::new(source), options);
        assert_eq!(resolver.query_name("a.example"), "_r.a.example");

        let resolution = resolver
            .resolve(&request(Scheme::Http, "a.example", "/", ""))
            .await;
        assert_eq!(location(&resolution), "https://custom");
    }
}
