//! Terminal outcomes of a resolution.

use thiserror::Error;

use crate::dns::LookupError;
use crate::rules::RenderError;

/// Why a resolution ended without a redirect.
///
/// Every variant is answered with an informational page; none is retried.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The request host failed the hostname grammar; DNS was never queried.
    #[error("invalid hostname {0:?}")]
    InvalidHostname(String),

    /// The TXT lookup failed or timed out.
    #[error("TXT lookup for {name} failed: {source}")]
    DnsLookup {
        name: String,
        #[source]
        source: LookupError,
    },

    /// No TXT records and the host is already `www.`-prefixed.
    #[error("no TXT records published for {0}")]
    Unconfigured(String),

    /// TXT records exist but none of them is a rule.
    #[error("{records} TXT records published but none is a valid rule")]
    NoValidRules { records: usize },

    /// A match pattern failed to compile; later rules were not evaluated.
    #[error("rule with order {order} has a malformed match pattern: {source}")]
    MalformedRule {
        order: u32,
        #[source]
        source: regex::Error,
    },

    /// No rule matched and the host is already `www.`-prefixed.
    #[error("no rule matched {0}")]
    NoMatch(String),

    /// The matching rule's target could not be rendered.
    #[error("rule with order {order} has a malformed target: {source}")]
    Render {
        order: u32,
        #[source]
        source: RenderError,
    },
}

impl ResolveError {
    /// Stable label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            ResolveError::InvalidHostname(_) => "invalid_hostname",
            ResolveError::DnsLookup { .. } => "dns_lookup_error",
            ResolveError::Unconfigured(_) => "unconfigured",
            ResolveError::NoValidRules { .. } => "no_valid_rules",
            ResolveError::MalformedRule { .. } => "malformed_rule",
            ResolveError::NoMatch(_) => "no_match",
            ResolveError::Render { .. } => "render_error",
        }
    }
}

/// What produced a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectSource {
    /// A published rule matched.
    Rule { order: u32 },
    /// No TXT records; sent to the `www.` host.
    NoRecords,
    /// Rules exist but none matched; sent to the `www.` host.
    NoMatch,
}

impl RedirectSource {
    pub fn label(&self) -> &'static str {
        match self {
            RedirectSource::Rule { .. } => "rule",
            RedirectSource::NoRecords => "www_no_records",
            RedirectSource::NoMatch => "www_no_match",
        }
    }
}

/// A 302 decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub location: String,
    pub source: RedirectSource,
}

/// Result of resolving one request.
#[derive(Debug)]
pub enum Resolution {
    /// Favicon request, answered with an empty page.
    Ignored,
    Redirect(Redirect),
    Page(ResolveError),
}

impl Resolution {
    pub fn label(&self) -> &'static str {
        match self {
            Resolution::Ignored => "ignored",
            Resolution::Redirect(redirect) => redirect.source.label(),
            Resolution::Page(err) => err.label(),
        }
    }

    pub fn redirect(&self) -> Option<&Redirect> {
        match self {
            Resolution::Redirect(redirect) => Some(redirect),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ResolveError> {
        match self {
            Resolution::Page(err) => Some(err),
            _ => None,
        }
    }
}
