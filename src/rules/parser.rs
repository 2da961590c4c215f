//! TXT record parsing.
//!
//! # Record Format
//! ```text
//! [<order> <match> ]<target>
//!
//! "10 ^https?://[^/]+/blog/(.*)$ https://blog.example.com/%s"
//!   order  = 10
//!   match  = ^https?://[^/]+/blog/(.*)$
//!   target = https://blog.example.com/%s
//! ```
//!
//! # Design Decisions
//! - Two-stage parse: optional order/match prefix, then the remainder as target
//! - Strings that are not rules are discarded, never reported as errors
//! - A record without the prefix is a catch-all at `DEFAULT_ORDER`

use serde::Serialize;

/// Order given to records that carry no explicit order.
pub const DEFAULT_ORDER: u32 = 99_999;

/// One redirect directive published in a TXT record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    order: u32,
    #[serde(rename = "match")]
    pattern: String,
    target: String,
}

impl Rule {
    pub fn new(order: u32, pattern: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            order,
            pattern: pattern.into(),
            target: target.into(),
        }
    }

    /// Evaluation priority, lower first.
    pub fn order(&self) -> u32 {
        self.order
    }

    /// Regular expression tested against the full request URL.
    /// Empty for catch-all records.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Target template, rendered by [`crate::rules::render_target`].
    pub fn target(&self) -> &str {
        &self.target
    }
}

/// Parse one raw TXT string into a rule.
///
/// Returns `None` when the string is not a rule: blank records, an order
/// without a match token or target, or an order that does not fit in `u32`.
pub fn parse_rule(record: &str) -> Option<Rule> {
    let record = record.trim();
    if record.is_empty() {
        return None;
    }

    let (first, rest) = split_token(record);
    if !first.bytes().all(|b| b.is_ascii_digit()) {
        return Some(Rule::new(DEFAULT_ORDER, "", record));
    }

    let order = first.parse::<u32>().ok()?;
    let (pattern, target) = split_token(rest);
    if pattern.is_empty() || target.is_empty() {
        return None;
    }

    Some(Rule::new(order, pattern, target))
}

/// Split off the leading non-whitespace run; the remainder has its
/// leading whitespace removed but is otherwise untouched.
fn split_token(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(idx) => (&input[..idx], input[idx..].trim_start()),
        None => (input, ""),
    }
}
