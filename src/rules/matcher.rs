//! Pattern matching against the reconstructed request URL.
//!
//! # Responsibilities
//! - Compile a rule's match pattern
//! - Test the full URL (`scheme://host/path?query`), first match only
//! - Return capture groups 1..N in order
//!
//! # Design Decisions
//! - Compilation is bounded in size; untrusted zones publish these patterns
//! - A group that did not participate captures the empty string
//! - A pattern without groups still signals a match with no captures

use regex::{Regex, RegexBuilder};

/// Upper bound on the compiled program size of a single pattern.
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// Captured groups of a successful match, group 1 first.
pub type Captures = Vec<String>;

/// A compiled match pattern.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    regex: Regex,
}

impl PatternMatcher {
    /// Compile a pattern. Fails for malformed or oversized expressions.
    pub fn compile(pattern: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern)
            .size_limit(PATTERN_SIZE_LIMIT)
            .build()?;
        Ok(Self { regex })
    }

    /// Match once against `url`. `None` means no match.
    pub fn captures(&self, url: &str) -> Option<Captures> {
        let caps = self.regex.captures(url)?;
        Some(
            caps.iter()
                .skip(1)
                .map(|group| group.map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect(),
        )
    }
}
