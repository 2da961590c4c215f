//! The TXT lookup seam.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by a TXT lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The resolver reported a failure (SERVFAIL, refused, network error, ...).
    #[error("{0}")]
    Resolve(String),

    /// The lookup did not finish before the deadline.
    #[error("lookup timed out after {0:?}")]
    Timeout(Duration),
}

/// Source of TXT strings for a fully-qualified query name.
#[async_trait]
pub trait TxtSource: Send + Sync {
    /// Returns every TXT string published at `name`. An empty vector means
    /// the name has no TXT records.
    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>, LookupError>;
}
