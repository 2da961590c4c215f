//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap TXT lookups with a deadline
//! - Map expiry to a lookup error distinct from resolver failures
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities; the pending lookup is dropped on expiry

use std::time::Duration;

use crate::dns::{LookupError, TxtSource};

/// Run `source.lookup_txt(name)`, giving up after `deadline`.
pub async fn lookup_with_deadline(
    source: &dyn TxtSource,
    name: &str,
    deadline: Duration,
) -> Result<Vec<String>, LookupError> {
    match tokio::time::timeout(deadline, source.lookup_txt(name)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(name = %name, deadline = ?deadline, "TXT lookup timed out");
            Err(LookupError::Timeout(deadline))
        }
    }
}
