//! In-memory TXT zones.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::dns::source::{LookupError, TxtSource};

/// [`TxtSource`] answering from a fixed table. Unknown names have no records.
///
/// Names are matched case-insensitively and without a trailing dot.
#[derive(Debug, Clone, Default)]
pub struct StaticTxtSource {
    zones: HashMap<String, Result<Vec<String>, String>>,
}

impl StaticTxtSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `records` at `name`, replacing anything already there.
    pub fn with_records<I, S>(mut self, name: &str, records: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.zones.insert(
            normalize(name),
            Ok(records.into_iter().map(Into::into).collect()),
        );
        self
    }

    /// Make lookups of `name` fail with `message`.
    pub fn with_failure(mut self, name: &str, message: impl Into<String>) -> Self {
        self.zones.insert(normalize(name), Err(message.into()));
        self
    }
}

fn normalize(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}

#[async_trait]
impl TxtSource for StaticTxtSource {
    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>, LookupError> {
        match self.zones.get(&normalize(name)) {
            Some(Ok(records)) => Ok(records.clone()),
            Some(Err(message)) => Err(LookupError::Resolve(message.clone())),
            None => Ok(Vec::new()),
        }
    }
}
