//! Live TXT lookups with hickory-resolver.
//!
//! Every lookup goes to the nameservers: the resolver cache is disabled and
//! each query is sent once, so a TXT change is visible on the next request
//! and failures surface immediately.

use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::TokioAsyncResolver;

use crate::config::DnsConfig;
use crate::dns::source::{LookupError, TxtSource};

const DNS_PORT: u16 = 53;

/// [`TxtSource`] backed by a tokio hickory resolver.
#[derive(Clone)]
pub struct HickoryTxtSource {
    resolver: TokioAsyncResolver,
}

impl HickoryTxtSource {
    /// Build a resolver from configuration.
    ///
    /// With no nameservers configured the system resolver configuration is
    /// used, falling back to hickory's defaults if it cannot be read.
    pub fn from_config(config: &DnsConfig) -> Self {
        let (resolver_config, base_opts) = if config.nameservers.is_empty() {
            hickory_resolver::system_conf::read_system_conf().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to read system resolver configuration, using defaults");
                (ResolverConfig::default(), ResolverOpts::default())
            })
        } else {
            let group = NameServerConfigGroup::from_ips_clear(&config.nameservers, DNS_PORT, true);
            (ResolverConfig::from_parts(None, Vec::new(), group), ResolverOpts::default())
        };

        Self::build(resolver_config, base_opts, config)
    }

    fn build(resolver_config: ResolverConfig, base_opts: ResolverOpts, config: &DnsConfig) -> Self {
        let opts = resolver_opts(base_opts, config);

        tracing::info!(
            nameservers = resolver_config.name_servers().len(),
            query_timeout_secs = config.query_timeout_secs,
            "DNS resolver configured"
        );

        Self {
            resolver: TokioAsyncResolver::tokio(resolver_config, opts),
        }
    }
}

fn resolver_opts(mut opts: ResolverOpts, config: &DnsConfig) -> ResolverOpts {
    opts.timeout = Duration::from_secs(config.query_timeout_secs);
    // One query per lookup: no resolver-side retries, no shared cache.
    opts.attempts = 1;
    opts.cache_size = 0;
    // Query names are absolute; never walk the search list.
    opts.ndots = 0;
    opts
}

#[async_trait]
impl TxtSource for HickoryTxtSource {
    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>, LookupError> {
        let fqdn = if name.ends_with('.') {
            name.to_string()
        } else {
            format!("{name}.")
        };

        match self.resolver.txt_lookup(fqdn).await {
            Ok(lookup) => Ok(lookup
                .iter()
                .map(|txt| {
                    txt.txt_data()
                        .iter()
                        .map(|part| String::from_utf8_lossy(part))
                        .collect::<String>()
                })
                .collect()),
            Err(e) => match e.kind() {
                ResolveErrorKind::NoRecordsFound { .. } => Ok(Vec::new()),
                _ => Err(LookupError::Resolve(e.to_string())),
            },
        }
    }
}
