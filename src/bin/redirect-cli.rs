use std::net::IpAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use url::Url;

use txt_redirector::config::DnsConfig;
use txt_redirector::dns::{HickoryTxtSource, StaticTxtSource, TxtSource};
use txt_redirector::resolution::{RequestContext, Resolution, Resolver, ResolverOptions, Scheme};
use txt_redirector::rules::{parse_rule, RuleSet};

#[derive(Parser)]
#[command(name = "redirect-cli")]
#[command(about = "Inspect TXT redirect rules without running the server", long_about = None)]
struct Cli {
    /// TXT record label prepended to the host.
    #[arg(long, default_value = txt_redirector::resolution::DEFAULT_RECORD_PREFIX)]
    prefix: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse TXT record strings and print the ordered rule set
    Parse {
        /// Raw TXT record strings
        #[arg(required = true)]
        records: Vec<String>,
    },
    /// Resolve a URL the way the server would
    Resolve {
        /// Request URL (http or https)
        url: String,

        /// Use these TXT records instead of querying DNS
        #[arg(short, long = "record")]
        records: Vec<String>,

        /// Nameserver to query (repeatable). Defaults to the system resolver.
        #[arg(short, long = "nameserver")]
        nameservers: Vec<IpAddr>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { records } => {
            let output = parse_report(&records);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Resolve {
            url,
            records,
            nameservers,
        } => {
            let context = request_context(&url)?;
            let options = ResolverOptions {
                record_prefix: cli.prefix.clone(),
                ..ResolverOptions::default()
            };
            let query_name = format!("{}.{}", options.record_prefix, context.host());

            let source: Arc<dyn TxtSource> = if records.is_empty() {
                let config = DnsConfig {
                    record_prefix: cli.prefix,
                    nameservers,
                    ..DnsConfig::default()
                };
                Arc::new(HickoryTxtSource::from_config(&config))
            } else {
                Arc::new(StaticTxtSource::new().with_records(&query_name, records))
            };

            let resolver = Resolver::new(source, options);
            let resolution = resolver.resolve(&context).await;
            let output = resolution_report(&query_name, &context, &resolution);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn parse_report(records: &[String]) -> Value {
    let rejected: Vec<&String> = records
        .iter()
        .filter(|record| parse_rule(record).is_none())
        .collect();
    let rules = RuleSet::parse(records);
    let rules: Vec<_> = rules.iter().collect();
    json!({
        "rules": rules,
        "rejected": rejected,
    })
}

fn request_context(raw: &str) -> Result<RequestContext, Box<dyn std::error::Error>> {
    let url = Url::parse(raw)?;
    let scheme = match url.scheme() {
        "http" => Scheme::Http,
        "https" => Scheme::Https,
        other => return Err(format!("unsupported scheme {other:?}").into()),
    };

    // Host, path and query as written, like the server sees them. `Url`
    // lowercases the host and re-encodes the path.
    let (_, rest) = raw.trim().split_once("://").ok_or("URL has no authority")?;
    let rest = rest.split('#').next().unwrap_or_default();
    let (host, target) = rest.split_at(rest.find(['/', '?']).unwrap_or(rest.len()));
    if host.is_empty() {
        return Err("URL has no host".into());
    }
    let (path, query) = target.split_once('?').unwrap_or((target, ""));
    let path = if path.is_empty() { "/" } else { path };

    Ok(RequestContext::new(scheme, host, path, query))
}

fn resolution_report(query_name: &str, context: &RequestContext, resolution: &Resolution) -> Value {
    let mut report = json!({
        "url": context.url(),
        "query_name": query_name,
        "outcome": resolution.label(),
    });
    match resolution {
        Resolution::Ignored => {}
        Resolution::Redirect(redirect) => {
            report["status"] = json!(302);
            report["location"] = json!(redirect.location);
        }
        Resolution::Page(err) => {
            report["status"] = json!(200);
            report["error"] = json!(err.to_string());
        }
    }
    report
}
