//! TXT Redirector
//!
//! Answers every HTTP request with a redirect decided by the DNS TXT records
//! published for the request's host.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ net listener ──▶ http server ──▶ resolution engine
//!                     (http/https)     (axum router)        │
//!                                                           ▼
//!                                      ┌────────────────────────────────┐
//!                                      │ dns: TXT _tgt._redir.<host>    │
//!                                      │ rules: parse → order → match   │
//!                                      │        → render target         │
//!                                      └────────────────┬───────────────┘
//!                                                       │
//!     Client Response                                   ▼
//!     ◀────────────── 302 Location / informational page
//!
//!     Cross-cutting: config, observability, resilience, lifecycle
//! ```

use std::path::PathBuf;

use clap::Parser;

use txt_redirector::config::{load_config, RedirectorConfig};
use txt_redirector::lifecycle::startup;
use txt_redirector::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "txt-redirector", version)]
#[command(about = "HTTP redirector driven by DNS TXT records", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long, env = "TXT_REDIRECTOR_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RedirectorConfig::default(),
    };

    init_logging(&config.observability);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?cli.config,
        "txt-redirector starting"
    );

    if let Err(e) = startup::run(config).await {
        tracing::error!(error = %e, "Fatal error");
        return Err(e.into());
    }
    Ok(())
}
