//! Metrics collection and exposition.
//!
//! # Metrics
//! - `redirector_resolutions_total` (counter): resolutions by outcome
//! - `redirector_resolution_duration_seconds` (histogram): handler latency
//! - `redirector_dns_lookups_total` (counter): TXT lookups by result (ok, empty, error)

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one finished resolution.
pub fn record_resolution(outcome: &'static str, started: Instant) {
    ::metrics::counter!("redirector_resolutions_total", "outcome" => outcome).increment(1);
    ::metrics::histogram!("redirector_resolution_duration_seconds")
        .record(started.elapsed().as_secs_f64());
}

/// Record one TXT lookup.
pub fn record_dns_lookup(result: &'static str) {
    ::metrics::counter!("redirector_dns_lookups_total", "result" => result).increment(1);
}
