//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, request id attached by the http layer)
//!     → metrics.rs (resolution outcomes, latency, DNS lookup results)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape), when enabled
//! ```
//!
//! # Design Decisions
//! - Metric calls are no-ops until a recorder is installed
//! - `RUST_LOG` wins over the configured log level

pub mod logging;
pub mod metrics;
