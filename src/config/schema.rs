//! Configuration schema definitions.
//!
//! This module defines the process-level configuration of the redirector.
//! All types derive Serde traits for deserialization from config files.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::resolution::DEFAULT_RECORD_PREFIX;

/// Root configuration for the redirector.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RedirectorConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// DNS lookup settings.
    pub dns: DnsConfig,

    /// HTTP response settings.
    pub http: HttpConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Plaintext bind address (e.g., "0.0.0.0:80").
    pub bind_address: String,

    /// Optional TLS listener, served alongside the plaintext one.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:80".to_string(),
            tls: None,
        }
    }
}

/// TLS listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// TLS bind address.
    #[serde(default = "default_tls_bind_address")]
    pub bind_address: String,

    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

fn default_tls_bind_address() -> String {
    "0.0.0.0:443".to_string()
}

/// DNS lookup configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DnsConfig {
    /// Label prepended to the request host to form the TXT query name.
    pub record_prefix: String,

    /// Nameservers to query. Empty uses the system resolver configuration.
    pub nameservers: Vec<IpAddr>,

    /// Per-query timeout in seconds. Each query is sent once, never retried.
    pub query_timeout_secs: u64,

    /// Deadline for the whole TXT lookup in seconds.
    pub lookup_timeout_secs: u64,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            record_prefix: DEFAULT_RECORD_PREFIX.to_string(),
            nameservers: Vec::new(),
            query_timeout_secs: 3,
            lookup_timeout_secs: 10,
        }
    }
}

/// HTTP response configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Value of the `Server` header on every response.
    pub server_header: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            server_header: "TxtRedirector/1.0".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, for development.
    #[default]
    Pretty,
    /// One JSON object per event, for log aggregation.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` overrides it.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
