//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RedirectorConfig (validated, immutable)
//!     → listeners, resolver and observability built from it at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs (or none at all)
//! - Validation separates syntactic (serde) from semantic checks
//! - Redirect rules never live here; they are published in DNS

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::RedirectorConfig;
pub use schema::{DnsConfig, HttpConfig, ListenerConfig, LogFormat, ObservabilityConfig, TlsConfig};
pub use validation::{validate_config, ValidationError};
