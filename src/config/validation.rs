//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, value ranges and header values
//! - Detect conflicting listener addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RedirectorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderValue;

use crate::config::schema::RedirectorConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &RedirectorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let plain = check_socket_addr(
        "listener.bind_address",
        &config.listener.bind_address,
        &mut errors,
    );
    if let Some(tls) = &config.listener.tls {
        let secure = check_socket_addr("listener.tls.bind_address", &tls.bind_address, &mut errors);
        if plain.is_some() && plain == secure {
            errors.push(ValidationError::new(
                "listener.tls.bind_address",
                "must differ from listener.bind_address",
            ));
        }
        if tls.cert_path.trim().is_empty() {
            errors.push(ValidationError::new("listener.tls.cert_path", "must not be empty"));
        }
        if tls.key_path.trim().is_empty() {
            errors.push(ValidationError::new("listener.tls.key_path", "must not be empty"));
        }
    }

    let prefix = &config.dns.record_prefix;
    if prefix.is_empty() || prefix.starts_with('.') || prefix.ends_with('.') || prefix.contains("..") {
        errors.push(ValidationError::new(
            "dns.record_prefix",
            format!("{prefix:?} is not a usable DNS label sequence"),
        ));
    }
    if config.dns.query_timeout_secs == 0 {
        errors.push(ValidationError::new("dns.query_timeout_secs", "must be greater than 0"));
    }
    if config.dns.lookup_timeout_secs == 0 {
        errors.push(ValidationError::new("dns.lookup_timeout_secs", "must be greater than 0"));
    }

    let server = &config.http.server_header;
    if server.is_empty() || HeaderValue::from_str(server).is_err() {
        errors.push(ValidationError::new(
            "http.server_header",
            format!("{server:?} is not a valid header value"),
        ));
    }

    if config.observability.metrics_enabled {
        check_socket_addr(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_socket_addr(
    field: &'static str,
    value: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<SocketAddr> {
    match value.parse::<SocketAddr>() {
        Ok(addr) => Some(addr),
        Err(e) => {
            errors.push(ValidationError::new(field, format!("{value:?}: {e}")));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::TlsConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&RedirectorConfig::default()), Ok(()));
    }

    #[test]
    fn test_conflicting_listeners() {
        let mut config = RedirectorConfig::default();
        config.listener.bind_address = "0.0.0.0:8443".into();
        config.listener.tls = Some(TlsConfig {
            bind_address: "0.0.0.0:8443".into(),
            cert_path: "cert.pem".into(),
            key_path: String::new(),
        });

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["listener.tls.bind_address", "listener.tls.key_path"]);
    }

    #[test]
    fn test_dns_and_header_checks() {
        let mut config = RedirectorConfig::default();
        config.dns.record_prefix = "_tgt..redir".into();
        config.dns.query_timeout_secs = 0;
        config.http.server_header = "bad\nheader".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.field == "http.server_header"));
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = RedirectorConfig::default();
        config.observability.metrics_address = "garbage".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "observability.metrics_address");
    }
}
