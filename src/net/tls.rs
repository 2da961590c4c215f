//! TLS certificate loading for the HTTPS listener.

use std::path::Path;

use axum_server::tls_rustls::RustlsConfig;

use crate::config::TlsConfig;
use crate::net::listener::ListenerError;

/// Load the rustls server configuration named by `config`.
pub async fn load_tls_config(config: &TlsConfig) -> Result<RustlsConfig, ListenerError> {
    let cert_path = Path::new(&config.cert_path);
    let key_path = Path::new(&config.key_path);

    for (kind, path) in [("Certificate", cert_path), ("Private key", key_path)] {
        if !path.exists() {
            return Err(ListenerError::Tls(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{kind} file not found: {}", path.display()),
            )));
        }
    }

    let tls = RustlsConfig::from_pem_file(cert_path, key_path)
        .await
        .map_err(ListenerError::Tls)?;
    tracing::info!(cert_path = %config.cert_path, "TLS configuration loaded");
    Ok(tls)
}
