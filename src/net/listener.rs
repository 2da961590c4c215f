//! TCP listener binding.
//!
//! # Responsibilities
//! - Parse configured bind addresses
//! - Bind the plaintext listener
//! - Report bind and serve failures with the address involved

use std::net::{AddrParseError, SocketAddr};

use thiserror::Error;
use tokio::net::TcpListener;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The configured address is not a socket address.
    #[error("invalid listen address {address:?}: {source}")]
    Address {
        address: String,
        #[source]
        source: AddrParseError,
    },

    /// Failed to bind to address.
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Failed to load certificate or key.
    #[error("failed to load TLS configuration: {0}")]
    Tls(#[source] std::io::Error),

    /// The server loop failed.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Parse a configured bind address.
pub fn parse_addr(address: &str) -> Result<SocketAddr, ListenerError> {
    address.parse().map_err(|source| ListenerError::Address {
        address: address.to_string(),
        source,
    })
}

/// Bind a plaintext TCP listener on `address`.
pub async fn bind(address: &str) -> Result<TcpListener, ListenerError> {
    let addr = parse_addr(address)?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ListenerError::Bind { address: addr, source })?;

    let local_addr = listener
        .local_addr()
        .map_err(|source| ListenerError::Bind { address: addr, source })?;
    tracing::info!(address = %local_addr, "Listener bound");

    Ok(listener)
}
